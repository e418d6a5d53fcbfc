//! Line shape.

use super::params::{self, ParamKey, ParamSpec};
use super::{ParamEffect, ShapeKind, ShapeTrait};
use crate::config::EditorConfig;
use crate::error::ValidationError;
use crate::render::Primitive;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A straight segment described by its midpoint, length and direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub center: Point,
    pub length: f64,
    /// Direction of the segment from vertex 0 to vertex 1, in radians.
    pub angle: f64,
}

impl Line {
    pub fn new(center: Point, length: f64, angle: f64) -> Self {
        Self {
            center,
            length,
            angle,
        }
    }

    /// Build a line from its two endpoints.
    pub fn from_endpoints(start: Point, end: Point) -> Self {
        let dir = end - start;
        Self {
            center: start.midpoint(end),
            length: dir.hypot(),
            angle: dir.y.atan2(dir.x),
        }
    }

    pub fn endpoints(&self) -> [Point; 2] {
        let half = Vec2::from_angle(self.angle) * (self.length / 2.0);
        [self.center - half, self.center + half]
    }
}

impl ShapeTrait for Line {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Line
    }

    fn center(&self) -> Point {
        self.center
    }

    fn vertex_count(&self) -> usize {
        2
    }

    fn regular_positions(&self) -> Vec<Point> {
        self.endpoints().to_vec()
    }

    fn triangulate(&self, _positions: &[Point], _regular: bool) -> (Primitive, Vec<u32>) {
        (Primitive::Lines, vec![0, 1])
    }

    fn param(&self, key: ParamKey) -> Option<f64> {
        match key {
            ParamKey::CenterX => Some(self.center.x),
            ParamKey::CenterY => Some(self.center.y),
            ParamKey::Length => Some(self.length),
            ParamKey::AngleDegrees => Some(self.angle.to_degrees()),
            _ => None,
        }
    }

    fn set_param(
        &mut self,
        key: ParamKey,
        value: f64,
        config: &EditorConfig,
        _freehand: Option<&mut [Point]>,
    ) -> Result<ParamEffect, ValidationError> {
        match key {
            ParamKey::CenterX => self.center.x = params::finite(key, value)?,
            ParamKey::CenterY => self.center.y = params::finite(key, value)?,
            ParamKey::Length => self.length = params::extent(key, value, config)?,
            ParamKey::AngleDegrees => self.angle = params::finite(key, value)?.to_radians(),
            _ => {
                return Err(ValidationError::NotApplicable {
                    param: key.name(),
                    kind: self.kind(),
                });
            }
        }
        Ok(ParamEffect::Relocate)
    }

    /// Moves one endpoint while the other stays put. Length is clamped, in
    /// which case the moved endpoint is pulled back along the new direction.
    fn drag_vertex(&mut self, positions: &mut [Point], index: usize, delta: Vec2, config: &EditorConfig) {
        let anchor = positions[1 - index];
        let moved = positions[index] + delta;
        let (start, end) = if index == 0 { (moved, anchor) } else { (anchor, moved) };

        let dir = end - start;
        let raw_length = dir.hypot();
        if raw_length > f64::EPSILON {
            self.angle = dir.y.atan2(dir.x);
        }
        self.length = params::clamp_extent(raw_length, config);

        let span = Vec2::from_angle(self.angle) * self.length;
        let (start, end) = if index == 0 {
            (anchor - span, anchor)
        } else {
            (anchor, anchor + span)
        };
        self.center = start.midpoint(end);
        positions[0] = start;
        positions[1] = end;
    }

    fn controls(&self, config: &EditorConfig) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new(ParamKey::CenterX, "Center X", -15.0, 15.0, 0.01, self.center.x),
            ParamSpec::new(ParamKey::CenterY, "Center Y", -15.0, 15.0, 0.01, self.center.y),
            ParamSpec::extent(ParamKey::Length, "Length", self.length, config),
            ParamSpec::new(ParamKey::AngleDegrees, "Angle", 0.0, 360.0, 1.0, self.angle.to_degrees()),
        ]
    }

    fn validate(&self, config: &EditorConfig) -> Result<(), ValidationError> {
        params::finite(ParamKey::CenterX, self.center.x)?;
        params::finite(ParamKey::CenterY, self.center.y)?;
        params::extent(ParamKey::Length, self.length, config)?;
        params::finite(ParamKey::AngleDegrees, self.angle)?;
        Ok(())
    }
}
