//! Regular polygon shape, fan-triangulated from a hub vertex.

use super::params::{self, ParamKey, ParamSpec};
use super::{ParamEffect, ShapeKind, ShapeTrait};
use crate::config::{EditorConfig, MIN_SIDES};
use crate::error::ValidationError;
use crate::hull;
use crate::render::Primitive;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// A polygon with `sides` perimeter vertices at `radius` from `center`.
///
/// Vertex 0 is the hub at the center; vertices `1..=sides` run around the
/// perimeter starting at angle 0. Once a vertex has been dragged, `center`
/// and `radius` only describe the freehand outline approximately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub center: Point,
    pub radius: f64,
    pub sides: u32,
}

impl Polygon {
    pub fn new(center: Point, radius: f64, sides: u32) -> Self {
        Self {
            center,
            radius,
            sides,
        }
    }

    /// Analytic area of the regular polygon.
    pub fn regular_area(&self) -> f64 {
        let n = self.sides as f64;
        0.5 * n * self.radius * self.radius * (TAU / n).sin()
    }

    /// Fan over the hull of the perimeter. Fans from the hub while it sits
    /// inside the hull, otherwise from the first hull vertex.
    fn hull_fan(positions: &[Point]) -> Vec<u32> {
        let perimeter = &positions[1..];
        let ring: Vec<usize> = hull::convex_hull(perimeter).into_iter().map(|i| i + 1).collect();
        if ring.len() < 3 {
            return Vec::new();
        }

        let ring_points: Vec<Point> = ring.iter().map(|&i| positions[i]).collect();
        let mut indices = Vec::with_capacity(ring.len() * 3);
        if hull::strictly_inside(positions[0], &ring_points) {
            for (i, &a) in ring.iter().enumerate() {
                let b = ring[(i + 1) % ring.len()];
                indices.extend([0, a as u32, b as u32]);
            }
        } else {
            for pair in ring[1..].windows(2) {
                indices.extend([ring[0] as u32, pair[0] as u32, pair[1] as u32]);
            }
        }
        indices
    }

    /// Re-derive center and radius from freehand positions. The radius is
    /// clamped so the parameters always stay loadable.
    fn refresh_outline(&mut self, positions: &[Point], config: &EditorConfig) {
        let hub = positions[0];
        let perimeter = &positions[1..];
        let mean = perimeter.iter().map(|p| p.distance(hub)).sum::<f64>() / perimeter.len() as f64;
        self.center = hub;
        self.radius = params::clamp_extent(mean, config);
    }
}

impl ShapeTrait for Polygon {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Polygon
    }

    fn center(&self) -> Point {
        self.center
    }

    fn vertex_count(&self) -> usize {
        self.sides as usize + 1
    }

    fn regular_positions(&self) -> Vec<Point> {
        let step = TAU / self.sides as f64;
        let mut positions = Vec::with_capacity(self.vertex_count());
        positions.push(self.center);
        positions.extend((0..self.sides).map(|i| self.center + Vec2::from_angle(step * i as f64) * self.radius));
        positions
    }

    fn triangulate(&self, positions: &[Point], regular: bool) -> (Primitive, Vec<u32>) {
        if !regular {
            return (Primitive::Triangles, Self::hull_fan(positions));
        }
        let n = self.sides;
        let indices = (1..=n).flat_map(|i| [0, i, i % n + 1]).collect();
        (Primitive::Triangles, indices)
    }

    fn param(&self, key: ParamKey) -> Option<f64> {
        match key {
            ParamKey::CenterX => Some(self.center.x),
            ParamKey::CenterY => Some(self.center.y),
            ParamKey::Radius => Some(self.radius),
            ParamKey::SideCount => Some(self.sides as f64),
            _ => None,
        }
    }

    /// Center and radius edits carry freehand vertices along (shift and
    /// scale about the hub). A side count change always regenerates.
    fn set_param(
        &mut self,
        key: ParamKey,
        value: f64,
        config: &EditorConfig,
        freehand: Option<&mut [Point]>,
    ) -> Result<ParamEffect, ValidationError> {
        match key {
            ParamKey::CenterX | ParamKey::CenterY => {
                let value = params::finite(key, value)?;
                let shift = if key == ParamKey::CenterX {
                    Vec2::new(value - self.center.x, 0.0)
                } else {
                    Vec2::new(0.0, value - self.center.y)
                };
                self.center += shift;
                match freehand {
                    Some(positions) => {
                        positions.iter_mut().for_each(|p| *p += shift);
                        Ok(ParamEffect::Freehand)
                    }
                    None => Ok(ParamEffect::Relocate),
                }
            }
            ParamKey::Radius => {
                let radius = params::extent(key, value, config)?;
                let previous = std::mem::replace(&mut self.radius, radius);
                match freehand {
                    Some(positions) if previous > f64::EPSILON => {
                        let hub = positions[0];
                        let ratio = radius / previous;
                        positions[1..].iter_mut().for_each(|p| *p = hub + (*p - hub) * ratio);
                        Ok(ParamEffect::Freehand)
                    }
                    Some(_) => Ok(ParamEffect::Regenerate),
                    None => Ok(ParamEffect::Relocate),
                }
            }
            ParamKey::SideCount => {
                self.sides = params::side_count(value, config)?;
                Ok(ParamEffect::Regenerate)
            }
            _ => Err(ValidationError::NotApplicable {
                param: key.name(),
                kind: self.kind(),
            }),
        }
    }

    fn drag_vertex(&mut self, positions: &mut [Point], index: usize, delta: Vec2, config: &EditorConfig) {
        positions[index] += delta;
        self.refresh_outline(positions, config);
    }

    fn controls(&self, config: &EditorConfig) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new(ParamKey::CenterX, "Center X", -15.0, 15.0, 0.01, self.center.x),
            ParamSpec::new(ParamKey::CenterY, "Center Y", -15.0, 15.0, 0.01, self.center.y),
            ParamSpec::extent(ParamKey::Radius, "Radius", self.radius, config),
            ParamSpec::new(
                ParamKey::SideCount,
                "Sides",
                MIN_SIDES as f64,
                config.max_sides as f64,
                1.0,
                self.sides as f64,
            ),
        ]
    }

    fn validate(&self, config: &EditorConfig) -> Result<(), ValidationError> {
        params::finite(ParamKey::CenterX, self.center.x)?;
        params::finite(ParamKey::CenterY, self.center.y)?;
        params::extent(ParamKey::Radius, self.radius, config)?;
        params::side_count(self.sides as f64, config)?;
        Ok(())
    }
}
