//! Rectangle shape and the axis-aligned quad layout it shares with squares.

use super::params::{self, ParamKey, ParamSpec};
use super::{ParamEffect, ShapeKind, ShapeTrait};
use crate::config::EditorConfig;
use crate::error::ValidationError;
use crate::render::Primitive;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Two triangles over the corners `(x1,y1), (x1,y2), (x2,y1), (x2,y2)`.
pub(crate) const QUAD_INDICES: [u32; 6] = [0, 1, 2, 2, 1, 3];

/// For each corner, the direction it moves when width/height grow.
pub(crate) const CORNER_SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, -1.0), (1.0, 1.0)];

pub(crate) fn quad_corners(center: Point, width: f64, height: f64) -> Vec<Point> {
    CORNER_SIGNS
        .iter()
        .map(|&(sx, sy)| Point::new(center.x + sx * width / 2.0, center.y + sy * height / 2.0))
        .collect()
}

/// An axis-aligned rectangle around a center point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Area of the rectangle.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

impl ShapeTrait for Rectangle {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Rectangle
    }

    fn center(&self) -> Point {
        self.center
    }

    fn vertex_count(&self) -> usize {
        4
    }

    fn regular_positions(&self) -> Vec<Point> {
        quad_corners(self.center, self.width, self.height)
    }

    fn triangulate(&self, _positions: &[Point], _regular: bool) -> (Primitive, Vec<u32>) {
        (Primitive::Triangles, QUAD_INDICES.to_vec())
    }

    fn param(&self, key: ParamKey) -> Option<f64> {
        match key {
            ParamKey::CenterX => Some(self.center.x),
            ParamKey::CenterY => Some(self.center.y),
            ParamKey::Width => Some(self.width),
            ParamKey::Height => Some(self.height),
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
            ParamKey::Width => self.width = params::extent(key, value, config)?,
            ParamKey::Height => self.height = params::extent(key, value, config)?,
            _ => {
                return Err(ValidationError::NotApplicable {
                    param: key.name(),
                    kind: self.kind(),
                });
            }
        }
        Ok(ParamEffect::Relocate)
    }

    /// Grows or shrinks the rectangle so the dragged corner follows the
    /// pointer and the opposite corner stays fixed.
    fn drag_vertex(&mut self, positions: &mut [Point], index: usize, delta: Vec2, config: &EditorConfig) {
        let (sx, sy) = CORNER_SIGNS[index];

        let width = params::clamp_extent(self.width + sx * delta.x, config);
        let height = params::clamp_extent(self.height + sy * delta.y, config);
        self.center.x += sx * (width - self.width) / 2.0;
        self.center.y += sy * (height - self.height) / 2.0;
        self.width = width;
        self.height = height;

        positions.copy_from_slice(&self.regular_positions());
    }

    fn controls(&self, config: &EditorConfig) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new(ParamKey::CenterX, "Center X", -15.0, 15.0, 0.01, self.center.x),
            ParamSpec::new(ParamKey::CenterY, "Center Y", -15.0, 15.0, 0.01, self.center.y),
            ParamSpec::extent(ParamKey::Width, "Width", self.width, config),
            ParamSpec::extent(ParamKey::Height, "Height", self.height, config),
        ]
    }

    fn validate(&self, config: &EditorConfig) -> Result<(), ValidationError> {
        params::finite(ParamKey::CenterX, self.center.x)?;
        params::finite(ParamKey::CenterY, self.center.y)?;
        params::extent(ParamKey::Width, self.width, config)?;
        params::extent(ParamKey::Height, self.height, config)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_corner_layout() {
        let rect = Rectangle::new(Point::new(1.0, 0.0), 4.0, 2.0);
        let corners = rect.regular_positions();
        assert_eq!(corners[0], Point::new(-1.0, -1.0));
        assert_eq!(corners[1], Point::new(-1.0, 1.0));
        assert_eq!(corners[2], Point::new(3.0, -1.0));
        assert_eq!(corners[3], Point::new(3.0, 1.0));
    }

    #[test]
    fn test_drag_keeps_opposite_corner() {
        let config = EditorConfig::default();
        for index in 0..4 {
            let mut rect = Rectangle::new(Point::ZERO, 4.0, 2.0);
            let mut positions = rect.regular_positions();
            let opposite = 3 - index;
            let fixed = positions[opposite];
            let target = positions[index] + Vec2::new(0.5, -0.25);
            rect.drag_vertex(&mut positions, index, Vec2::new(0.5, -0.25), &config);
            assert!(close(positions[opposite].x, fixed.x) && close(positions[opposite].y, fixed.y));
            assert!(close(positions[index].x, target.x) && close(positions[index].y, target.y));
        }
    }

    #[test]
    fn test_drag_round_trip() {
        let config = EditorConfig::default();
        let mut rect = Rectangle::new(Point::new(2.0, -1.0), 4.0, 3.0);
        let original = rect.clone();
        let mut positions = rect.regular_positions();
        rect.drag_vertex(&mut positions, 1, Vec2::new(1.25, -0.75), &config);
        assert!(!close(rect.width, original.width));
        rect.drag_vertex(&mut positions, 1, Vec2::new(-1.25, 0.75), &config);
        assert!(close(rect.width, original.width));
        assert!(close(rect.height, original.height));
        assert!(close(rect.center.x, original.center.x));
        assert!(close(rect.center.y, original.center.y));
    }

    #[test]
    fn test_drag_clamps_extent() {
        let config = EditorConfig::default();
        let mut rect = Rectangle::new(Point::ZERO, 4.0, 2.0);
        let mut positions = rect.regular_positions();
        rect.drag_vertex(&mut positions, 3, Vec2::new(-10.0, 0.0), &config);
        assert!(close(rect.width, 0.01));
        // left edge unchanged
        assert!(close(positions[0].x, -2.0));
    }
}
