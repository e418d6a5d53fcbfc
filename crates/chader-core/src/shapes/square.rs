//! Square shape.

use super::params::{self, ParamKey, ParamSpec};
use super::rectangle::{CORNER_SIGNS, QUAD_INDICES, quad_corners};
use super::{ParamEffect, ShapeKind, ShapeTrait};
use crate::config::EditorConfig;
use crate::error::ValidationError;
use crate::render::Primitive;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// An axis-aligned square around a center point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Square {
    pub center: Point,
    pub side: f64,
}

impl Square {
    pub fn new(center: Point, side: f64) -> Self {
        Self { center, side }
    }
}

impl ShapeTrait for Square {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Square
    }

    fn center(&self) -> Point {
        self.center
    }

    fn vertex_count(&self) -> usize {
        4
    }

    fn regular_positions(&self) -> Vec<Point> {
        quad_corners(self.center, self.side, self.side)
    }

    fn triangulate(&self, _positions: &[Point], _regular: bool) -> (Primitive, Vec<u32>) {
        (Primitive::Triangles, QUAD_INDICES.to_vec())
    }

    fn param(&self, key: ParamKey) -> Option<f64> {
        match key {
            ParamKey::CenterX => Some(self.center.x),
            ParamKey::CenterY => Some(self.center.y),
            ParamKey::Side => Some(self.side),
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
            ParamKey::Side => self.side = params::extent(key, value, config)?,
            _ => {
                return Err(ValidationError::NotApplicable {
                    param: key.name(),
                    kind: self.kind(),
                });
            }
        }
        Ok(ParamEffect::Relocate)
    }

    /// The side grows by the mean of the outward x and y motion, so the
    /// square stays square and the opposite corner stays fixed.
    fn drag_vertex(&mut self, positions: &mut [Point], index: usize, delta: Vec2, config: &EditorConfig) {
        let (sx, sy) = CORNER_SIGNS[index];
        let grow = (sx * delta.x + sy * delta.y) / 2.0;

        let side = params::clamp_extent(self.side + grow, config);
        let applied = side - self.side;
        self.center.x += sx * applied / 2.0;
        self.center.y += sy * applied / 2.0;
        self.side = side;

        positions.copy_from_slice(&self.regular_positions());
    }

    fn controls(&self, config: &EditorConfig) -> Vec<ParamSpec> {
        vec![
            ParamSpec::new(ParamKey::CenterX, "Center X", -15.0, 15.0, 0.01, self.center.x),
            ParamSpec::new(ParamKey::CenterY, "Center Y", -15.0, 15.0, 0.01, self.center.y),
            ParamSpec::extent(ParamKey::Side, "Side Length", self.side, config),
        ]
    }

    fn validate(&self, config: &EditorConfig) -> Result<(), ValidationError> {
        params::finite(ParamKey::CenterX, self.center.x)?;
        params::finite(ParamKey::CenterY, self.center.y)?;
        params::extent(ParamKey::Side, self.side, config)?;
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
    fn test_unit_corners() {
        let square = Square::new(Point::ZERO, 2.0);
        assert_eq!(
            square.regular_positions(),
            vec![
                Point::new(-1.0, -1.0),
                Point::new(-1.0, 1.0),
                Point::new(1.0, -1.0),
                Point::new(1.0, 1.0),
            ]
        );
    }

    #[test]
    fn test_drag_stays_square() {
        let config = EditorConfig::default();
        let mut square = Square::new(Point::ZERO, 2.0);
        let mut positions = square.regular_positions();
        square.drag_vertex(&mut positions, 3, Vec2::new(1.0, 0.5), &config);
        assert!(close(square.side, 2.75));
        let w = positions[3].x - positions[0].x;
        let h = positions[3].y - positions[0].y;
        assert!(close(w, h));
        // opposite corner fixed
        assert!(close(positions[0].x, -1.0) && close(positions[0].y, -1.0));
    }

    #[test]
    fn test_drag_round_trip() {
        let config = EditorConfig::default();
        let mut square = Square::new(Point::new(3.0, 1.0), 5.0);
        let mut positions = square.regular_positions();
        square.drag_vertex(&mut positions, 0, Vec2::new(0.4, -2.0), &config);
        square.drag_vertex(&mut positions, 0, Vec2::new(-0.4, 2.0), &config);
        assert!(close(square.side, 5.0));
        assert!(close(square.center.x, 3.0) && close(square.center.y, 1.0));
    }
}
