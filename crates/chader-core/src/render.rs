//! Renderer capability consumed by the scene.

use crate::error::RenderError;
use crate::transform::Mat3;

/// How an index list is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    /// Every three indices form a triangle.
    Triangles,
    /// Every two indices form a line segment.
    Lines,
}

/// Output size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Flat vertex data for one shape, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBuffers {
    /// `x, y` pairs in local space.
    pub positions: Vec<f32>,
    /// `r, g, b, a` per vertex.
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
    pub primitive: Primitive,
}

impl VertexBuffers {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 2
    }

    /// Check that the color array matches the positions and every index is in range.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.positions.len() % 2 != 0 || self.colors.len() != self.vertex_count() * 4 {
            return Err(RenderError::BufferLayout(format!(
                "{} position floats, {} color floats",
                self.positions.len(),
                self.colors.len()
            )));
        }
        let count = self.vertex_count();
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= count) {
            return Err(RenderError::IndexOutOfRange { index, count });
        }
        Ok(())
    }
}

/// A graphics backend able to draw indexed vertex data with a transform.
///
/// The scene calls `upload` then `draw` once per shape, in paint order.
pub trait Renderer {
    fn upload(&mut self, positions: &[f32], colors: &[f32], indices: &[u32]) -> Result<(), RenderError>;

    fn draw(&mut self, primitive: Primitive, matrix: &Mat3, resolution: Resolution) -> Result<(), RenderError>;
}

/// World-space point for a pixel position, with the origin at the canvas
/// center and Y pointing up.
pub fn screen_to_world(x: f64, y: f64, resolution: Resolution, pixels_per_unit: f64) -> kurbo::Point {
    kurbo::Point::new(
        (x - resolution.width as f64 / 2.0) / pixels_per_unit,
        (resolution.height as f64 / 2.0 - y) / pixels_per_unit,
    )
}

/// Pixel position for a world-space point. Inverse of [`screen_to_world`].
pub fn world_to_screen(point: kurbo::Point, resolution: Resolution, pixels_per_unit: f64) -> kurbo::Point {
    kurbo::Point::new(
        resolution.width as f64 / 2.0 + point.x * pixels_per_unit,
        resolution.height as f64 / 2.0 - point.y * pixels_per_unit,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_world_round_trip() {
        let res = Resolution::new(800, 600);
        let world = screen_to_world(450.0, 250.0, res, 50.0);
        assert!((world.x - 1.0).abs() < 1e-12);
        assert!((world.y - 1.0).abs() < 1e-12);
        let back = world_to_screen(world, res, 50.0);
        assert!((back.x - 450.0).abs() < 1e-9);
        assert!((back.y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_bad_index() {
        let buffers = VertexBuffers {
            positions: vec![0.0, 0.0, 1.0, 0.0],
            colors: vec![1.0; 8],
            indices: vec![0, 2],
            primitive: Primitive::Lines,
        };
        assert!(matches!(
            buffers.validate(),
            Err(RenderError::IndexOutOfRange { index: 2, count: 2 })
        ));
    }
}
