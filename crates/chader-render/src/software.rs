//! Software implementation of the scene renderer.

use crate::raster::{self, Framebuffer};
use chader_core::render::world_to_screen;
use chader_core::{Mat3, Primitive, RenderError, Renderer, Resolution, Rgba, SceneGraph, config::PIXELS_PER_UNIT};
use kurbo::Point;
use peniko::Color;

/// Renders uploaded vertex buffers into an in-memory RGBA8 image.
///
/// World space maps to pixels with the origin at the image center, Y up,
/// and `pixels_per_unit` pixels per world unit.
#[derive(Debug, Clone)]
pub struct SoftwareRenderer {
    framebuffer: Framebuffer,
    pixels_per_unit: f64,
    positions: Vec<f32>,
    colors: Vec<f32>,
    indices: Vec<u32>,
}

impl SoftwareRenderer {
    /// Create a renderer with a transparent `width` x `height` image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            framebuffer: Framebuffer::new(width, height),
            pixels_per_unit: PIXELS_PER_UNIT,
            positions: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
        }
    }

    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f64) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.clear(color);
        self
    }

    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.framebuffer.width, self.framebuffer.height)
    }

    pub fn clear(&mut self, color: Color) {
        self.framebuffer.clear(Rgba::from(color));
    }

    /// RGBA8 value at `(x, y)`, `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.framebuffer.pixel(x, y)
    }

    /// Raw RGBA8 pixels, row-major from the top-left corner.
    pub fn pixels(&self) -> &[u8] {
        &self.framebuffer.data
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, RenderError> {
        encode_png(&self.framebuffer.data, self.framebuffer.width, self.framebuffer.height)
    }

    fn vertex(&self, index: u32, matrix: &Mat3, resolution: Resolution) -> (Point, [f32; 4]) {
        let i = index as usize;
        let local = Point::new(self.positions[i * 2] as f64, self.positions[i * 2 + 1] as f64);
        let screen = world_to_screen(matrix.apply(local), resolution, self.pixels_per_unit);
        let c = &self.colors[i * 4..i * 4 + 4];
        (screen, [c[0], c[1], c[2], c[3]])
    }
}

impl Renderer for SoftwareRenderer {
    fn upload(&mut self, positions: &[f32], colors: &[f32], indices: &[u32]) -> Result<(), RenderError> {
        let count = positions.len() / 2;
        if positions.len() % 2 != 0 || colors.len() != count * 4 {
            return Err(RenderError::BufferLayout(format!(
                "{} position floats, {} color floats",
                positions.len(),
                colors.len()
            )));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
            return Err(RenderError::IndexOutOfRange { index, count });
        }
        self.positions = positions.to_vec();
        self.colors = colors.to_vec();
        self.indices = indices.to_vec();
        Ok(())
    }

    fn draw(&mut self, primitive: Primitive, matrix: &Mat3, resolution: Resolution) -> Result<(), RenderError> {
        if resolution != self.resolution() {
            return Err(RenderError::Failed(format!(
                "resolution {}x{} does not match the {}x{} framebuffer",
                resolution.width, resolution.height, self.framebuffer.width, self.framebuffer.height
            )));
        }

        match primitive {
            Primitive::Triangles => {
                for tri in self.indices.chunks_exact(3) {
                    let [(a, ca), (b, cb), (c, cc)] = [tri[0], tri[1], tri[2]].map(|i| self.vertex(i, matrix, resolution));
                    raster::fill_triangle(&mut self.framebuffer, [a, b, c], [ca, cb, cc]);
                }
            }
            Primitive::Lines => {
                for seg in self.indices.chunks_exact(2) {
                    let [(a, ca), (b, cb)] = [seg[0], seg[1]].map(|i| self.vertex(i, matrix, resolution));
                    raster::draw_line(&mut self.framebuffer, [a, b], [ca, cb]);
                }
            }
        }
        Ok(())
    }
}

/// Encode RGBA pixel data to PNG bytes.
pub fn encode_png(rgba_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let mut png_data = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut png_data, width, height);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::Failed(format!("Failed to write PNG header: {}", e)))?;
        writer
            .write_image_data(rgba_data)
            .map_err(|e| RenderError::Failed(format!("Failed to write PNG data: {}", e)))?;
    }
    Ok(png_data)
}

/// Draw every shape of `scene` over `background` and encode the result.
pub fn render_scene_to_png(
    scene: &SceneGraph,
    width: u32,
    height: u32,
    background: Color,
) -> Result<Vec<u8>, RenderError> {
    let mut renderer = SoftwareRenderer::new(width, height)
        .with_pixels_per_unit(scene.config().pixels_per_unit)
        .with_background(background);
    let resolution = renderer.resolution();
    scene.render(&mut renderer, resolution)?;
    let png = renderer.encode_png()?;
    log::info!("rendered {} shapes to {}x{} PNG ({} bytes)", scene.len(), width, height, png.len());
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chader_core::{EditorConfig, Line, ParamKey, Polygon, ShapeParams, Square};

    fn scene() -> SceneGraph {
        SceneGraph::with_config(EditorConfig::without_fade())
    }

    #[test]
    fn test_square_covers_center() {
        let mut scene = scene();
        scene.create_shape(ShapeParams::Square(Square::new(Point::ZERO, 2.0))).unwrap();

        let mut renderer = SoftwareRenderer::new(200, 200).with_background(Color::WHITE);
        scene.render(&mut renderer, Resolution::new(200, 200)).unwrap();

        let base = [147, 216, 227, 255];
        assert_eq!(renderer.pixel(100, 100), Some(base));
        // 2 units wide at 50 px per unit spans pixels 50..150
        assert_eq!(renderer.pixel(55, 55), Some(base));
        assert_eq!(renderer.pixel(45, 100), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_translation_moves_shape() {
        let mut scene = scene();
        let id = scene.create_shape(ShapeParams::Square(Square::new(Point::ZERO, 1.0))).unwrap();
        scene.set_param(id, ParamKey::TranslateY, 1.0).unwrap();

        let mut renderer = SoftwareRenderer::new(100, 200);
        scene.render(&mut renderer, Resolution::new(100, 200)).unwrap();
        // Y up: +1 unit lands 50 px above the center row
        assert_eq!(renderer.pixel(50, 50).map(|p| p[3]), Some(255));
        assert_eq!(renderer.pixel(50, 100).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_line_and_polygon() {
        let mut scene = scene();
        scene.create_shape(ShapeParams::Line(Line::new(Point::ZERO, 2.0, 0.0))).unwrap();
        scene
            .create_shape(ShapeParams::Polygon(Polygon::new(Point::new(0.0, 1.5), 0.5, 6)))
            .unwrap();

        let mut renderer = SoftwareRenderer::new(200, 200);
        scene.render(&mut renderer, Resolution::new(200, 200)).unwrap();
        assert_eq!(renderer.pixel(100, 100).map(|p| p[3]), Some(255));
        assert_eq!(renderer.pixel(100, 25).map(|p| p[3]), Some(255));
        assert_eq!(renderer.pixel(100, 150).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_upload_rejects_bad_buffers() {
        let mut renderer = SoftwareRenderer::new(10, 10);
        assert!(matches!(
            renderer.upload(&[0.0, 0.0], &[1.0, 1.0, 1.0], &[0]),
            Err(RenderError::BufferLayout(_))
        ));
        assert!(matches!(
            renderer.upload(&[0.0, 0.0], &[1.0; 4], &[0, 1]),
            Err(RenderError::IndexOutOfRange { index: 1, count: 1 })
        ));
    }

    #[test]
    fn test_resolution_mismatch() {
        let mut renderer = SoftwareRenderer::new(10, 10);
        let result = renderer.draw(Primitive::Triangles, &Mat3::IDENTITY, Resolution::new(20, 10));
        assert!(matches!(result, Err(RenderError::Failed(_))));
    }

    #[test]
    fn test_png_signature() {
        let png = render_scene_to_png(&scene(), 16, 8, Color::WHITE).unwrap();
        assert_eq!(&png[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }
}
