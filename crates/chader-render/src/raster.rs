//! Scanline-free rasterization into an RGBA8 framebuffer.

use chader_core::Rgba;
use kurbo::Point;

/// Straight-alpha RGBA8 pixels, row-major from the top-left corner.
#[derive(Debug, Clone)]
pub(crate) struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        let texel = to_bytes(color.to_array());
        self.data.chunks_exact_mut(4).for_each(|px| px.copy_from_slice(&texel));
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Source-over blend of `color` onto pixel `(x, y)`. Out-of-bounds writes are dropped.
    pub fn blend(&mut self, x: i64, y: i64, color: [f32; 4]) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst = [
            self.data[i] as f32 / 255.0,
            self.data[i + 1] as f32 / 255.0,
            self.data[i + 2] as f32 / 255.0,
            self.data[i + 3] as f32 / 255.0,
        ];
        let sa = color[3];
        let da = dst[3] * (1.0 - sa);
        let out_a = sa + da;
        let mut out = [0.0; 4];
        if out_a > 0.0 {
            for c in 0..3 {
                out[c] = (color[c] * sa + dst[c] * da) / out_a;
            }
        }
        out[3] = out_a;
        self.data[i..i + 4].copy_from_slice(&to_bytes(out));
    }
}

fn to_bytes(color: [f32; 4]) -> [u8; 4] {
    color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn edge(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

fn mix(colors: &[[f32; 4]; 3], w: [f64; 3]) -> [f32; 4] {
    std::array::from_fn(|c| (colors[0][c] as f64 * w[0] + colors[1][c] as f64 * w[1] + colors[2][c] as f64 * w[2]) as f32)
}

/// Fill a triangle given in pixel coordinates, interpolating vertex colors.
/// Either winding is accepted; degenerate triangles draw nothing.
pub(crate) fn fill_triangle(fb: &mut Framebuffer, [a, b, c]: [Point; 3], colors: [[f32; 4]; 3]) {
    let area = edge(a, b, c);
    if area.abs() < f64::EPSILON {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as i64;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as i64;
    let max_x = a.x.max(b.x).max(c.x).ceil().min(fb.width as f64) as i64;
    let max_y = a.y.max(b.y).max(c.y).ceil().min(fb.height as f64) as i64;

    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let w = [edge(b, c, p) / area, edge(c, a, p) / area, edge(a, b, p) / area];
            if w.iter().all(|&wi| wi >= 0.0) {
                fb.blend(x, y, mix(&colors, w));
            }
        }
    }
}

/// One-pixel line between two pixel-space points (DDA).
pub(crate) fn draw_line(fb: &mut Framebuffer, [a, b]: [Point; 2], colors: [[f32; 4]; 2]) {
    let delta = b - a;
    let steps = delta.x.abs().max(delta.y.abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let p = a.lerp(b, t);
        let color = std::array::from_fn(|c| colors[0][c] + (colors[1][c] - colors[0][c]) * t as f32);
        fb.blend(p.x.floor() as i64, p.y.floor() as i64, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_triangle_coverage() {
        let mut fb = Framebuffer::new(10, 10);
        let corners = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(0.0, 10.0)];
        fill_triangle(&mut fb, corners, [RED; 3]);
        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(9, 9), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_winding_does_not_matter() {
        let mut fb = Framebuffer::new(10, 10);
        let corners = [Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 0.0)];
        fill_triangle(&mut fb, corners, [RED; 3]);
        assert_eq!(fb.pixel(1, 1), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_degenerate_triangle_draws_nothing() {
        let mut fb = Framebuffer::new(4, 4);
        fill_triangle(&mut fb, [Point::ZERO, Point::new(2.0, 2.0), Point::new(4.0, 4.0)], [RED; 3]);
        assert!(fb.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_half_alpha_over_white() {
        let mut fb = Framebuffer::new(1, 1);
        fb.clear(Rgba::WHITE);
        fb.blend(0, 0, [0.0, 0.0, 0.0, 0.5]);
        assert_eq!(fb.pixel(0, 0), Some([128, 128, 128, 255]));
    }

    #[test]
    fn test_line_endpoints() {
        let mut fb = Framebuffer::new(8, 8);
        draw_line(&mut fb, [Point::new(0.5, 0.5), Point::new(7.5, 0.5)], [RED; 2]);
        assert_eq!(fb.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(7, 0), Some([255, 0, 0, 255]));
        assert_eq!(fb.pixel(0, 1), Some([0, 0, 0, 0]));
    }
}
