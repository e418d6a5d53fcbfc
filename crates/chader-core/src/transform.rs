//! 2D homogeneous transform matrices and per-shape transform state.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// 3x3 homogeneous 2D matrix in column-major order.
///
/// Entries 6 and 7 hold the translation. Degenerate and mirroring matrices are
/// valid; nothing here normalizes or inverts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3(pub [f64; 9]);

impl Mat3 {
    pub const IDENTITY: Mat3 = Mat3([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);

    pub fn identity() -> Self {
        Self::IDENTITY
    }

    /// Post-multiply by a translation.
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        let m = self.0;
        let mut r = m;
        r[6] = m[0] * tx + m[3] * ty + m[6];
        r[7] = m[1] * tx + m[4] * ty + m[7];
        r[8] = m[2] * tx + m[5] * ty + m[8];
        Mat3(r)
    }

    /// Post-multiply by a rotation of `theta` radians.
    pub fn rotate(self, theta: f64) -> Self {
        let m = self.0;
        let (sin, cos) = theta.sin_cos();
        let mut r = m;
        r[0] = m[0] * cos - m[3] * sin;
        r[1] = m[1] * cos - m[4] * sin;
        r[2] = m[2] * cos - m[5] * sin;
        r[3] = m[0] * sin + m[3] * cos;
        r[4] = m[1] * sin + m[4] * cos;
        r[5] = m[2] * sin + m[5] * cos;
        Mat3(r)
    }

    /// Post-multiply by a non-uniform scale.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        let m = self.0;
        let mut r = m;
        r[0] = m[0] * sx;
        r[1] = m[1] * sx;
        r[2] = m[2] * sx;
        r[3] = m[3] * sy;
        r[4] = m[4] * sy;
        r[5] = m[5] * sy;
        Mat3(r)
    }

    /// Transform a point (w = 1).
    pub fn apply(&self, p: Point) -> Point {
        let m = &self.0;
        Point::new(
            m[0] * p.x + m[3] * p.y + m[6],
            m[1] * p.x + m[4] * p.y + m[7],
        )
    }

    /// Single precision copy for upload.
    pub fn to_f32(&self) -> [f32; 9] {
        self.0.map(|v| v as f32)
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<Mat3> for Affine {
    fn from(m: Mat3) -> Self {
        let m = m.0;
        Affine::new([m[0], m[1], m[3], m[4], m[6], m[7]])
    }
}

/// Translation, rotation and scale applied to a shape at render time.
///
/// Never baked into the stored vertices.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "TransformRecord", into = "TransformRecord")]
pub struct ShapeTransform {
    pub translation: Vec2,
    /// Radians.
    pub rotation: f64,
    pub scale: Vec2,
}

impl ShapeTransform {
    pub const IDENTITY: ShapeTransform = ShapeTransform {
        translation: Vec2::ZERO,
        rotation: 0.0,
        scale: Vec2::new(1.0, 1.0),
    };

    /// Compose translate, then rotate, then scale onto the identity.
    pub fn matrix(&self) -> Mat3 {
        Mat3::identity()
            .translate(self.translation.x, self.translation.y)
            .rotate(self.rotation)
            .scale(self.scale.x, self.scale.y)
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }

    pub fn set_rotation_degrees(&mut self, degrees: f64) {
        self.rotation = degrees.to_radians();
    }
}

impl Default for ShapeTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Serialize, Deserialize)]
struct TransformRecord {
    #[serde(default)]
    translation: [f64; 2],
    #[serde(default)]
    rotation: f64,
    #[serde(default = "unit_scale")]
    scale: [f64; 2],
}

fn unit_scale() -> [f64; 2] {
    [1.0, 1.0]
}

impl From<TransformRecord> for ShapeTransform {
    fn from(r: TransformRecord) -> Self {
        Self {
            translation: Vec2::new(r.translation[0], r.translation[1]),
            rotation: r.rotation,
            scale: Vec2::new(r.scale[0], r.scale[1]),
        }
    }
}

impl From<ShapeTransform> for TransformRecord {
    fn from(t: ShapeTransform) -> Self {
        Self {
            translation: [t.translation.x, t.translation.y],
            rotation: t.rotation,
            scale: [t.scale.x, t.scale.y],
        }
    }
}
