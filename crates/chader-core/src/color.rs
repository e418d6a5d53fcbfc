//! Per-vertex color.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// RGBA color with channels in [0, 1].
///
/// Serialized as a four element array `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    /// Default fill for new shapes.
    pub const BASE: Rgba = Rgba {
        r: 0.576,
        g: 0.847,
        b: 0.890,
        a: 1.0,
    };

    pub const BLACK: Rgba = Rgba {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub const WHITE: Rgba = Rgba {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Create a color, clamping each channel into [0, 1]. NaN channels become 0.
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }

    /// Parse `#rrggbb` (leading `#` optional). Alpha is 1.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?, 1.0))
    }

    /// Same color with alpha multiplied by `factor`.
    pub fn fade(self, factor: f32) -> Self {
        Self::new(self.r, self.g, self.b, self.a * factor)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

fn unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BASE
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

impl From<Rgba> for [f32; 4] {
    fn from(color: Rgba) -> Self {
        color.to_array()
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        color.components.into()
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::new(color.to_array())
    }
}
