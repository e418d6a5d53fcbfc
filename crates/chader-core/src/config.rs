//! Editor configuration.

use crate::color::Rgba;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Screen pixels per world unit.
pub const PIXELS_PER_UNIT: f64 = 50.0;
/// Smallest allowed size parameter (length, side, width, height, radius).
pub const MIN_EXTENT: f64 = 0.01;
/// Largest allowed size parameter.
pub const MAX_EXTENT: f64 = 30.0;
/// Fewest sides a polygon can have.
pub const MIN_SIDES: u32 = 3;

/// Tunables for the editor core. Every field has a default, so a partial JSON
/// object (or `{}`) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Divisor applied to pointer deltas during vertex drags.
    pub pixels_per_unit: f64,
    pub min_extent: f64,
    pub max_extent: f64,
    /// Upper bound for a polygon's side count.
    pub max_sides: u32,
    /// Color for new shapes and for vertices without a stored color.
    pub base_color: Rgba,
    pub fade: FadeConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            pixels_per_unit: PIXELS_PER_UNIT,
            min_extent: MIN_EXTENT,
            max_extent: MAX_EXTENT,
            max_sides: 360,
            base_color: Rgba::BASE,
            fade: FadeConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Configuration with the fade-in animation switched off.
    pub fn without_fade() -> Self {
        Self {
            fade: FadeConfig {
                enabled: false,
                ..FadeConfig::default()
            },
            ..Self::default()
        }
    }
}

/// Fade-in animation for newly created shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FadeConfig {
    pub enabled: bool,
    /// Opacity added per tick.
    pub step: f32,
    pub interval_ms: u64,
}

impl FadeConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            step: 0.05,
            interval_ms: 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_is_default() {
        assert_eq!(EditorConfig::from_json("{}").unwrap(), EditorConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = EditorConfig::from_json(r#"{"pixelsPerUnit": 25, "fade": {"step": 0.5}}"#).unwrap();
        assert_eq!(config.pixels_per_unit, 25.0);
        assert_eq!(config.fade.step, 0.5);
        assert!(config.fade.enabled);
        assert_eq!(config.max_extent, MAX_EXTENT);
    }
}
