//! Named shape parameters, their slider descriptions and validation.

use crate::config::{EditorConfig, MIN_SIDES};
use crate::error::ValidationError;
use std::fmt;
use std::str::FromStr;

/// Semantic name of an editable parameter, as used by the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    TranslateX,
    TranslateY,
    ScaleX,
    ScaleY,
    RotationDegrees,
    CenterX,
    CenterY,
    Length,
    AngleDegrees,
    Side,
    Width,
    Height,
    Radius,
    SideCount,
}

impl ParamKey {
    pub const ALL: [ParamKey; 14] = [
        ParamKey::TranslateX,
        ParamKey::TranslateY,
        ParamKey::ScaleX,
        ParamKey::ScaleY,
        ParamKey::RotationDegrees,
        ParamKey::CenterX,
        ParamKey::CenterY,
        ParamKey::Length,
        ParamKey::AngleDegrees,
        ParamKey::Side,
        ParamKey::Width,
        ParamKey::Height,
        ParamKey::Radius,
        ParamKey::SideCount,
    ];

    /// Callback name used by the UI layer.
    pub fn name(self) -> &'static str {
        match self {
            ParamKey::TranslateX => "translateX",
            ParamKey::TranslateY => "translateY",
            ParamKey::ScaleX => "scaleX",
            ParamKey::ScaleY => "scaleY",
            ParamKey::RotationDegrees => "rotationDegrees",
            ParamKey::CenterX => "centerX",
            ParamKey::CenterY => "centerY",
            ParamKey::Length => "length",
            ParamKey::AngleDegrees => "angleDegrees",
            ParamKey::Side => "side",
            ParamKey::Width => "width",
            ParamKey::Height => "height",
            ParamKey::Radius => "radius",
            ParamKey::SideCount => "sideCount",
        }
    }

    /// Whether this key edits the render-time transform rather than the geometry.
    pub fn is_transform(self) -> bool {
        matches!(
            self,
            ParamKey::TranslateX
                | ParamKey::TranslateY
                | ParamKey::ScaleX
                | ParamKey::ScaleY
                | ParamKey::RotationDegrees
        )
    }
}

impl fmt::Display for ParamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamKey::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| ValidationError::UnknownParam(s.to_string()))
    }
}

/// Slider description handed to the UI layer when a shape is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub key: ParamKey,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
}

impl ParamSpec {
    pub fn new(key: ParamKey, label: &'static str, min: f64, max: f64, step: f64, value: f64) -> Self {
        Self {
            key,
            label,
            min,
            max,
            step,
            value,
        }
    }

    /// Size slider (length, side, width, height, radius).
    pub(crate) fn extent(key: ParamKey, label: &'static str, value: f64, config: &EditorConfig) -> Self {
        Self::new(key, label, 0.0, config.max_extent, 0.01, value)
    }
}

pub(crate) fn finite(key: ParamKey, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValidationError::NotFinite {
            param: key.name(),
            value,
        })
    }
}

/// Validate a size parameter against the configured extent range.
pub(crate) fn extent(key: ParamKey, value: f64, config: &EditorConfig) -> Result<f64, ValidationError> {
    let value = finite(key, value)?;
    if value < config.min_extent || value > config.max_extent {
        return Err(ValidationError::OutOfRange {
            param: key.name(),
            value,
            min: config.min_extent,
            max: config.max_extent,
        });
    }
    Ok(value)
}

/// Validate a polygon side count. Fractional slider values round to nearest.
pub(crate) fn side_count(value: f64, config: &EditorConfig) -> Result<u32, ValidationError> {
    let value = finite(ParamKey::SideCount, value)?.round();
    if value < MIN_SIDES as f64 {
        return Err(ValidationError::TooFewSides(value));
    }
    if value > config.max_sides as f64 {
        return Err(ValidationError::OutOfRange {
            param: ParamKey::SideCount.name(),
            value,
            min: MIN_SIDES as f64,
            max: config.max_sides as f64,
        });
    }
    Ok(value as u32)
}

/// Clamp a dragged extent into the configured range.
pub(crate) fn clamp_extent(value: f64, config: &EditorConfig) -> f64 {
    if value.is_nan() {
        config.min_extent
    } else {
        value.clamp(config.min_extent, config.max_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for key in ParamKey::ALL {
            assert_eq!(key.name().parse::<ParamKey>().unwrap(), key);
        }
        assert!(matches!(
            "opacity".parse::<ParamKey>(),
            Err(ValidationError::UnknownParam(_))
        ));
    }

    #[test]
    fn test_extent_bounds() {
        let config = EditorConfig::default();
        assert!(extent(ParamKey::Width, 0.01, &config).is_ok());
        assert!(extent(ParamKey::Width, 30.0, &config).is_ok());
        assert!(extent(ParamKey::Width, -1.0, &config).is_err());
        assert!(extent(ParamKey::Width, 0.0, &config).is_err());
        assert!(extent(ParamKey::Width, f64::INFINITY, &config).is_err());
    }

    #[test]
    fn test_side_count() {
        let config = EditorConfig::default();
        assert_eq!(side_count(5.4, &config).unwrap(), 5);
        assert_eq!(side_count(2.0, &config), Err(ValidationError::TooFewSides(2.0)));
        assert!(side_count(f64::NAN, &config).is_err());
        assert!(side_count(1000.0, &config).is_err());
    }
}
