//! Scene documents: a JSON array of shape records.
//!
//! Each record carries its kind, the variant parameters as flat fields, the
//! transform, the per-vertex colors and, for freehand shapes, the vertex
//! positions. Loading prefers the stored positions over the parameters.

use crate::color::Rgba;
use crate::config::EditorConfig;
use crate::error::{DocumentError, LoadError, LookupError, RecordError};
use crate::scene::{IdAllocator, SceneGraph};
use crate::shapes::{Line, Polygon, Rectangle, Shape, ShapeKind, ShapeParams, Square};
use crate::transform::ShapeTransform;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One shape as stored in a scene document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    /// Line direction in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_angle: Option<f64>,
    #[serde(default, alias = "sideLength", skip_serializing_if = "Option::is_none")]
    pub side: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, alias = "sidesLength", skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, alias = "sides", skip_serializing_if = "Option::is_none")]
    pub side_count: Option<u32>,
    #[serde(default)]
    pub transform: ShapeTransform,
    #[serde(default)]
    pub vertex_colors: Vec<Rgba>,
    #[serde(default)]
    pub base_color: Rgba,
    #[serde(default = "default_regular")]
    pub regular: bool,
    /// Local-space positions, present only for freehand shapes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertices: Option<Vec<[f64; 2]>>,
}

fn default_regular() -> bool {
    true
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape) -> Self {
        let mut record = Self {
            kind: shape.kind(),
            x: 0.0,
            y: 0.0,
            length: None,
            internal_angle: None,
            side: None,
            width: None,
            height: None,
            radius: None,
            side_count: None,
            transform: shape.transform,
            vertex_colors: shape.colors(),
            base_color: shape.base_color,
            regular: shape.is_regular(),
            vertices: None,
        };

        let center = match shape.params() {
            ShapeParams::Line(line) => {
                record.length = Some(line.length);
                record.internal_angle = Some(line.angle);
                line.center
            }
            ShapeParams::Square(square) => {
                record.side = Some(square.side);
                square.center
            }
            ShapeParams::Rectangle(rect) => {
                record.width = Some(rect.width);
                record.height = Some(rect.height);
                rect.center
            }
            ShapeParams::Polygon(polygon) => {
                record.radius = Some(polygon.radius);
                record.side_count = Some(polygon.sides);
                polygon.center
            }
        };
        record.x = center.x;
        record.y = center.y;

        if !shape.is_regular() {
            record.vertices = Some(shape.positions().iter().map(|p| [p.x, p.y]).collect());
        }
        record
    }

    /// Variant parameters described by this record.
    pub fn params(&self) -> Result<ShapeParams, RecordError> {
        let center = Point::new(self.x, self.y);
        let params = match self.kind {
            ShapeKind::Line => ShapeParams::Line(Line::new(
                center,
                required(self.length, "length")?,
                self.internal_angle.unwrap_or(0.0),
            )),
            ShapeKind::Square => ShapeParams::Square(Square::new(center, required(self.side, "side")?)),
            ShapeKind::Rectangle => ShapeParams::Rectangle(Rectangle::new(
                center,
                required(self.width, "width")?,
                required(self.height, "height")?,
            )),
            ShapeKind::Polygon => ShapeParams::Polygon(Polygon::new(
                center,
                required(self.radius, "radius")?,
                required(self.side_count, "sideCount")?,
            )),
        };
        Ok(params)
    }

    /// Build a shape with the next id from `ids`. Invalid parameters fail
    /// before an id is taken.
    fn into_shape(self, ids: &mut IdAllocator, config: &EditorConfig) -> Result<Shape, RecordError> {
        let mut shape = Shape::new(ids.peek(), self.params()?, self.base_color, config)?;
        ids.alloc();
        shape.transform = self.transform;
        if let (false, Some(vertices)) = (self.regular, &self.vertices) {
            let positions: Vec<Point> = vertices.iter().map(|&[x, y]| Point::new(x, y)).collect();
            shape.apply_freehand(&positions)?;
        }
        shape.apply_colors(&self.vertex_colors);
        Ok(shape)
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, RecordError> {
    value.ok_or_else(|| RecordError::Fields(format!("missing field `{}`", field)))
}

/// A freshly deserialized scene plus the records that were skipped.
#[derive(Debug)]
pub struct LoadedScene {
    pub scene: SceneGraph,
    pub errors: Vec<LoadError>,
}

/// Records for every shape in paint order.
pub fn serialize(scene: &SceneGraph) -> Vec<ShapeRecord> {
    scene.shapes().iter().map(ShapeRecord::from_shape).collect()
}

pub fn to_json(scene: &SceneGraph) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(&serialize(scene))?)
}

/// Parse a scene document into a new scene with the default configuration.
pub fn deserialize(json: &str) -> Result<LoadedScene, DocumentError> {
    deserialize_with_config(json, EditorConfig::default())
}

pub fn deserialize_with_config(json: &str, config: EditorConfig) -> Result<LoadedScene, DocumentError> {
    let mut scene = SceneGraph::with_config(config);
    let errors = scene.load_json(json)?;
    Ok(LoadedScene { scene, errors })
}

/// Split a document into its raw records. Fails only when the document as a
/// whole is unusable.
pub(crate) fn parse_document(json: &str) -> Result<Vec<Value>, DocumentError> {
    match serde_json::from_str(json)? {
        Value::Array(records) => Ok(records),
        _ => Err(DocumentError::NotAnArray),
    }
}

/// Turn raw records into shapes, skipping and reporting the ones that fail.
pub(crate) fn build_shapes(
    records: Vec<Value>,
    ids: &mut IdAllocator,
    config: &EditorConfig,
) -> (Vec<Shape>, Vec<LoadError>) {
    let mut shapes = Vec::with_capacity(records.len());
    let mut errors = Vec::new();

    for (index, value) in records.into_iter().enumerate() {
        match build_shape(value, ids, config) {
            Ok(shape) => shapes.push(shape),
            Err(error) => {
                log::warn!("skipping record {}: {}", index, error);
                errors.push(LoadError { index, error });
            }
        }
    }
    (shapes, errors)
}

/// Bring a record in the legacy layout up to date: a numeric `type`
/// (0 line, 1 square, 2 rectangle, 3 polygon) instead of `kind`, and
/// `translation`, `angleInRadians` and `scale` at the top level.
fn upgrade_legacy(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    if !map.contains_key("kind") {
        if let Some(tag) = map.get("type") {
            let kind = match tag.as_u64() {
                Some(0) => ShapeKind::Line.name().to_string(),
                Some(1) => ShapeKind::Square.name().to_string(),
                Some(2) => ShapeKind::Rectangle.name().to_string(),
                Some(3) => ShapeKind::Polygon.name().to_string(),
                _ => tag.to_string(),
            };
            map.insert("kind".into(), Value::String(kind));
        }
    }

    if !map.contains_key("transform") {
        let mut transform = serde_json::Map::new();
        for (legacy, field) in [("translation", "translation"), ("angleInRadians", "rotation"), ("scale", "scale")] {
            if let Some(v) = map.remove(legacy) {
                transform.insert(field.into(), v);
            }
        }
        if !transform.is_empty() {
            map.insert("transform".into(), Value::Object(transform));
        }
    }
}

fn build_shape(mut value: Value, ids: &mut IdAllocator, config: &EditorConfig) -> Result<Shape, RecordError> {
    upgrade_legacy(&mut value);
    match value.get("kind") {
        None | Some(Value::Null) => return Err(LookupError::MissingKind.into()),
        Some(Value::String(kind)) => {
            kind.parse::<ShapeKind>()?;
        }
        Some(other) => return Err(LookupError::UnknownKind(other.to_string()).into()),
    }

    let record: ShapeRecord = serde_json::from_value(value).map_err(|e| RecordError::Fields(e.to_string()))?;
    record.into_shape(ids, config)
}
