//! Shape definitions for the scene.

mod line;
pub mod params;
mod polygon;
mod rectangle;
mod square;

pub use line::Line;
pub use params::{ParamKey, ParamSpec};
pub use polygon::Polygon;
pub use rectangle::Rectangle;
pub use square::Square;

use crate::color::Rgba;
use crate::config::EditorConfig;
use crate::controls::ShapeObserver;
use crate::error::ValidationError;
use crate::render::{Primitive, VertexBuffers};
use crate::transform::ShapeTransform;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for shapes. Allocated monotonically, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShapeId(pub u64);

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tag distinguishing the shape variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Line,
    Square,
    Rectangle,
    Polygon,
}

impl ShapeKind {
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Square => "square",
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Polygon => "polygon",
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for ShapeKind {
    type Err = crate::error::LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(ShapeKind::Line),
            "square" => Ok(ShapeKind::Square),
            "rectangle" => Ok(ShapeKind::Rectangle),
            "polygon" => Ok(ShapeKind::Polygon),
            _ => Err(crate::error::LookupError::UnknownKind(s.to_string())),
        }
    }
}

/// A vertex in local (pre-transform) space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point,
    pub color: Rgba,
}

/// What a parameter edit did to the vertex positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamEffect {
    /// Positions follow the parameters again.
    Relocate,
    /// Positions rebuilt from the parameters and the shape is regular again.
    Regenerate,
    /// Freehand positions were adjusted in place.
    Freehand,
}

/// Per-variant geometry behavior.
pub trait ShapeTrait {
    fn kind(&self) -> ShapeKind;

    /// Nominal center in local space.
    fn center(&self) -> Point;

    /// Number of vertices for the current topology.
    fn vertex_count(&self) -> usize;

    /// Vertex positions derived purely from the parameters.
    fn regular_positions(&self) -> Vec<Point>;

    /// Render index list over `positions`.
    fn triangulate(&self, positions: &[Point], regular: bool) -> (Primitive, Vec<u32>);

    /// Current value of a geometry parameter, `None` if it does not apply.
    fn param(&self, key: ParamKey) -> Option<f64>;

    /// Validate and apply a geometry parameter. `freehand` holds the current
    /// vertex positions when the shape is no longer regular.
    fn set_param(
        &mut self,
        key: ParamKey,
        value: f64,
        config: &EditorConfig,
        freehand: Option<&mut [Point]>,
    ) -> Result<ParamEffect, ValidationError>;

    /// Move vertex `index` by `delta` world units, updating `positions` and
    /// whatever parameters the variant derives from them.
    fn drag_vertex(&mut self, positions: &mut [Point], index: usize, delta: Vec2, config: &EditorConfig);

    /// Sliders for the geometry parameters.
    fn controls(&self, config: &EditorConfig) -> Vec<ParamSpec>;

    /// Check every parameter against its allowed range.
    fn validate(&self, config: &EditorConfig) -> Result<(), ValidationError>;
}

/// Variant-specific parameters (the tag plus its data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeParams {
    Line(Line),
    Square(Square),
    Rectangle(Rectangle),
    Polygon(Polygon),
}

impl ShapeParams {
    fn geometry(&self) -> &dyn ShapeTrait {
        match self {
            ShapeParams::Line(s) => s,
            ShapeParams::Square(s) => s,
            ShapeParams::Rectangle(s) => s,
            ShapeParams::Polygon(s) => s,
        }
    }

    fn geometry_mut(&mut self) -> &mut dyn ShapeTrait {
        match self {
            ShapeParams::Line(s) => s,
            ShapeParams::Square(s) => s,
            ShapeParams::Rectangle(s) => s,
            ShapeParams::Polygon(s) => s,
        }
    }

    pub fn kind(&self) -> ShapeKind {
        self.geometry().kind()
    }

    pub fn validate(&self, config: &EditorConfig) -> Result<(), ValidationError> {
        self.geometry().validate(config)
    }

    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            ShapeParams::Polygon(p) => Some(p),
            _ => None,
        }
    }
}

/// A shape in the scene: parameters, vertices, colors and transform.
///
/// While `regular`, vertex positions are a pure function of the parameters.
/// After a vertex drag the stored vertices become the source of truth.
#[derive(Debug, Clone)]
pub struct Shape {
    pub(crate) id: ShapeId,
    pub(crate) params: ShapeParams,
    pub transform: ShapeTransform,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) regular: bool,
    /// Fallback for vertices without a color of their own.
    pub base_color: Rgba,
    /// Render-time alpha multiplier, animated by the fade-in.
    pub(crate) opacity: f32,
}

impl Shape {
    /// Create a regular shape. Parameters are validated first.
    pub fn new(
        id: ShapeId,
        params: ShapeParams,
        base_color: Rgba,
        config: &EditorConfig,
    ) -> Result<Self, ValidationError> {
        params.validate(config)?;
        let mut shape = Self {
            id,
            params,
            transform: ShapeTransform::default(),
            vertices: Vec::new(),
            regular: true,
            base_color,
            opacity: 1.0,
        };
        shape.relocate_vertices();
        Ok(shape)
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.params.kind()
    }

    pub fn params(&self) -> &ShapeParams {
        &self.params
    }

    pub fn is_regular(&self) -> bool {
        self.regular
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn positions(&self) -> Vec<Point> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    pub fn colors(&self) -> Vec<Rgba> {
        self.vertices.iter().map(|v| v.color).collect()
    }

    /// Bring the stored vertices in line with the parameters while regular.
    /// Freehand vertices are left alone.
    pub fn relocate_vertices(&mut self) {
        if self.regular {
            let positions = self.params.geometry().regular_positions();
            self.rebuild(positions);
        }
    }

    /// Replace positions, keeping colors by index. New indices get the base color.
    fn rebuild(&mut self, positions: Vec<Point>) {
        let base = self.base_color;
        let colors = self.colors();
        self.vertices = positions
            .into_iter()
            .enumerate()
            .map(|(i, position)| Vertex {
                position,
                color: colors.get(i).copied().unwrap_or(base),
            })
            .collect();
    }

    fn write_positions(&mut self, positions: &[Point]) {
        for (vertex, &position) in self.vertices.iter_mut().zip(positions) {
            vertex.position = position;
        }
    }

    /// Discard freehand edits and rebuild the vertices from the parameters.
    pub fn regenerate(&mut self) {
        self.regular = true;
        self.relocate_vertices();
    }

    /// Flat buffers for rendering. Pure: reads either the parameters (regular)
    /// or the stored vertices (freehand).
    pub fn generate_vertices(&self) -> VertexBuffers {
        let geometry = self.params.geometry();
        let positions = if self.regular {
            geometry.regular_positions()
        } else {
            self.positions()
        };
        let (primitive, indices) = geometry.triangulate(&positions, self.regular);

        let colors = (0..positions.len())
            .flat_map(|i| {
                let color = self.vertices.get(i).map_or(self.base_color, |v| v.color);
                color.fade(self.opacity).to_array()
            })
            .collect();

        VertexBuffers {
            positions: positions.iter().flat_map(|p| [p.x as f32, p.y as f32]).collect(),
            colors,
            indices,
            primitive,
        }
    }

    /// Current value of any parameter, transform included.
    pub fn param(&self, key: ParamKey) -> Option<f64> {
        match key {
            ParamKey::TranslateX => Some(self.transform.translation.x),
            ParamKey::TranslateY => Some(self.transform.translation.y),
            ParamKey::ScaleX => Some(self.transform.scale.x),
            ParamKey::ScaleY => Some(self.transform.scale.y),
            ParamKey::RotationDegrees => Some(self.transform.rotation_degrees()),
            _ => self.params.geometry().param(key),
        }
    }

    /// Apply a parameter change. Transform keys never touch the vertices;
    /// geometry keys go through the variant and regenerate as needed. On
    /// error the shape is unchanged.
    pub fn set_param(&mut self, key: ParamKey, value: f64, config: &EditorConfig) -> Result<(), ValidationError> {
        if key.is_transform() {
            let value = params::finite(key, value)?;
            match key {
                ParamKey::TranslateX => self.transform.translation.x = value,
                ParamKey::TranslateY => self.transform.translation.y = value,
                ParamKey::ScaleX => self.transform.scale.x = value,
                ParamKey::ScaleY => self.transform.scale.y = value,
                _ => self.transform.set_rotation_degrees(value),
            }
            return Ok(());
        }

        let mut positions = self.positions();
        let freehand = if self.regular { None } else { Some(positions.as_mut_slice()) };
        let mut params = self.params.clone();
        let effect = params.geometry_mut().set_param(key, value, config, freehand)?;
        self.params = params;

        match effect {
            ParamEffect::Relocate if self.regular => self.relocate_vertices(),
            ParamEffect::Relocate => {
                let positions = self.params.geometry().regular_positions();
                self.write_positions(&positions);
            }
            ParamEffect::Regenerate => self.regenerate(),
            ParamEffect::Freehand => self.write_positions(&positions),
        }
        log::debug!("shape {} {} = {}", self.id, key, value);
        Ok(())
    }

    /// Apply a parameter by its UI callback name.
    pub fn set_named_param(&mut self, name: &str, value: f64, config: &EditorConfig) -> Result<(), ValidationError> {
        self.set_param(name.parse()?, value, config)
    }

    /// Move vertex `index` by `delta` world units. The shape becomes freehand.
    pub fn translate_vertex(&mut self, index: usize, delta: Vec2, config: &EditorConfig) -> Result<(), ValidationError> {
        self.relocate_vertices();
        let count = self.vertices.len();
        if index >= count {
            return Err(ValidationError::VertexOutOfRange { index, count });
        }
        if !delta.x.is_finite() || !delta.y.is_finite() {
            return Err(ValidationError::NotFinite {
                param: "delta",
                value: if delta.x.is_finite() { delta.y } else { delta.x },
            });
        }

        let mut positions = self.positions();
        self.params.geometry_mut().drag_vertex(&mut positions, index, delta, config);
        self.write_positions(&positions);
        self.regular = false;
        Ok(())
    }

    pub fn set_vertex_color(&mut self, index: usize, color: Rgba) -> Result<(), ValidationError> {
        let count = self.vertices.len();
        let vertex = self
            .vertices
            .get_mut(index)
            .ok_or(ValidationError::VertexOutOfRange { index, count })?;
        vertex.color = color;
        Ok(())
    }

    /// Recolor every vertex and the base color.
    pub fn set_color(&mut self, color: Rgba) {
        self.base_color = color;
        self.vertices.iter_mut().for_each(|v| v.color = color);
    }

    /// Replace vertex colors by index; missing entries fall back to the base color.
    pub(crate) fn apply_colors(&mut self, colors: &[Rgba]) {
        let base = self.base_color;
        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            vertex.color = colors.get(i).copied().unwrap_or(base);
        }
    }

    /// Install freehand positions. Rejected unless the count matches the topology.
    pub(crate) fn apply_freehand(&mut self, positions: &[Point]) -> Result<(), ValidationError> {
        let count = self.params.geometry().vertex_count();
        if positions.len() != count {
            return Err(ValidationError::VertexOutOfRange {
                index: positions.len(),
                count,
            });
        }
        if let Some(bad) = positions.iter().find(|p| !p.x.is_finite() || !p.y.is_finite()) {
            return Err(ValidationError::NotFinite {
                param: "vertex",
                value: if bad.x.is_finite() { bad.y } else { bad.x },
            });
        }
        self.regular = false;
        self.write_positions(positions);
        Ok(())
    }

    /// Sliders for the transform and the geometry parameters.
    pub fn controls(&self, config: &EditorConfig) -> Vec<ParamSpec> {
        let t = &self.transform;
        let mut specs = vec![
            ParamSpec::new(ParamKey::TranslateX, "Position-x", -15.0, 15.0, 0.01, t.translation.x),
            ParamSpec::new(ParamKey::TranslateY, "Position-y", -15.0, 15.0, 0.01, t.translation.y),
            ParamSpec::new(ParamKey::ScaleX, "Scale-x", -10.0, 10.0, 0.01, t.scale.x),
            ParamSpec::new(ParamKey::ScaleY, "Scale-y", -10.0, 10.0, 0.01, t.scale.y),
            ParamSpec::new(ParamKey::RotationDegrees, "Angle", 0.0, 360.0, 1.0, t.rotation_degrees()),
        ];
        specs.extend(self.params.geometry().controls(config));
        specs
    }

    /// Notify the UI layer that this shape gained the selection.
    pub fn on_selected(&self, observer: &mut dyn ShapeObserver, config: &EditorConfig) {
        observer.shape_selected(self.id, self.kind(), self.controls(config));
    }

    /// Notify the UI layer that this shape lost the selection.
    pub fn on_deselected(&self, observer: &mut dyn ShapeObserver) {
        observer.shape_deselected(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(params: ShapeParams) -> Shape {
        Shape::new(ShapeId(1), params, Rgba::BASE, &EditorConfig::default()).unwrap()
    }

    #[test]
    fn test_vertex_counts() {
        assert_eq!(shape(ShapeParams::Line(Line::new(Point::ZERO, 1.0, 0.0))).vertices().len(), 2);
        assert_eq!(shape(ShapeParams::Square(Square::new(Point::ZERO, 1.0))).vertices().len(), 4);
        assert_eq!(
            shape(ShapeParams::Rectangle(Rectangle::new(Point::ZERO, 1.0, 2.0))).vertices().len(),
            4
        );
        assert_eq!(
            shape(ShapeParams::Polygon(Polygon::new(Point::ZERO, 1.0, 6))).vertices().len(),
            7
        );
    }

    #[test]
    fn test_invalid_params_rejected_at_construction() {
        let config = EditorConfig::default();
        let result = Shape::new(
            ShapeId(1),
            ShapeParams::Polygon(Polygon::new(Point::ZERO, 1.0, 2)),
            Rgba::BASE,
            &config,
        );
        assert!(matches!(result, Err(ValidationError::TooFewSides(_))));
        let result = Shape::new(
            ShapeId(1),
            ShapeParams::Line(Line::new(Point::ZERO, -1.0, 0.0)),
            Rgba::BASE,
            &config,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_is_idempotent() {
        let s = shape(ShapeParams::Polygon(Polygon::new(Point::new(1.0, 2.0), 3.0, 9)));
        assert_eq!(s.generate_vertices(), s.generate_vertices());
    }

    #[test]
    fn test_line_renders_as_lines() {
        let s = shape(ShapeParams::Line(Line::new(Point::ZERO, 2.0, 0.0)));
        let buffers = s.generate_vertices();
        assert_eq!(buffers.primitive, Primitive::Lines);
        assert_eq!(buffers.indices, vec![0, 1]);
        assert_eq!(buffers.positions, vec![-1.0, 0.0, 1.0, 0.0]);
        assert_eq!(buffers.colors.len(), 8);
    }

    #[test]
    fn test_transform_params_leave_vertices() {
        let config = EditorConfig::default();
        let mut s = shape(ShapeParams::Square(Square::new(Point::ZERO, 2.0)));
        let before = s.positions();
        s.set_named_param("translateX", 3.0, &config).unwrap();
        s.set_named_param("rotationDegrees", 90.0, &config).unwrap();
        s.set_named_param("scaleY", -2.0, &config).unwrap();
        assert_eq!(s.positions(), before);
        assert_eq!(s.transform.translation.x, 3.0);
        assert!((s.transform.rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert_eq!(s.param(ParamKey::ScaleY), Some(-2.0));
    }

    #[test]
    fn test_rejected_edit_keeps_state() {
        let config = EditorConfig::default();
        let mut s = shape(ShapeParams::Polygon(Polygon::new(Point::ZERO, 1.0, 5)));
        assert!(s.set_param(ParamKey::SideCount, 1.0, &config).is_err());
        assert!(s.set_param(ParamKey::Width, 1.0, &config).is_err());
        assert!(s.set_named_param("bogus", 1.0, &config).is_err());
        assert!(s.set_param(ParamKey::TranslateX, f64::NAN, &config).is_err());
        assert_eq!(s.vertices().len(), 6);
        assert_eq!(s.transform, ShapeTransform::IDENTITY);
    }

    #[test]
    fn test_side_count_preserves_colors_by_index() {
        let config = EditorConfig::default();
        let mut s = shape(ShapeParams::Polygon(Polygon::new(Point::ZERO, 1.0, 5)));
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);
        s.set_vertex_color(2, red).unwrap();
        s.set_vertex_color(5, red).unwrap();
        s.translate_vertex(1, Vec2::new(0.5, 0.0), &config).unwrap();
        assert!(!s.is_regular());

        s.set_param(ParamKey::SideCount, 4.0, &config).unwrap();
        assert!(s.is_regular());
        assert_eq!(s.vertices().len(), 5);
        assert_eq!(s.vertices()[2].color, red);

        s.set_param(ParamKey::SideCount, 8.0, &config).unwrap();
        assert_eq!(s.vertices().len(), 9);
        assert_eq!(s.vertices()[2].color, red);
        assert_eq!(s.vertices()[5].color, Rgba::BASE);
        assert_eq!(s.vertices()[8].color, Rgba::BASE);
    }

    #[test]
    fn test_freehand_center_shift_keeps_edits() {
        let config = EditorConfig::default();
        let mut s = shape(ShapeParams::Polygon(Polygon::new(Point::ZERO, 1.0, 4)));
        s.translate_vertex(1, Vec2::new(1.0, 0.0), &config).unwrap();
        let dragged = s.vertices()[1].position;
        s.set_param(ParamKey::CenterX, 2.0, &config).unwrap();
        assert!(!s.is_regular());
        assert!((s.vertices()[1].position.x - (dragged.x + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_opacity_scales_alpha() {
        let mut s = shape(ShapeParams::Square(Square::new(Point::ZERO, 1.0)));
        s.opacity = 0.5;
        let buffers = s.generate_vertices();
        assert!((buffers.colors[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_vertex_color_out_of_range() {
        let mut s = shape(ShapeParams::Line(Line::new(Point::ZERO, 1.0, 0.0)));
        assert_eq!(
            s.set_vertex_color(2, Rgba::BLACK),
            Err(ValidationError::VertexOutOfRange { index: 2, count: 2 })
        );
    }
}
