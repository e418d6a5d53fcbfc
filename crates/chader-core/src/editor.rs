//! Direct vertex manipulation: hit-testing and pointer drags.

use crate::config::EditorConfig;
use crate::error::{LookupError, ValidationError};
use crate::scene::{SceneError, SceneGraph};
use crate::shapes::{Shape, ShapeId};
use kurbo::{Point, Vec2};

/// Index of the vertex nearest to `point`.
///
/// Vertices are compared in local space after bringing them up to date with
/// the parameters. Ties go to the lowest index and there is no distance
/// threshold, so some vertex is always returned for a non-empty shape.
pub fn find_closest_vertex(shape: &mut Shape, point: Point) -> usize {
    shape.relocate_vertices();
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (i, vertex) in shape.vertices().iter().enumerate() {
        let distance = vertex.position.distance_squared(point);
        if distance < best_distance {
            best = i;
            best_distance = distance;
        }
    }
    best
}

/// Pixel delta to world delta. Screen Y grows downward, world Y upward.
pub fn pixel_delta(dx: f64, dy: f64, config: &EditorConfig) -> Vec2 {
    Vec2::new(dx, -dy) / config.pixels_per_unit
}

/// Drag vertex `index` by a pointer delta given in screen pixels.
pub fn drag_vertex(
    shape: &mut Shape,
    index: usize,
    dx: f64,
    dy: f64,
    config: &EditorConfig,
) -> Result<(), ValidationError> {
    shape.translate_vertex(index, pixel_delta(dx, dy, config), config)
}

/// Pointer-driven drag session over the active shape.
#[derive(Debug, Default, Clone)]
pub struct VertexEditor {
    grabbed: Option<(ShapeId, usize)>,
}

impl VertexEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shape and vertex currently held.
    pub fn grabbed(&self) -> Option<(ShapeId, usize)> {
        self.grabbed
    }

    pub fn is_dragging(&self) -> bool {
        self.grabbed.is_some()
    }

    /// Grab the active shape's vertex nearest to `point`. Returns `None`
    /// when nothing is selected.
    pub fn begin_drag(&mut self, scene: &mut SceneGraph, point: Point) -> Option<usize> {
        let shape = scene.active_shape_mut()?;
        let index = find_closest_vertex(shape, point);
        log::debug!("grabbed vertex {} of {}", index, shape.id());
        self.grabbed = Some((shape.id(), index));
        Some(index)
    }

    /// Move the held vertex by a pointer delta in pixels. A no-op when
    /// nothing is held.
    pub fn drag_to(&mut self, scene: &mut SceneGraph, dx: f64, dy: f64) -> Result<(), SceneError> {
        let Some((id, index)) = self.grabbed else {
            return Ok(());
        };
        let config = scene.config().clone();
        let shape = scene.get_mut(id).ok_or(LookupError::UnknownShape(id))?;
        drag_vertex(shape, index, dx, dy, &config)?;
        Ok(())
    }

    pub fn end_drag(&mut self) {
        self.grabbed = None;
    }
}
