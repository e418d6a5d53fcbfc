//! Scene graph: ordered shapes, active selection and id allocation.

use crate::animation::{FadeHandle, FadeIn, FadeStatus, Instant};
use crate::config::EditorConfig;
use crate::controls::{NullObserver, ShapeObserver};
use crate::error::{DocumentError, LoadError, LookupError, RenderError, ValidationError};
use crate::persistence;
use crate::render::{Renderer, Resolution};
use crate::shapes::{ParamKey, Shape, ShapeId, ShapeParams};

/// Hands out shape ids. Never reuses one, even after the scene is replaced.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn alloc(&mut self) -> ShapeId {
        let id = ShapeId(self.next);
        self.next += 1;
        id
    }

    /// Id the next call to `alloc` will return.
    pub fn peek(&self) -> ShapeId {
        ShapeId(self.next)
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Shapes in paint order (first drawn first) plus the active selection.
pub struct SceneGraph {
    shapes: Vec<Shape>,
    active: Option<ShapeId>,
    ids: IdAllocator,
    fades: Vec<FadeIn>,
    observer: Box<dyn ShapeObserver>,
    config: EditorConfig,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("shapes", &self.shapes)
            .field("active", &self.active)
            .field("ids", &self.ids)
            .field("fades", &self.fades.len())
            .finish()
    }
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self::with_allocator(config, IdAllocator::new())
    }

    /// Build a scene that continues an existing id sequence.
    pub fn with_allocator(config: EditorConfig, ids: IdAllocator) -> Self {
        Self {
            shapes: Vec::new(),
            active: None,
            ids,
            fades: Vec::new(),
            observer: Box::new(NullObserver),
            config,
        }
    }

    /// Route selection notifications to `observer`.
    pub fn set_observer(&mut self, observer: Box<dyn ShapeObserver>) {
        self.observer = observer;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Shapes in paint order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn get_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn active(&self) -> Option<ShapeId> {
        self.active
    }

    pub fn active_shape(&self) -> Option<&Shape> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_shape_mut(&mut self) -> Option<&mut Shape> {
        let id = self.active?;
        self.get_mut(id)
    }

    /// Create a shape from `params`, append it and make it active.
    pub fn create_shape(&mut self, params: ShapeParams) -> Result<ShapeId, ValidationError> {
        let mut shape = Shape::new(self.ids.peek(), params, self.config.base_color, &self.config)?;
        let id = self.ids.alloc();

        if self.config.fade.enabled {
            shape.opacity = 0.0;
            self.fades.push(FadeIn::new(id, &self.config.fade, Instant::now()));
        }

        log::debug!("created {} {}", shape.kind(), id);
        self.shapes.push(shape);
        self.select(id);
        Ok(id)
    }

    /// Make `id` the active shape. Unknown ids leave the selection unchanged.
    pub fn set_active(&mut self, id: ShapeId) -> Result<(), LookupError> {
        if self.get(id).is_none() {
            log::warn!("cannot select {}: no such shape", id);
            return Err(LookupError::UnknownShape(id));
        }
        self.select(id);
        Ok(())
    }

    /// Drop the selection, notifying the previous active shape.
    pub fn clear_active(&mut self) {
        if let Some(previous) = self.active.take() {
            if let Some(shape) = self.shapes.iter().find(|s| s.id() == previous) {
                shape.on_deselected(self.observer.as_mut());
            }
        }
    }

    fn select(&mut self, id: ShapeId) {
        if self.active == Some(id) {
            return;
        }
        self.clear_active();
        if let Some(shape) = self.shapes.iter().find(|s| s.id() == id) {
            shape.on_selected(self.observer.as_mut(), &self.config);
            self.active = Some(id);
        }
    }

    /// Apply a parameter edit to shape `id`.
    pub fn set_param(&mut self, id: ShapeId, key: ParamKey, value: f64) -> Result<(), SceneError> {
        let config = &self.config;
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id() == id)
            .ok_or(LookupError::UnknownShape(id))?;
        shape.set_param(key, value, config).inspect_err(|e| {
            log::warn!("rejected {} = {} on {}: {}", key, value, id, e);
        })?;
        Ok(())
    }

    /// Apply a parameter edit, by UI callback name, to the active shape.
    pub fn set_active_param(&mut self, name: &str, value: f64) -> Result<(), SceneError> {
        let key: ParamKey = name.parse()?;
        let id = self.active.ok_or(SceneError::NoActiveShape)?;
        self.set_param(id, key, value)
    }

    /// Rebuild shape `id` from its parameters, discarding freehand edits.
    pub fn regenerate(&mut self, id: ShapeId) -> Result<(), LookupError> {
        let shape = self.get_mut(id).ok_or(LookupError::UnknownShape(id))?;
        shape.regenerate();
        Ok(())
    }

    /// Cancel handle for the fade on shape `id`, if one is still running.
    pub fn fade_handle(&self, id: ShapeId) -> Option<FadeHandle> {
        self.fades.iter().find(|f| f.shape() == id).map(FadeIn::handle)
    }

    /// Whether any fade is still running.
    pub fn is_animating(&self) -> bool {
        !self.fades.is_empty()
    }

    /// Advance running fades to `now`. Finished and cancelled fades are dropped.
    pub fn tick(&mut self, now: Instant) {
        let shapes = &mut self.shapes;
        self.fades.retain_mut(|fade| {
            let Some(shape) = shapes.iter_mut().find(|s| s.id() == fade.shape()) else {
                return false;
            };
            fade.poll(now, &mut shape.opacity) == FadeStatus::Running
        });
    }

    /// Draw every shape in paint order.
    pub fn render(&self, renderer: &mut dyn Renderer, resolution: Resolution) -> Result<(), RenderError> {
        for shape in &self.shapes {
            let buffers = shape.generate_vertices();
            renderer.upload(&buffers.positions, &buffers.colors, &buffers.indices)?;
            renderer.draw(buffers.primitive, &shape.transform.matrix(), resolution)?;
        }
        Ok(())
    }

    /// Replace all shapes with those in a scene document.
    ///
    /// A malformed document leaves the scene untouched. Otherwise records that
    /// fail are skipped and reported; the rest are loaded with fresh ids and
    /// no active selection.
    pub fn load_json(&mut self, json: &str) -> Result<Vec<LoadError>, DocumentError> {
        let records = persistence::parse_document(json)?;
        self.clear_active();
        self.fades.clear();
        let (shapes, errors) = persistence::build_shapes(records, &mut self.ids, &self.config);
        self.shapes = shapes;
        log::info!("loaded {} shapes, skipped {}", self.shapes.len(), errors.len());
        Ok(errors)
    }

    /// Serialize every shape to a scene document.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        persistence::to_json(self)
    }
}

/// Errors from scene-level edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("no active shape")]
    NoActiveShape,
}
