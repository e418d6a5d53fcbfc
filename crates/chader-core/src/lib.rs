//! Chader Core Library
//!
//! Geometry and scene model for the Chader shape editor: parametric shapes,
//! affine transforms, vertex editing, convex hull re-triangulation and scene
//! documents. Drawing goes through the [`render::Renderer`] trait.

pub mod animation;
pub mod color;
pub mod config;
pub mod controls;
pub mod editor;
pub mod error;
pub mod hull;
pub mod persistence;
pub mod render;
pub mod scene;
pub mod shapes;
pub mod storage;
pub mod transform;

pub use animation::{FadeHandle, FadeIn, FadeStatus};
pub use color::Rgba;
pub use config::{EditorConfig, FadeConfig};
pub use controls::{ControlPanel, NullObserver, ShapeObserver};
pub use editor::{VertexEditor, drag_vertex, find_closest_vertex};
pub use error::{DocumentError, LoadError, LookupError, RecordError, RenderError, ValidationError};
pub use persistence::{LoadedScene, ShapeRecord};
pub use render::{Primitive, Renderer, Resolution, VertexBuffers, screen_to_world, world_to_screen};
pub use scene::{IdAllocator, SceneError, SceneGraph};
pub use shapes::{Line, ParamKey, ParamSpec, Polygon, Rectangle, Shape, ShapeId, ShapeKind, ShapeParams, Square};
pub use transform::{Mat3, ShapeTransform};
