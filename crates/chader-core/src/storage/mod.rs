//! Storage backends for scene documents.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryStorage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;

use crate::error::{DocumentError, LoadError};
use crate::scene::SceneGraph;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] DocumentError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A keyed store of scene documents (the JSON text produced by
/// [`SceneGraph::to_json`]).
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a document.
    fn save(&self, id: &str, document: &str) -> StorageResult<()>;

    /// Load a document.
    fn load(&self, id: &str) -> StorageResult<String>;

    /// Delete a document. Deleting a missing document is not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all document IDs.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a document exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}

/// A keyed store of scene documents (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    fn save(&self, id: &str, document: &str) -> StorageResult<()>;

    fn load(&self, id: &str) -> StorageResult<String>;

    fn delete(&self, id: &str) -> StorageResult<()>;

    fn list(&self) -> StorageResult<Vec<String>>;

    fn exists(&self, id: &str) -> StorageResult<bool>;
}

/// Serialize `scene` and store it under `id`.
pub fn save_scene(storage: &dyn Storage, id: &str, scene: &SceneGraph) -> StorageResult<()> {
    let json = scene.to_json()?;
    storage.save(id, &json)?;
    log::info!("saved scene {} ({} shapes)", id, scene.len());
    Ok(())
}

/// Replace the shapes of `scene` with the document stored under `id`.
/// Returns the records that were skipped.
pub fn load_scene(storage: &dyn Storage, id: &str, scene: &mut SceneGraph) -> StorageResult<Vec<LoadError>> {
    let json = storage.load(id)?;
    Ok(scene.load_json(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::shapes::{Polygon, ShapeParams};
    use kurbo::Point;

    #[test]
    fn test_save_and_load_scene() {
        let storage = MemoryStorage::new();
        let mut scene = SceneGraph::with_config(EditorConfig::without_fade());
        scene
            .create_shape(ShapeParams::Polygon(Polygon::new(Point::ZERO, 2.0, 5)))
            .unwrap();
        save_scene(&storage, "doc", &scene).unwrap();

        let mut restored = SceneGraph::with_config(EditorConfig::without_fade());
        let errors = load_scene(&storage, "doc", &mut restored).unwrap();
        assert!(errors.is_empty());
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.shapes()[0].params(), scene.shapes()[0].params());
    }

    #[test]
    fn test_load_corrupt_document() {
        let storage = MemoryStorage::new();
        storage.save("bad", "not json").unwrap();
        let mut scene = SceneGraph::new();
        let result = load_scene(&storage, "bad", &mut scene);
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
