//! Error types shared across the scene model.

use crate::shapes::{ShapeId, ShapeKind};
use thiserror::Error;

/// A shape parameter or edit was rejected. The shape keeps its prior state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{param} must be finite, got {value}")]
    NotFinite { param: &'static str, value: f64 },
    #[error("{param} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        param: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error("polygon needs at least 3 sides, got {0}")]
    TooFewSides(f64),
    #[error("vertex {index} out of range (shape has {count} vertices)")]
    VertexOutOfRange { index: usize, count: usize },
    #[error("parameter {param} does not apply to a {kind}")]
    NotApplicable { param: &'static str, kind: ShapeKind },
    #[error("unknown parameter: {0}")]
    UnknownParam(String),
}

/// A referenced shape or shape kind does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no shape with id {0}")]
    UnknownShape(ShapeId),
    #[error("unknown shape kind: {0}")]
    UnknownKind(String),
    #[error("record has no kind")]
    MissingKind,
}

/// The persisted document as a whole could not be read or written.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("malformed scene document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("scene document must be an array of shape records")]
    NotAnArray,
}

/// Why a single record was skipped during a scene load.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid record fields: {0}")]
    Fields(String),
}

/// A skipped record in a scene load, identified by its position in the document.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("record {index}: {error}")]
pub struct LoadError {
    pub index: usize,
    pub error: RecordError,
}

/// Renderer failures.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("buffer layout mismatch: {0}")]
    BufferLayout(String),
    #[error("index {index} out of range for {count} vertices")]
    IndexOutOfRange { index: u32, count: usize },
    #[error("render failed: {0}")]
    Failed(String),
}
