//! Local snapshot persistence.
//!
//! A snapshot is the editor's shape list, stored as a JSON array under a key.
//! Persistence is best effort: the editor never depends on it succeeding.

mod autosave;
#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

pub use autosave::{AUTOSAVE_KEY, AutoSaveManager, DEFAULT_AUTOSAVE_INTERVAL_SECS};
#[cfg(not(target_arch = "wasm32"))]
pub use autosave::create_default_storage;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::shapes::Shape;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Snapshot not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for snapshot storage backends.
///
/// Calls are synchronous: the editor is single-threaded and the backends
/// (memory, local files) answer immediately.
pub trait SnapshotStore: Send + Sync {
    /// Save a shape list.
    fn save(&self, key: &str, shapes: &[Shape]) -> StorageResult<()>;

    /// Load a shape list.
    fn load(&self, key: &str) -> StorageResult<Vec<Shape>>;

    /// Delete a snapshot. Missing keys are not an error.
    fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a snapshot exists.
    fn exists(&self, key: &str) -> StorageResult<bool>;
}

pub(crate) fn encode(shapes: &[Shape]) -> StorageResult<String> {
    serde_json::to_string(shapes).map_err(|e| StorageError::Serialization(e.to_string()))
}

pub(crate) fn decode(key: &str, json: &str) -> StorageResult<Vec<Shape>> {
    serde_json::from_str(json).map_err(|e| StorageError::Serialization(format!("Failed to parse {key}: {e}")))
}
