//! File-based storage implementation for native platforms.

use super::{SnapshotStore, StorageError, StorageResult, decode, encode};
use crate::shapes::Shape;
use std::fs;
use std::path::{Path, PathBuf};

/// File-based storage for native platforms.
///
/// Stores snapshots as JSON files in a specified directory.
pub struct FileStorage {
    /// Base directory for snapshot storage.
    base_path: PathBuf,
}

impl FileStorage {
    /// Create a new file storage with the given base directory.
    ///
    /// Creates the directory if it doesn't exist.
    pub fn new(base_path: PathBuf) -> StorageResult<Self> {
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(|e| StorageError::Io(format!("Failed to create storage directory: {e}")))?;
        }
        Ok(Self { base_path })
    }

    /// Create file storage in the default location.
    ///
    /// On Unix: `~/.local/share/sketchroom/snapshots/`
    /// On Windows: `%LOCALAPPDATA%\sketchroom\snapshots\`
    pub fn default_location() -> StorageResult<Self> {
        let base = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| StorageError::Io("Could not determine home directory".to_owned()))?;
        Self::new(base.join("sketchroom").join("snapshots"))
    }

    /// Get the file path for a snapshot key.
    fn snapshot_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.base_path.join(format!("{safe_key}.json"))
    }

    /// Get the base path.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

impl SnapshotStore for FileStorage {
    fn save(&self, key: &str, shapes: &[Shape]) -> StorageResult<()> {
        let path = self.snapshot_path(key);
        let json = encode(shapes)?;
        fs::write(&path, json).map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
    }

    fn load(&self, key: &str) -> StorageResult<Vec<Shape>> {
        let path = self.snapshot_path(key);
        if !path.exists() {
            return Err(StorageError::NotFound(key.to_owned()));
        }
        let json = fs::read_to_string(&path)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
        decode(key, &json)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.snapshot_path(key);
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|e| StorageError::Io(format!("Failed to delete {}: {e}", path.display())))?;
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        Ok(self.snapshot_path(key).exists())
    }
}
