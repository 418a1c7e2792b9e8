//! In-memory storage implementation.

use super::{SnapshotStore, StorageError, StorageResult, decode, encode};
use crate::shapes::Shape;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Snapshots are kept as JSON text, the same form a browser's local storage holds.
#[derive(Default)]
pub struct MemoryStorage {
    snapshots: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store raw text under `key`, bypassing serialization.
    pub fn put_raw(&self, key: &str, text: &str) -> StorageResult<()> {
        let mut snapshots = self.snapshots.write().map_err(lock_error)?;
        snapshots.insert(key.to_owned(), text.to_owned());
        Ok(())
    }
}

fn lock_error<E: std::fmt::Display>(e: E) -> StorageError {
    StorageError::Other(format!("Lock error: {e}"))
}

impl SnapshotStore for MemoryStorage {
    fn save(&self, key: &str, shapes: &[Shape]) -> StorageResult<()> {
        let json = encode(shapes)?;
        self.put_raw(key, &json)
    }

    fn load(&self, key: &str) -> StorageResult<Vec<Shape>> {
        let snapshots = self.snapshots.read().map_err(lock_error)?;
        let json = snapshots
            .get(key)
            .ok_or_else(|| StorageError::NotFound(key.to_owned()))?;
        decode(key, json)
    }

    fn delete(&self, key: &str) -> StorageResult<()> {
        let mut snapshots = self.snapshots.write().map_err(lock_error)?;
        snapshots.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> StorageResult<bool> {
        let snapshots = self.snapshots.read().map_err(lock_error)?;
        Ok(snapshots.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Circle, Line};
    use kurbo::Point;

    fn shapes() -> Vec<Shape> {
        vec![
            Shape::Circle(Circle::new(Point::new(5.0, 5.0), 3.0)),
            Shape::Line(Line::new(Point::ZERO, Point::new(9.0, 9.0))),
        ]
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        storage.save("test", &shapes()).unwrap();
        assert_eq!(storage.load("test").unwrap(), shapes());
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        assert!(matches!(storage.load("nonexistent"), Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        assert!(!storage.exists("test").unwrap());
        storage.save("test", &shapes()).unwrap();
        assert!(storage.exists("test").unwrap());
        storage.delete("test").unwrap();
        assert!(!storage.exists("test").unwrap());
        storage.delete("test").unwrap();
    }

    #[test]
    fn test_corrupt_snapshot() {
        let storage = MemoryStorage::new();
        storage.put_raw("bad", "[{\"type\":\"blob\"}]").unwrap();
        assert!(matches!(storage.load("bad"), Err(StorageError::Serialization(_))));
    }
}
