//! Auto-save of the editor's shape list.

use crate::editor::Editor;
use crate::storage::{SnapshotStore, StorageError, StorageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default auto-save interval in seconds.
pub const DEFAULT_AUTOSAVE_INTERVAL_SECS: u64 = 30;

/// Key the local snapshot is stored under.
pub const AUTOSAVE_KEY: &str = "sketchroom-canvas";

/// Periodically persists the editor's shapes.
///
/// Changes are detected by comparing [`Editor::revision`] with the revision
/// last written, so hosts only need to call [`maybe_save`](Self::maybe_save)
/// from their frame loop.
pub struct AutoSaveManager<S: SnapshotStore> {
    storage: Arc<S>,
    interval: Duration,
    last_save: Option<Instant>,
    /// Whether the canvas has unsaved changes.
    dirty: bool,
    /// Editor revision of the last save or restore.
    saved_revision: u64,
}

impl<S: SnapshotStore> AutoSaveManager<S> {
    /// Create a new auto-save manager with the given storage backend.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            interval: Duration::from_secs(DEFAULT_AUTOSAVE_INTERVAL_SECS),
            last_save: None,
            dirty: false,
            saved_revision: 0,
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Mark the canvas as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Mark dirty if the editor's shapes changed since the last save.
    pub fn observe(&mut self, editor: &Editor) {
        if editor.revision() != self.saved_revision {
            self.dirty = true;
        }
    }

    /// Check if enough time has passed for an auto-save.
    pub fn should_save(&self) -> bool {
        if !self.dirty {
            return false;
        }
        match self.last_save {
            Some(last) => last.elapsed() >= self.interval,
            None => true,
        }
    }

    /// Save if dirty and the interval elapsed. Returns true if a save happened.
    pub fn maybe_save(&mut self, editor: &Editor) -> StorageResult<bool> {
        self.observe(editor);
        if !self.should_save() {
            return Ok(false);
        }
        self.save(editor)?;
        Ok(true)
    }

    /// Save immediately.
    pub fn save(&mut self, editor: &Editor) -> StorageResult<()> {
        self.storage.save(AUTOSAVE_KEY, &editor.snapshot())?;
        self.last_save = Some(Instant::now());
        self.dirty = false;
        self.saved_revision = editor.revision();
        Ok(())
    }

    /// Load the saved snapshot into the editor, which publishes it as a bulk replace.
    ///
    /// Missing, empty or corrupt snapshots are logged and ignored. Returns
    /// whether anything was restored.
    pub fn restore(&mut self, editor: &mut Editor) -> bool {
        let shapes = match self.storage.load(AUTOSAVE_KEY) {
            Ok(shapes) => shapes,
            Err(StorageError::NotFound(_)) => {
                log::debug!("no saved snapshot");
                return false;
            }
            Err(e) => {
                log::warn!("ignoring saved snapshot: {e}");
                return false;
            }
        };
        if shapes.is_empty() {
            return false;
        }
        log::info!("restoring {} shapes from local snapshot", shapes.len());
        editor.load_shapes(shapes);
        self.dirty = false;
        self.saved_revision = editor.revision();
        self.last_save = Some(Instant::now());
        true
    }

    /// Drop the saved snapshot.
    pub fn discard(&self) -> StorageResult<()> {
        self.storage.delete(AUTOSAVE_KEY)
    }

    /// Get a reference to the storage backend.
    pub fn storage(&self) -> &Arc<S> {
        &self.storage
    }
}

/// Storage under the platform data directory.
#[cfg(not(target_arch = "wasm32"))]
pub fn create_default_storage() -> StorageResult<Arc<crate::storage::FileStorage>> {
    Ok(Arc::new(crate::storage::FileStorage::default_location()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Edit;
    use crate::shapes::{Rectangle, Shape};
    use crate::storage::MemoryStorage;
    use crate::tools::ToolKind;
    use kurbo::Point;

    fn editor_with_rect() -> Editor {
        let mut editor = Editor::default();
        editor.apply_remote(Edit::Add(Shape::Rectangle(Rectangle::new(Point::ZERO, 40.0, 40.0))));
        editor
    }

    #[test]
    fn test_dirty_tracking() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage);
        let editor = Editor::default();

        assert!(!manager.should_save());
        assert!(!manager.maybe_save(&editor).unwrap());
        manager.mark_dirty();
        assert!(manager.should_save());
        assert!(manager.maybe_save(&editor).unwrap());
        assert!(!manager.is_dirty());

        // Interval not elapsed yet.
        manager.mark_dirty();
        assert!(!manager.should_save());
        manager.set_interval(Duration::ZERO);
        assert!(manager.should_save());
    }

    #[test]
    fn test_editor_changes_mark_dirty() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        manager.set_interval(Duration::ZERO);
        let mut editor = Editor::default();
        assert!(!manager.maybe_save(&editor).unwrap());

        editor.set_tool(ToolKind::Rectangle);
        editor.pointer_down(Point::new(0.0, 0.0));
        editor.pointer_move(Point::new(20.0, 20.0));
        editor.pointer_up(Point::new(20.0, 20.0));
        assert!(manager.maybe_save(&editor).unwrap());
        assert_eq!(storage.load(AUTOSAVE_KEY).unwrap(), editor.snapshot());
        assert!(!manager.maybe_save(&editor).unwrap());

        // Remote edits count too.
        editor.apply_remote(Edit::Clear);
        manager.observe(&editor);
        assert!(manager.is_dirty());
        assert!(manager.maybe_save(&editor).unwrap());
        assert!(storage.load(AUTOSAVE_KEY).unwrap().is_empty());
    }

    #[test]
    fn test_restore_is_not_dirty() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        manager.save(&editor_with_rect()).unwrap();
        manager.set_interval(Duration::ZERO);

        let mut editor = Editor::default();
        assert!(manager.restore(&mut editor));
        manager.observe(&editor);
        assert!(!manager.is_dirty());
    }

    #[test]
    fn test_save_then_restore() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        let source = editor_with_rect();
        manager.save(&source).unwrap();

        let mut target = Editor::default();
        assert!(manager.restore(&mut target));
        assert_eq!(target.snapshot(), source.snapshot());
        assert_eq!(target.take_edits(), vec![Edit::ReplaceAll(source.snapshot())]);
    }

    #[test]
    fn test_restore_missing_or_corrupt_is_ignored() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        let mut editor = Editor::default();
        assert!(!manager.restore(&mut editor));

        storage.put_raw(AUTOSAVE_KEY, "{broken").unwrap();
        assert!(!manager.restore(&mut editor));

        storage.put_raw(AUTOSAVE_KEY, "[]").unwrap();
        assert!(!manager.restore(&mut editor));
        assert!(editor.take_edits().is_empty());
    }

    #[test]
    fn test_discard() {
        let storage = Arc::new(MemoryStorage::new());
        let mut manager = AutoSaveManager::new(storage.clone());
        manager.save(&editor_with_rect()).unwrap();
        manager.discard().unwrap();
        assert!(!storage.exists(AUTOSAVE_KEY).unwrap());
    }
}
