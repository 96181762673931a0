//! Persistence adapter for taskboard: the task list and the theme flag.

/// Key-value backends.
pub mod backend;
/// Error types.
pub mod error;
/// Stored layout of the task list.
pub mod schema;

pub use backend::{FileStore, KeyValueStore, MemoryStore};
pub use error::StorageError;

use taskboard_core::{Task, Theme};
use tracing::{debug, info, warn};

use crate::schema::Decoded;

/// Key holding the serialized task list.
pub const TASKS_KEY: &str = "tasks";
/// Key holding the theme flag.
pub const THEME_KEY: &str = "theme";
/// Key receiving an unreadable task payload before it is replaced.
pub const TASKS_BACKUP_KEY: &str = "tasks.bak";

/// Reads and writes the task list and theme flag through a [`KeyValueStore`].
#[derive(Debug)]
pub struct StorageAdapter<K> {
    backend: K,
}

impl<K: KeyValueStore> StorageAdapter<K> {
    /// Wrap a backend.
    #[must_use]
    pub const fn new(backend: K) -> Self {
        Self { backend }
    }

    /// Borrow the backend.
    #[must_use]
    pub const fn backend(&self) -> &K {
        &self.backend
    }

    /// Load the stored task list.
    ///
    /// Absent data loads as an empty list. Content that cannot be interpreted
    /// is copied to [`TASKS_BACKUP_KEY`] and also loads as an empty list, so the
    /// next save does not silently destroy it.
    ///
    /// # Errors
    /// Returns an error only when the backend itself fails.
    pub fn load_tasks(&mut self) -> Result<Vec<Task>, StorageError> {
        let Some(raw) = self.backend.get(TASKS_KEY)? else {
            debug!("No stored tasks");
            return Ok(Vec::new());
        };

        let mut tasks = match schema::decode(&raw) {
            Decoded::Current(tasks) => tasks,
            Decoded::Migrated(tasks) => {
                info!(count = tasks.len(), "Migrated legacy task list");
                tasks
            }
            Decoded::Malformed(reason) => {
                warn!(%reason, backup = TASKS_BACKUP_KEY, "Stored task list is unreadable; starting empty");
                self.backend.set(TASKS_BACKUP_KEY, &raw)?;
                return Ok(Vec::new());
            }
        };

        schema::dedupe_ids(&mut tasks);
        debug!(count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    /// Replace the stored task list with `tasks`, preserving order.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save_tasks(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let encoded = schema::encode(tasks)?;
        self.backend.set(TASKS_KEY, &encoded)?;
        debug!(count = tasks.len(), "Saved tasks");
        Ok(())
    }

    /// Load the theme flag; anything but `"dark"` (including absence) is light.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be read.
    pub fn load_theme(&self) -> Result<Theme, StorageError> {
        Ok(self
            .backend
            .get(THEME_KEY)?
            .map_or_else(Theme::default, |raw| Theme::from_stored(&raw)))
    }

    /// Persist the theme flag.
    ///
    /// # Errors
    /// Returns an error if the backend cannot be written.
    pub fn save_theme(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.backend.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use taskboard_core::{Priority, TaskFields};

    fn adapter() -> StorageAdapter<MemoryStore> {
        StorageAdapter::new(MemoryStore::new())
    }

    #[test]
    fn missing_tasks_load_empty_without_writes() -> Result<()> {
        let mut adapter = adapter();
        assert!(adapter.load_tasks()?.is_empty());
        assert_eq!(adapter.backend().writes(), 0);
        Ok(())
    }

    #[test]
    fn save_then_load_preserves_order_and_fields() -> Result<()> {
        let mut adapter = adapter();
        let tasks = vec![
            Task::new(TaskFields::new("first", "a").with_priority(Priority::High)),
            Task::new(TaskFields::new("second", "b").with_category(Some("home".into()))),
            Task::new(TaskFields::new("third", "c")),
        ];
        adapter.save_tasks(&tasks)?;
        assert_eq!(adapter.load_tasks()?, tasks);
        Ok(())
    }

    #[test]
    fn malformed_payload_is_backed_up_and_loads_empty() -> Result<()> {
        let mut adapter = StorageAdapter::new(MemoryStore::new().with_entry(TASKS_KEY, "{oops"));
        assert!(adapter.load_tasks()?.is_empty());
        assert_eq!(adapter.backend().raw(TASKS_BACKUP_KEY), Some("{oops"));
        assert_eq!(adapter.backend().raw(TASKS_KEY), Some("{oops"));
        Ok(())
    }

    #[test]
    fn theme_defaults_to_light() -> Result<()> {
        let mut adapter = adapter();
        assert_eq!(adapter.load_theme()?, Theme::Light);
        adapter.save_theme(Theme::Dark)?;
        assert_eq!(adapter.backend().raw(THEME_KEY), Some("dark"));
        assert_eq!(adapter.load_theme()?, Theme::Dark);

        let adapter = StorageAdapter::new(MemoryStore::new().with_entry(THEME_KEY, "blue"));
        assert_eq!(adapter.load_theme()?, Theme::Light);
        Ok(())
    }

    #[test]
    fn duplicate_ids_are_remapped_on_load() -> Result<()> {
        let first = Task::new(TaskFields::new("a", "b"));
        let mut second = Task::new(TaskFields::new("c", "d"));
        second.id = first.id;
        let mut adapter = adapter();
        adapter.save_tasks(&[first.clone(), second])?;

        let loaded = adapter.load_tasks()?;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], first);
        assert_ne!(loaded[1].id, first.id);
        Ok(())
    }
}
