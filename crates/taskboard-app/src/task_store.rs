//! Canonical in-memory task list, mirrored to storage after every mutation.

use taskboard_core::{Task, TaskFields, TaskId};
use taskboard_store::{KeyValueStore, StorageAdapter, StorageError};
use thiserror::Error;
use tracing::debug;

/// Errors raised by [`TaskStore`] operations.
#[derive(Debug, Error)]
pub enum TaskStoreError {
    /// Persisting or loading through the adapter failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    /// A list position outside `0..len` was requested.
    #[error("index {index} is out of range for {len} tasks")]
    IndexOutOfRange {
        /// Requested position.
        index: usize,
        /// Length of the list at the time of the call.
        len: usize,
    },
}

/// Ordered task list backed by a [`StorageAdapter`].
///
/// Every successful mutating call writes the full list exactly once, including
/// calls that end up changing nothing because the id is unknown. There is no
/// rollback: when the write fails the in-memory change stays applied.
#[derive(Debug)]
pub struct TaskStore<K> {
    adapter: StorageAdapter<K>,
    tasks: Vec<Task>,
}

impl<K: KeyValueStore> TaskStore<K> {
    /// Load the persisted list and take ownership of the adapter.
    ///
    /// # Errors
    /// Returns an error when the backend cannot be read.
    pub fn open(mut adapter: StorageAdapter<K>) -> Result<Self, TaskStoreError> {
        let tasks = adapter.load_tasks()?;
        debug!(count = tasks.len(), "Task store ready");
        Ok(Self { adapter, tasks })
    }

    /// All tasks in list order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Position of a task in the full list.
    #[must_use]
    pub fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    /// Borrow the storage adapter.
    #[must_use]
    pub const fn adapter(&self) -> &StorageAdapter<K> {
        &self.adapter
    }

    /// Mutably borrow the storage adapter (theme persistence goes through here).
    pub const fn adapter_mut(&mut self) -> &mut StorageAdapter<K> {
        &mut self.adapter
    }

    /// Append a new incomplete task with a freshly minted id.
    ///
    /// # Errors
    /// Returns an error when the list cannot be saved.
    pub fn add(&mut self, fields: TaskFields) -> Result<TaskId, TaskStoreError> {
        let task = Task::new(fields);
        let id = task.id;
        self.tasks.push(task);
        self.save()?;
        debug!(%id, "Added task");
        Ok(id)
    }

    /// Append a fully built task. Returns `false` when its id is already taken,
    /// in which case the list is left as is.
    ///
    /// # Errors
    /// Returns an error when the list cannot be saved.
    pub fn insert(&mut self, task: Task) -> Result<bool, TaskStoreError> {
        let inserted = if self.position(task.id).is_some() {
            debug!(id = %task.id, "Ignoring insert of an existing id");
            false
        } else {
            self.tasks.push(task);
            true
        };
        self.save()?;
        Ok(inserted)
    }

    /// Replace the editable fields of a task in place and reopen it. Returns
    /// `false` when the id is unknown.
    ///
    /// # Errors
    /// Returns an error when the list cannot be saved.
    pub fn update(&mut self, id: TaskId, fields: TaskFields) -> Result<bool, TaskStoreError> {
        let updated = self.task_mut(id).is_some_and(|task| {
            task.apply_fields(fields);
            true
        });
        self.save()?;
        Ok(updated)
    }

    /// Remove a task, returning it when it existed.
    ///
    /// # Errors
    /// Returns an error when the list cannot be saved.
    pub fn delete(&mut self, id: TaskId) -> Result<Option<Task>, TaskStoreError> {
        let removed = self.position(id).map(|index| self.tasks.remove(index));
        self.save()?;
        Ok(removed)
    }

    /// Flip the completion flag, returning the new value when the task exists.
    ///
    /// # Errors
    /// Returns an error when the list cannot be saved.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<Option<bool>, TaskStoreError> {
        let completed = self.task_mut(id).map(|task| {
            task.completed = !task.completed;
            task.completed
        });
        self.save()?;
        Ok(completed)
    }

    /// Move the task at `from_index` to `to_index`, shifting the tasks in
    /// between. Both indices address the full list.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::IndexOutOfRange`] without touching the list or
    /// storage when either index is outside the list, or a storage error when
    /// the list cannot be saved.
    pub fn reorder(&mut self, from_index: usize, to_index: usize) -> Result<(), TaskStoreError> {
        self.check_index(from_index)?;
        self.check_index(to_index)?;
        let task = self.tasks.remove(from_index);
        self.tasks.insert(to_index, task);
        self.save()
    }

    /// Move a task to `to_index` in the full list.
    ///
    /// Returns the index the task occupied before the call, or `None` for an
    /// unknown id. Nothing is written when the task already sits at
    /// `to_index` or the id is unknown, so repeating the same move is free.
    ///
    /// # Errors
    /// Returns [`TaskStoreError::IndexOutOfRange`] when `to_index` is outside
    /// the list, or a storage error when the list cannot be saved.
    pub fn move_task(&mut self, id: TaskId, to_index: usize) -> Result<Option<usize>, TaskStoreError> {
        self.check_index(to_index)?;
        let Some(from_index) = self.position(id) else {
            return Ok(None);
        };
        if from_index != to_index {
            let task = self.tasks.remove(from_index);
            self.tasks.insert(to_index, task);
            self.save()?;
        }
        Ok(Some(from_index))
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    fn check_index(&self, index: usize) -> Result<(), TaskStoreError> {
        let len = self.tasks.len();
        if index < len {
            Ok(())
        } else {
            Err(TaskStoreError::IndexOutOfRange { index, len })
        }
    }

    fn save(&mut self) -> Result<(), TaskStoreError> {
        self.adapter.save_tasks(&self.tasks)?;
        Ok(())
    }
}
