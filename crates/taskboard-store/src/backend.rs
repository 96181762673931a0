//! Key-value string stores backing the adapter.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::StorageError;

/// Minimal persistence medium: opaque string values addressed by string keys.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when absent.
    ///
    /// # Errors
    /// Returns an error when the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    /// Returns an error when the medium cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<K: KeyValueStore + ?Sized> KeyValueStore for Box<K> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Directory-backed store: one file per key.
///
/// Writes land in a temporary file inside the same directory which is then
/// renamed over the target, so readers never observe a half-written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a data directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| StorageError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                // Invalid UTF-8 is handed on as text so the decoder reports it as malformed.
                let text = String::from_utf8(bytes)
                    .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
                Ok(Some(text))
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read { path, source }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let write_err = |source: std::io::Error| StorageError::Write {
            path: path.clone(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(value.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&path).map_err(|err| write_err(err.error))?;

        debug!(key, bytes = value.len(), path = %path.display(), "Stored value");
        Ok(())
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a value; seeding does not count as a write.
    #[must_use]
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Number of `set` calls performed so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Raw stored value, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn file_store_roundtrip_and_missing_keys() -> Result<()> {
        let dir = tempdir()?;
        let mut store = FileStore::open(dir.path().join("nested").join("data"))?;
        assert_eq!(store.get("tasks")?, None);

        store.set("tasks", "[]")?;
        assert_eq!(store.get("tasks")?.as_deref(), Some("[]"));

        store.set("tasks", "{\"version\":1,\"tasks\":[]}")?;
        assert_eq!(
            store.get("tasks")?.as_deref(),
            Some("{\"version\":1,\"tasks\":[]}")
        );
        Ok(())
    }

    #[test]
    fn file_store_rejects_path_like_keys() -> Result<()> {
        let dir = tempdir()?;
        let mut store = FileStore::open(dir.path())?;
        for key in ["", "../escape", ".hidden", "a/b"] {
            assert!(
                matches!(store.set(key, "x"), Err(StorageError::InvalidKey(_))),
                "key {key:?} must be rejected"
            );
        }
        Ok(())
    }

    #[test]
    fn file_store_passes_invalid_utf8_through_lossily() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("tasks"), [0xff, 0xfe, b'['])?;
        let store = FileStore::open(dir.path())?;
        let Some(value) = store.get("tasks")? else {
            panic!("value must be present");
        };
        assert!(value.ends_with('['));
        Ok(())
    }

    #[test]
    fn memory_store_counts_writes() -> Result<()> {
        let mut store = MemoryStore::new().with_entry("theme", "dark");
        assert_eq!(store.writes(), 0);
        store.set("theme", "light")?;
        store.set("tasks", "[]")?;
        assert_eq!(store.writes(), 2);
        assert_eq!(store.raw("theme"), Some("light"));
        Ok(())
    }

    #[test]
    fn boxed_stores_delegate() -> Result<()> {
        let mut boxed: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        boxed.set("k", "v")?;
        assert_eq!(boxed.get("k")?.as_deref(), Some("v"));
        Ok(())
    }
}
