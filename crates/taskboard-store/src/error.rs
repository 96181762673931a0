//! Error types for taskboard storage operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the persistence medium.
///
/// Malformed stored content is not an error: it is reported through logs and
/// loads as an empty list.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key contains characters that cannot be mapped to the backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The data directory could not be created.
    #[error("Failed to create data directory {path}: {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Reading a stored value failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File backing the key.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Writing a stored value failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File backing the key.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Encoding the task list failed.
    #[error("Failed to encode tasks: {0}")]
    Encode(#[from] serde_json::Error),
}
