//! Application layer for taskboard.
//!
//! Holds the task store, the create/edit form and the dashboard state shared
//! by the CLI and the terminal UI, plus configuration loading.

/// TOML configuration (`[storage]`, `[defaults]`).
pub mod config;
/// Dashboard state machine shared by the front ends.
pub mod dashboard;
/// Create/edit form.
pub mod form;
/// Canonical task list and its mutations.
pub mod task_store;

// Re-exports for convenience
pub use config::{AppConfig, ConfigError, DefaultsConfig, StorageConfig};
pub use dashboard::{Dashboard, DashboardError, EditorState, Submitted};
pub use form::{FormError, FormField, FormMode, TaskForm};
pub use task_store::{TaskStore, TaskStoreError};
