//! Application configuration loaded from `config.toml`.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taskboard_core::Priority;
use thiserror::Error;

const APP_DIR: &str = "taskboard";
const CONFIG_FILE: &str = "config.toml";

/// Configuration validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `defaults.priority` does not name a priority.
    #[error("defaults.priority: {0}")]
    InvalidPriority(#[from] taskboard_core::UnknownPriority),
    /// `storage.dir` is set to an empty string.
    #[error("storage.dir must not be empty")]
    EmptyDataDir,
    /// Neither `storage.dir` nor a platform data directory is available.
    #[error("could not determine a data directory; set storage.dir")]
    NoDataDir,
}

/// Application settings read from the `[storage]` and `[defaults]` tables of
/// `config.toml`. Other tables are left to the front end.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where task data lives.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Values preselected in new tasks.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// `[storage]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// `[defaults]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Priority selected in a fresh create form.
    #[serde(default = "DefaultsConfig::default_priority_name")]
    pub priority: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            priority: Self::default_priority_name(),
        }
    }
}

impl DefaultsConfig {
    fn default_priority_name() -> String {
        Priority::default().as_str().to_owned()
    }
}

impl AppConfig {
    /// Default configuration file location (`<config dir>/taskboard/config.toml`).
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from `path`, or from [`Self::default_path`] when `None`.
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };
        Self::from_path(&path)
    }

    /// Load from an explicit file path; a missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read, parsed or validated.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents =
            fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml_str(&contents).with_context(|| format!("failed to load {}", path.display()))
    }

    /// Parse and validate TOML text.
    ///
    /// # Errors
    /// Returns an error for invalid TOML or invalid values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde alone cannot.
    ///
    /// # Errors
    /// Returns the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.defaults.priority.parse::<Priority>()?;
        if self
            .storage
            .dir
            .as_ref()
            .is_some_and(|dir| dir.as_os_str().is_empty())
        {
            return Err(ConfigError::EmptyDataDir);
        }
        Ok(())
    }

    /// Priority for new tasks, falling back to low for unparsable values.
    #[must_use]
    pub fn default_priority(&self) -> Priority {
        self.defaults.priority.parse().unwrap_or_default()
    }

    /// Resolve the data directory: `override_dir`, then `storage.dir`, then
    /// `<data dir>/taskboard`.
    ///
    /// # Errors
    /// Returns [`ConfigError::NoDataDir`] when nothing is configured and the
    /// platform has no data directory.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf, ConfigError> {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.storage.dir.clone())
            .or_else(|| dirs::data_dir().map(|dir| dir.join(APP_DIR)))
            .ok_or(ConfigError::NoDataDir)
    }
}
