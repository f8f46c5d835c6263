//! Database configuration
//!
//! A config file is a single JSON object. Every field is optional:
//!
//! ```json
//! {
//!   "directory": "./data",
//!   "sync_mode": "fsync",
//!   "log_level": "warn"
//! }
//! ```
//!
//! - `directory`: where database directories (`<name>.litedoc`) live
//! - `sync_mode`: `fsync` syncs after every write, `none` leaves it to the OS
//! - `log_level`: minimum severity for the JSON logger

mod errors;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::observability::{log_event_with_fields, Event, Severity};

pub use errors::{ConfigError, ConfigResult};

/// Durability of individual writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// fsync after every record (batches sync once at the end)
    #[default]
    Fsync,
    /// Never fsync explicitly; only on close
    None,
}

impl SyncMode {
    pub fn syncs_each_write(&self) -> bool {
        matches!(self, SyncMode::Fsync)
    }
}

/// Settings shared by every database handle opened with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    #[serde(default)]
    pub sync_mode: SyncMode,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_directory() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            sync_mode: SyncMode::default(),
            log_level: default_log_level(),
        }
    }
}

impl DatabaseConfig {
    /// Config with the given directory and defaults for everything else.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            ..Self::default()
        }
    }

    pub fn with_sync_mode(mut self, sync_mode: SyncMode) -> Self {
        self.sync_mode = sync_mode;
        self
    }

    /// Load and validate a config file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: DatabaseConfig = serde_json::from_str(&content)?;
        config.validate()?;

        let path_str = path.display().to_string();
        log_event_with_fields(Event::ConfigLoaded, &[("path", &path_str)]);

        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.directory.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("directory must not be empty".into()));
        }

        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Parsed `log_level`; WARN if it does not parse.
    pub fn log_severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Warn)
    }
}
