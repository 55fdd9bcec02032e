//! Board configuration loaded from TOML.
//!
//! ```toml
//! custom_columns = ["Review", "Blocked"]
//! notification_capacity = 20
//! bug_report_url = "https://example.com/taskboard/issues"
//!
//! [remote]
//! base_url = "http://localhost:8080/api/v1"
//! token = "..."
//! timeout_secs = 10
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::board::domain::Notifications;

/// Default link shown on the recovery screen.
pub const DEFAULT_BUG_REPORT_URL: &str = "https://example.com/taskboard/issues";

/// Default timeout for remote calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Errors returned while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Board settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Extra columns appended after the defaults at startup.
    pub custom_columns: Vec<String>,
    /// Maximum number of notifications retained.
    pub notification_capacity: usize,
    /// Link shown on the recovery screen.
    pub bug_report_url: String,
    /// Remote task service settings.
    pub remote: RemoteConfig,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            custom_columns: Vec::new(),
            notification_capacity: Notifications::DEFAULT_CAPACITY,
            bug_report_url: DEFAULT_BUG_REPORT_URL.to_owned(),
            remote: RemoteConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the text is not valid.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read or
    /// [`ConfigError::Parse`] when its content is not valid.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let text = std::fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Remote task service settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// API root, e.g. `http://localhost:8080/api/v1`. When absent the
    /// in-memory collaborator is used.
    pub base_url: Option<String>,
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl RemoteConfig {
    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
