//! Settings for the ODBC probe.
//!
//! All input comes from a JSON settings file and a couple of environment
//! variables; no command-line arguments are consumed.
//!
//! # Resolution
//! 1. `ODBC_PROBE_SETTINGS` names the settings file explicitly.
//! 2. Otherwise `<user config dir>/odbc-probe/settings.json`.
//!
//! A missing file yields defaults (the probe then relies on discovered
//! data sources alone); a malformed file is an error, since unlike an
//! absent file it is user-authored input.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ProbeError, ProbeResult};

/// Environment variable naming the settings file.
pub const SETTINGS_PATH_VAR: &str = "ODBC_PROBE_SETTINGS";

/// Environment variable carrying an override connection string.
pub const CONNECTION_STRING_VAR: &str = "ODBC_PROBE_CONNECTION_STRING";

fn default_log_level() -> String {
    "info".to_string()
}

/// Probe settings, deserialized from `settings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Default connection string, probed before any discovered data source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,

    /// Log level used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            connection_string: None,
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

impl Settings {
    /// Load settings from the resolved location (see module docs).
    pub fn load() -> ProbeResult<Self> {
        Self::load_from(&settings_path()?)
    }

    /// Load settings from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> ProbeResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ProbeError::config(format!("Could not read {}: {e}", path.display())))?;

        serde_json::from_str(&contents).map_err(|e| {
            ProbeError::config(format!("Invalid settings file {}: {e}", path.display()))
        })
    }

    /// Connection string override from the environment, if set and non-empty.
    pub fn env_connection_string() -> Option<String> {
        std::env::var(CONNECTION_STRING_VAR)
            .ok()
            .filter(|s| !s.is_empty())
    }
}

/// Settings file path: `$ODBC_PROBE_SETTINGS`, or the per-user config dir.
pub fn settings_path() -> ProbeResult<PathBuf> {
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ProbeError::config("Could not determine user config directory"))?;
    Ok(config_dir.join("odbc-probe").join("settings.json"))
}
