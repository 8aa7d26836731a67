//! User settings for pantry
//!
//! Manages the record namespace, the remote endpoint used by the cloud
//! backend, and the diagnostics filters.

use serde::{Deserialize, Serialize};

use super::paths::PantryPaths;
use crate::diagnostics::{DiagnosticsFilter, LogCategory, LogLevel};
use crate::error::PantryError;
use crate::keys::record_key;
use crate::storage::is_valid_store_key;

/// Remote service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSettings {
    /// Base URL of the remote data service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds, enforced by the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Diagnostics settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level reported
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Categories reported (empty means all)
    #[serde(default)]
    pub categories: Vec<LogCategory>,

    /// Whether reported events are appended to the diagnostics journal
    #[serde(default = "default_journal_enabled")]
    pub journal_enabled: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            categories: Vec::new(),
            journal_enabled: default_journal_enabled(),
        }
    }
}

impl LoggingSettings {
    /// Build the diagnostics filter these settings describe
    pub fn filter(&self) -> DiagnosticsFilter {
        DiagnosticsFilter::new(self.level, self.categories.iter().copied())
    }
}

/// User settings for pantry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Prefix applied to every persisted record key (`<prefix>_<key>`)
    #[serde(default = "default_namespace_prefix")]
    pub namespace_prefix: String,

    /// Remote service settings
    #[serde(default)]
    pub remote: RemoteSettings,

    /// Diagnostics settings
    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_namespace_prefix() -> String {
    "pantryapp".to_string()
}

fn default_base_url() -> String {
    "https://api.pantry.example".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_journal_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            namespace_prefix: default_namespace_prefix(),
            remote: RemoteSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PantryPaths) -> Result<Self, PantryError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| PantryError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| PantryError::Config(format!("Failed to parse settings file: {}", e)))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PantryPaths) -> Result<(), PantryError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| PantryError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| PantryError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Reject settings the storage layer cannot work with
    pub fn validate(&self) -> Result<(), PantryError> {
        if self.namespace_prefix.trim().is_empty() {
            return Err(PantryError::Config(
                "namespace_prefix cannot be empty".into(),
            ));
        }
        // Record keys are `<prefix>_<key>` file names
        if !is_valid_store_key(&record_key(&self.namespace_prefix, "stock")) {
            return Err(PantryError::Config(format!(
                "namespace_prefix {:?} may only contain ASCII letters, digits, '_', '-' and '.', and must not start with '.'",
                self.namespace_prefix
            )));
        }
        if self.remote.base_url.trim().is_empty() {
            return Err(PantryError::Config("remote.base_url cannot be empty".into()));
        }
        Ok(())
    }
}
