//! Path management for pantry
//!
//! Provides XDG-compliant path resolution for configuration, data, and the
//! small-state store.
//!
//! ## Path Resolution Order
//!
//! 1. `PANTRY_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/pantry-cli` or `~/.config/pantry-cli`
//! 3. Windows: `%APPDATA%\pantry-cli`

use std::path::PathBuf;

use crate::error::PantryError;

/// Manages all paths used by pantry
#[derive(Debug, Clone)]
pub struct PantryPaths {
    /// Base directory for all pantry data
    base_dir: PathBuf,
}

impl PantryPaths {
    /// Create a new PantryPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, PantryError> {
        let base_dir = if let Ok(custom) = std::env::var("PANTRY_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create PantryPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/pantry-cli/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory holding one file per persisted record
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the small-state directory (remote identity)
    pub fn state_dir(&self) -> PathBuf {
        self.base_dir.join("state")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the diagnostics journal
    pub fn diagnostics_log(&self) -> PathBuf {
        self.base_dir.join("diagnostics.log")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), PantryError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PantryError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| PantryError::Io(format!("Failed to create data directory: {}", e)))?;

        std::fs::create_dir_all(self.state_dir())
            .map_err(|e| PantryError::Io(format!("Failed to create state directory: {}", e)))?;

        Ok(())
    }

    /// Check if pantry has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, PantryError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| PantryError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("pantry-cli"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, PantryError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| PantryError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("pantry-cli"))
}
