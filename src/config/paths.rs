//! Path management for the user directory
//!
//! ## Path Resolution Order
//!
//! 1. `USERMGMT_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/usermgmt` or `~/.config/usermgmt`
//! 3. Windows: `%APPDATA%\usermgmt`

use std::path::PathBuf;

use crate::error::DirectoryError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "USERMGMT_DATA_DIR";

/// Manages all paths used by the directory
#[derive(Debug, Clone)]
pub struct DirectoryPaths {
    base_dir: PathBuf,
}

impl DirectoryPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application data directory can be found.
    pub fn new() -> Result<Self, DirectoryError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths under a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the table snapshots
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    pub fn log_entries_file(&self) -> PathBuf {
        self.data_dir().join("logs.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), DirectoryError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| DirectoryError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| DirectoryError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Whether `init` has been run here
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, DirectoryError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                DirectoryError::Config("Could not determine HOME directory".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("usermgmt"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, DirectoryError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| DirectoryError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("usermgmt"))
}
