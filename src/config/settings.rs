//! User settings for the directory
//!
//! Persisted as `config.json` in the base directory. Missing keys fall back
//! to their defaults so older files keep loading.

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use super::paths::DirectoryPaths;
use crate::error::DirectoryError;

/// Settings for the directory and its CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Load the fixture users when `init` runs on an empty directory
    #[serde(default = "default_true")]
    pub seed_on_init: bool,

    /// Whether `user add` writes a "Created" audit entry
    #[serde(default = "default_true")]
    pub audit_creates: bool,

    /// Date format for display (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// `tracing` filter used when `USERMGMT_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_schema_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            seed_on_init: true,
            audit_creates: true,
            date_format: default_date_format(),
            log_filter: default_log_filter(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &DirectoryPaths) -> Result<Self, DirectoryError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not written until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| DirectoryError::Io(format!("Failed to read settings file: {}", e)))?;

        let settings: Settings = serde_json::from_str(&contents)
            .map_err(|e| DirectoryError::Config(format!("Failed to parse settings file: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values that would fail later at display time
    pub fn validate(&self) -> Result<(), DirectoryError> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            return Err(DirectoryError::Config(format!(
                "Invalid date_format '{}'",
                self.date_format
            )));
        }
        Ok(())
    }

    /// Save settings to disk
    pub fn save(&self, paths: &DirectoryPaths) -> Result<(), DirectoryError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| DirectoryError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| DirectoryError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
