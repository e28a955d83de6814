//! User settings for logbook
//!
//! Manages user preferences including backup retention, compression, and
//! log rotation thresholds.

use serde::{Deserialize, Serialize};

use super::paths::LogbookPaths;
use crate::error::LogbookError;

/// Backup creation and retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupSettings {
    /// Number of backups to keep per section (and for full backups)
    pub max_backups_per_section: usize,
    /// Delete backups older than this many days; 0 or negative disables
    pub retention_days: i64,
    /// Whether to gzip backup artifacts
    pub use_compression: bool,
}

impl Default for BackupSettings {
    fn default() -> Self {
        Self {
            max_backups_per_section: 5,
            retention_days: 30,
            use_compression: true,
        }
    }
}

/// User settings for logbook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Backup policy
    #[serde(default)]
    pub backup: BackupSettings,

    /// Section log files larger than this are flagged for rotation
    #[serde(default = "default_rotation_threshold")]
    pub rotation_threshold_bytes: u64,

    /// Minutes between automatic full backups in the shell; 0 disables
    #[serde(default = "default_auto_backup_minutes")]
    pub auto_backup_minutes: u64,
}

fn default_schema_version() -> u32 {
    1
}

fn default_rotation_threshold() -> u64 {
    5 * 1024 * 1024
}

fn default_auto_backup_minutes() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            backup: BackupSettings::default(),
            rotation_threshold_bytes: default_rotation_threshold(),
            auto_backup_minutes: default_auto_backup_minutes(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &LogbookPaths) -> Result<Self, LogbookError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| LogbookError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                LogbookError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Create default settings
            let settings = Settings::default();
            // Don't save yet - let caller decide when to persist
            Ok(settings)
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LogbookPaths) -> Result<(), LogbookError> {
        // Ensure the config directory exists
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| LogbookError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(&settings_path, contents)
            .map_err(|e| LogbookError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
