//! Path management for logbook
//!
//! Provides XDG-compliant path resolution for configuration, section data,
//! and backups.
//!
//! ## Path Resolution Order
//!
//! 1. `LOGBOOK_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/logbook` or `~/.config/logbook`
//! 3. Windows: `%APPDATA%\logbook`

use std::path::PathBuf;

use crate::error::LogbookError;

/// Manages all paths used by logbook
#[derive(Debug, Clone)]
pub struct LogbookPaths {
    /// Base directory for all logbook data
    base_dir: PathBuf,
}

impl LogbookPaths {
    /// Create a new LogbookPaths instance
    ///
    /// Path resolution:
    /// 1. `LOGBOOK_DATA_DIR` env var (explicit override)
    /// 2. Unix: `$XDG_CONFIG_HOME/logbook` or `~/.config/logbook`
    /// 3. Windows: `%APPDATA%\logbook`
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self, LogbookError> {
        let base_dir = if let Ok(custom) = std::env::var("LOGBOOK_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create LogbookPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory (~/.config/logbook/ or equivalent)
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the sections directory (~/.config/logbook/sections/)
    pub fn sections_dir(&self) -> PathBuf {
        self.base_dir.join("sections")
    }

    /// Get the backup directory (~/.config/logbook/backups/)
    pub fn backup_dir(&self) -> PathBuf {
        self.base_dir.join("backups")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the metadata sidecar (sections/metadata.json)
    pub fn metadata_file(&self) -> PathBuf {
        self.sections_dir().join("metadata.json")
    }

    /// Get the path to one section's log file (sections/<id>.txt)
    pub fn section_file(&self, section_id: &str) -> PathBuf {
        self.sections_dir().join(format!("{}.txt", section_id))
    }

    /// Ensure all required directories exist
    ///
    /// Creates:
    /// - Base directory (~/.config/logbook/)
    /// - Sections directory (~/.config/logbook/sections/)
    /// - Backup directory (~/.config/logbook/backups/)
    pub fn ensure_directories(&self) -> Result<(), LogbookError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| LogbookError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.sections_dir())
            .map_err(|e| LogbookError::Io(format!("Failed to create sections directory: {}", e)))?;

        std::fs::create_dir_all(self.backup_dir())
            .map_err(|e| LogbookError::Io(format!("Failed to create backup directory: {}", e)))?;

        Ok(())
    }

    /// Check if logbook has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

/// Resolve the default data directory path based on platform
#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, LogbookError> {
    // Unix (Linux/macOS): Use XDG_CONFIG_HOME if set, otherwise ~/.config
    let config_base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
    Ok(config_base.join("logbook"))
}

/// Resolve the default data directory path based on platform
#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, LogbookError> {
    // Windows: Use APPDATA
    let appdata = std::env::var("APPDATA")
        .map_err(|_| LogbookError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("logbook"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.sections_dir(), temp_dir.path().join("sections"));
        assert_eq!(paths.backup_dir(), temp_dir.path().join("backups"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        paths.ensure_directories().unwrap();

        assert!(paths.sections_dir().exists());
        assert!(paths.backup_dir().exists());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(
            paths.metadata_file(),
            temp_dir.path().join("sections").join("metadata.json")
        );
        assert_eq!(
            paths.section_file("work"),
            temp_dir.path().join("sections").join("work.txt")
        );
    }

    #[test]
    fn test_is_initialized() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(!paths.is_initialized());
        std::fs::write(paths.settings_file(), "{}").unwrap();
        assert!(paths.is_initialized());
    }
}
