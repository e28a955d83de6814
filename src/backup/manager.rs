//! Backup manager for logbook
//!
//! Creates timestamped section and full-repository snapshots, optionally
//! gzip-compressed, and enforces count- and age-based retention after every
//! successful backup.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::config::paths::LogbookPaths;
use crate::config::settings::BackupSettings;
use crate::error::{LogbookError, LogbookResult};

use super::record::{
    backup_timestamp, full_backup_file_name, is_backup_file_name, section_backup_file_name,
    BackupKind, BackupRecord, COMPRESSED_SUFFIX,
};

/// Full-repository snapshot payload
///
/// Serialized as one JSON document (optionally gzipped on disk).
#[derive(Debug, Serialize, Deserialize)]
pub struct FullBackupArchive {
    /// When the backup was created
    pub timestamp: DateTime<Utc>,
    /// Metadata sidecar contents; empty object when the sidecar is missing
    pub metadata: serde_json::Value,
    /// Section id -> full text content
    pub sections: BTreeMap<String, String>,
}

/// Manages backup creation and retention
pub struct BackupManager {
    /// Path to backup directory
    backup_dir: PathBuf,
    /// Paths to live data
    paths: LogbookPaths,
    /// Retention and compression policy
    settings: BackupSettings,
}

impl BackupManager {
    /// Create a new BackupManager
    pub fn new(paths: LogbookPaths, settings: BackupSettings) -> Self {
        let backup_dir = paths.backup_dir();
        Self {
            backup_dir,
            paths,
            settings,
        }
    }

    /// Snapshot one section's current content
    ///
    /// With `rotate`, the live log file is truncated to empty once the
    /// snapshot is durably on disk — never before, so a crash in between
    /// cannot leave the data in neither place. Returns the artifact path, or
    /// `None` (with a diagnostic) if the section has no log file or any I/O
    /// step fails.
    pub fn backup_section(&self, section_id: &str, rotate: bool) -> Option<PathBuf> {
        match self.try_backup_section(section_id, rotate) {
            Ok(path) => Some(path),
            Err(e) => {
                eprintln!("error: backup of '{}' failed: {}", section_id, e);
                None
            }
        }
    }

    fn try_backup_section(&self, section_id: &str, rotate: bool) -> LogbookResult<PathBuf> {
        let section_path = self.paths.section_file(section_id);
        if !section_path.exists() {
            return Err(LogbookError::section_not_found(section_id));
        }

        let content = fs::read(&section_path)
            .map_err(|e| LogbookError::Io(format!("Failed to read section file: {}", e)))?;

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| LogbookError::Io(format!("Failed to create backup directory: {}", e)))?;

        let stamp = backup_timestamp(Utc::now());
        let file_name =
            section_backup_file_name(section_id, &stamp, self.settings.use_compression);
        let artifact_path = self.backup_dir.join(&file_name);

        self.write_artifact(&artifact_path, &content)?;

        if rotate {
            // Snapshot is synced; now the live log may be emptied.
            fs::write(&section_path, "")
                .map_err(|e| LogbookError::Io(format!("Failed to truncate section file: {}", e)))?;
        }

        self.cleanup_old_backups(section_id);

        Ok(artifact_path)
    }

    /// Snapshot every known section plus the metadata sidecar
    ///
    /// A missing sidecar yields an empty metadata object in the payload, not
    /// an error. Returns `None` and reports the cause on failure.
    pub fn create_full_backup(&self) -> Option<PathBuf> {
        match self.try_create_full_backup() {
            Ok(path) => Some(path),
            Err(e) => {
                eprintln!("error: full backup failed: {}", e);
                None
            }
        }
    }

    fn try_create_full_backup(&self) -> LogbookResult<PathBuf> {
        let mut sections = BTreeMap::new();
        for section_id in self.list_section_ids()? {
            let content = fs::read_to_string(self.paths.section_file(&section_id))
                .map_err(|e| LogbookError::Io(format!("Failed to read section file: {}", e)))?;
            sections.insert(section_id, content);
        }

        let archive = FullBackupArchive {
            timestamp: Utc::now(),
            metadata: read_json_value(&self.paths.metadata_file())?,
            sections,
        };

        let payload = serde_json::to_vec_pretty(&archive)
            .map_err(|e| LogbookError::Corrupt(format!("Failed to serialize backup: {}", e)))?;

        fs::create_dir_all(&self.backup_dir)
            .map_err(|e| LogbookError::Io(format!("Failed to create backup directory: {}", e)))?;

        let stamp = backup_timestamp(archive.timestamp);
        let file_name = full_backup_file_name(&stamp, self.settings.use_compression);
        let artifact_path = self.backup_dir.join(&file_name);

        self.write_artifact(&artifact_path, &payload)?;

        self.cleanup_old_full_backups();

        Ok(artifact_path)
    }

    /// List all backup artifacts in the backup directory
    ///
    /// Order is directory enumeration order; callers sort as needed. This
    /// never fails the caller — a directory-read error is reported and an
    /// empty list returned.
    pub fn list_backups(&self) -> Vec<BackupRecord> {
        match self.try_list_backups() {
            Ok(records) => records,
            Err(e) => {
                eprintln!("warning: failed to list backups: {}", e);
                Vec::new()
            }
        }
    }

    fn try_list_backups(&self) -> LogbookResult<Vec<BackupRecord>> {
        if !self.backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();

        for entry in fs::read_dir(&self.backup_dir)
            .map_err(|e| LogbookError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| LogbookError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            let Some(name) = path.file_name().and_then(|n| n.to_str()).map(String::from) else {
                continue;
            };
            if !path.is_file() || !is_backup_file_name(&name) {
                continue;
            }

            let metadata = entry
                .metadata()
                .map_err(|e| LogbookError::Io(format!("Failed to stat backup file: {}", e)))?;
            let modified = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());

            records.push(BackupRecord {
                kind: BackupKind::from_file_name(&name),
                name,
                path,
                modified,
                size_bytes: metadata.len(),
            });
        }

        Ok(records)
    }

    /// Apply retention to one section's backups
    pub fn cleanup_old_backups(&self, section_id: &str) {
        self.cleanup_matching(|kind| kind.section_id() == Some(section_id));
    }

    /// Apply retention to full backups
    pub fn cleanup_old_full_backups(&self) {
        self.cleanup_matching(|kind| kind.is_full());
    }

    /// Delete everything matched by either retention rule
    ///
    /// Count rule: keep the newest `max_backups_per_section` artifacts.
    /// Age rule: delete artifacts older than `retention_days` days (disabled
    /// when the setting is zero or negative). The union of both rules is
    /// deleted; per-file failures are reported and the sweep continues.
    fn cleanup_matching(&self, matches: impl Fn(&BackupKind) -> bool) {
        let mut matching: Vec<BackupRecord> = self
            .list_backups()
            .into_iter()
            .filter(|record| matches(&record.kind))
            .collect();

        // Newest first, so the count rule keeps the most recent artifacts.
        matching.sort_by(|a, b| b.modified.cmp(&a.modified));

        let cutoff = if self.settings.retention_days > 0 {
            Some(Utc::now() - Duration::days(self.settings.retention_days))
        } else {
            None
        };

        for (index, record) in matching.iter().enumerate() {
            let over_count = index >= self.settings.max_backups_per_section;
            let too_old = cutoff.map_or(false, |cutoff| record.modified < cutoff);
            if !over_count && !too_old {
                continue;
            }
            if let Err(e) = fs::remove_file(&record.path) {
                eprintln!("warning: failed to delete backup {}: {}", record.name, e);
            }
        }
    }

    /// Get backup directory path
    pub fn backup_dir(&self) -> &PathBuf {
        &self.backup_dir
    }

    /// Section ids derived from the log files on disk
    fn list_section_ids(&self) -> LogbookResult<Vec<String>> {
        let dir = self.paths.sections_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir)
            .map_err(|e| LogbookError::Io(format!("Failed to read sections directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| LogbookError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "txt") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        Ok(ids)
    }

    /// Write an artifact, gzipped when compression is enabled, and sync it
    /// to disk before returning
    fn write_artifact(&self, path: &Path, content: &[u8]) -> LogbookResult<()> {
        let file = File::create(path)
            .map_err(|e| LogbookError::Io(format!("Failed to create backup file: {}", e)))?;

        let file = if path
            .to_str()
            .map_or(false, |p| p.ends_with(COMPRESSED_SUFFIX))
        {
            let mut encoder = GzEncoder::new(file, Compression::default());
            encoder
                .write_all(content)
                .map_err(|e| LogbookError::Io(format!("Failed to write backup file: {}", e)))?;
            encoder
                .finish()
                .map_err(|e| LogbookError::Io(format!("Failed to finish compression: {}", e)))?
        } else {
            let mut file = file;
            file.write_all(content)
                .map_err(|e| LogbookError::Io(format!("Failed to write backup file: {}", e)))?;
            file
        };

        file.sync_all()
            .map_err(|e| LogbookError::Io(format!("Failed to sync backup file: {}", e)))?;

        Ok(())
    }
}

/// Read a JSON file as a generic Value, returning an empty object if the
/// file doesn't exist
fn read_json_value(path: &Path) -> LogbookResult<serde_json::Value> {
    if !path.exists() {
        return Ok(serde_json::Value::Object(serde_json::Map::new()));
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| LogbookError::Io(format!("Failed to read file for backup: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| LogbookError::Corrupt(format!("Failed to parse JSON for backup: {}", e)))
}
