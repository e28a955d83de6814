//! Backup restoration for logbook
//!
//! Restores section and full-repository snapshots back into the live data
//! store. Full restores are a per-item merge: each contained section (and the
//! metadata sidecar) is restored only where allowed, partial success is a
//! normal outcome, and the report carries the counts.

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::config::paths::LogbookPaths;
use crate::error::{LogbookError, LogbookResult};
use crate::store::file_io::write_json_atomic;

use super::manager::FullBackupArchive;
use super::record::{BackupKind, COMPRESSED_SUFFIX};

/// Handles restoring from backup artifacts
pub struct RestoreManager {
    paths: LogbookPaths,
}

impl RestoreManager {
    /// Create a new RestoreManager
    pub fn new(paths: LogbookPaths) -> Self {
        Self { paths }
    }

    /// Restore an artifact into the live store
    ///
    /// Section artifacts require `section_id`. Existing files are only
    /// replaced when `overwrite` is set; otherwise that item is skipped and
    /// reported, which is not an error. Returns false, with the cause
    /// reported, on any read/decompress/parse failure.
    pub fn restore_from_backup(
        &self,
        backup_path: &Path,
        section_id: Option<&str>,
        overwrite: bool,
    ) -> bool {
        match self.try_restore(backup_path, section_id, overwrite) {
            Ok(report) => {
                println!("{}", report.summary());
                true
            }
            Err(e) => {
                eprintln!("error: restore failed: {}", e);
                false
            }
        }
    }

    /// Restore, propagating errors to the caller
    pub fn try_restore(
        &self,
        backup_path: &Path,
        section_id: Option<&str>,
        overwrite: bool,
    ) -> LogbookResult<RestoreReport> {
        let file_name = backup_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LogbookError::Validation("Backup path has no file name".into()))?;

        let kind = BackupKind::from_file_name(file_name);

        // Validate before touching the filesystem.
        if !kind.is_full() && section_id.is_none() {
            return Err(LogbookError::Validation(
                "A section id is required to restore a section backup".into(),
            ));
        }

        if !backup_path.exists() {
            return Err(LogbookError::backup_not_found(file_name));
        }

        let content = self.read_artifact(backup_path)?;

        match kind {
            BackupKind::Full => self.restore_full(&content, overwrite),
            BackupKind::Section { .. } => {
                // The caller's section id wins over the name-derived one.
                self.restore_section(&content, section_id.unwrap_or_default(), overwrite)
            }
        }
    }

    /// Read an artifact, gunzipping transparently when the name says so
    fn read_artifact(&self, path: &Path) -> LogbookResult<Vec<u8>> {
        let raw = fs::read(path)
            .map_err(|e| LogbookError::Io(format!("Failed to read backup file: {}", e)))?;

        let compressed = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.ends_with(COMPRESSED_SUFFIX));
        if !compressed {
            return Ok(raw);
        }

        let mut decoded = Vec::new();
        GzDecoder::new(raw.as_slice())
            .read_to_end(&mut decoded)
            .map_err(|e| LogbookError::Io(format!("Failed to decompress backup: {}", e)))?;
        Ok(decoded)
    }

    fn restore_full(&self, content: &[u8], overwrite: bool) -> LogbookResult<RestoreReport> {
        let archive: FullBackupArchive = serde_json::from_slice(content)
            .map_err(|e| LogbookError::Corrupt(format!("Failed to parse backup payload: {}", e)))?;

        fs::create_dir_all(self.paths.sections_dir())
            .map_err(|e| LogbookError::Io(format!("Failed to create sections directory: {}", e)))?;

        let metadata_path = self.paths.metadata_file();
        let metadata_restored = overwrite || !metadata_path.exists();
        if metadata_restored {
            write_json_atomic(&metadata_path, &archive.metadata)?;
        }

        let total = archive.sections.len();
        let mut restored = 0;
        let mut skipped = Vec::new();

        for (id, section_content) in &archive.sections {
            let path = self.paths.section_file(id);
            if overwrite || !path.exists() {
                fs::write(&path, section_content).map_err(|e| {
                    LogbookError::Io(format!("Failed to restore section '{}': {}", id, e))
                })?;
                restored += 1;
            } else {
                skipped.push(id.clone());
            }
        }

        Ok(RestoreReport::Full {
            restored,
            total,
            skipped,
            metadata_restored,
        })
    }

    fn restore_section(
        &self,
        content: &[u8],
        section_id: &str,
        overwrite: bool,
    ) -> LogbookResult<RestoreReport> {
        fs::create_dir_all(self.paths.sections_dir())
            .map_err(|e| LogbookError::Io(format!("Failed to create sections directory: {}", e)))?;

        let path = self.paths.section_file(section_id);
        if path.exists() && !overwrite {
            return Ok(RestoreReport::Section {
                section_id: section_id.to_string(),
                restored: false,
            });
        }

        fs::write(&path, content).map_err(|e| {
            LogbookError::Io(format!("Failed to restore section '{}': {}", section_id, e))
        })?;

        Ok(RestoreReport::Section {
            section_id: section_id.to_string(),
            restored: true,
        })
    }
}

/// Outcome of a restore operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreReport {
    /// Full-repository restore: per-item merge result
    Full {
        /// Sections written
        restored: usize,
        /// Sections contained in the backup
        total: usize,
        /// Sections left untouched because they already exist
        skipped: Vec<String>,
        /// Whether the metadata sidecar was written
        metadata_restored: bool,
    },
    /// Single-section restore
    Section {
        /// Target section id
        section_id: String,
        /// False when the existing file was kept
        restored: bool,
    },
}

impl RestoreReport {
    /// Operator-facing summary line
    pub fn summary(&self) -> String {
        match self {
            RestoreReport::Full {
                restored,
                total,
                skipped,
                metadata_restored,
            } => {
                let mut summary = format!("restored {} of {} sections", restored, total);
                if !skipped.is_empty() {
                    summary.push_str(&format!(" (skipped existing: {})", skipped.join(", ")));
                }
                if *metadata_restored {
                    summary.push_str("; metadata restored");
                } else {
                    summary.push_str("; existing metadata kept");
                }
                summary
            }
            RestoreReport::Section {
                section_id,
                restored,
            } => {
                if *restored {
                    format!("restored section '{}'", section_id)
                } else {
                    format!(
                        "skipped section '{}': file exists and overwrite not set",
                        section_id
                    )
                }
            }
        }
    }

    /// True when nothing was left behind
    pub fn all_restored(&self) -> bool {
        match self {
            RestoreReport::Full {
                restored, total, ..
            } => restored == total,
            RestoreReport::Section { restored, .. } => *restored,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backup::manager::BackupManager;
    use crate::config::settings::BackupSettings;
    use crate::store::SectionStore;
    use tempfile::TempDir;

    fn test_env(use_compression: bool) -> (RestoreManager, BackupManager, SectionStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let settings = BackupSettings {
            use_compression,
            ..BackupSettings::default()
        };
        let store = SectionStore::new(paths.clone(), 5 * 1024 * 1024);
        let backup_manager = BackupManager::new(paths.clone(), settings);
        let restore_manager = RestoreManager::new(paths);

        (restore_manager, backup_manager, store, temp)
    }

    #[test]
    fn test_section_round_trip_compressed() {
        let (restore, backup, store, temp) = test_env(true);

        store.create_section("work", "");
        store.append_entry("work", "alpha");
        store.append_entry("work", "beta");

        let live = temp.path().join("sections").join("work.txt");
        let original = fs::read(&live).unwrap();

        let artifact = backup.backup_section("work", true).unwrap();
        assert_eq!(fs::read(&live).unwrap(), b"");

        let report = restore.try_restore(&artifact, Some("work"), true).unwrap();
        assert!(report.all_restored());
        assert_eq!(fs::read(&live).unwrap(), original);
    }

    #[test]
    fn test_section_round_trip_uncompressed() {
        let (restore, backup, store, temp) = test_env(false);

        store.create_section("work", "");
        store.append_entry("work", "only line");

        let live = temp.path().join("sections").join("work.txt");
        let original = fs::read(&live).unwrap();

        let artifact = backup.backup_section("work", false).unwrap();
        fs::remove_file(&live).unwrap();

        assert!(restore.try_restore(&artifact, Some("work"), false).unwrap().all_restored());
        assert_eq!(fs::read(&live).unwrap(), original);
    }

    #[test]
    fn test_section_restore_requires_id() {
        let (restore, backup, store, _temp) = test_env(true);

        store.create_section("work", "");
        store.append_entry("work", "e");
        let artifact = backup.backup_section("work", false).unwrap();

        let err = restore.try_restore(&artifact, None, true).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_section_restore_skips_existing_without_overwrite() {
        let (restore, backup, store, temp) = test_env(true);

        store.create_section("work", "");
        store.append_entry("work", "before");
        let artifact = backup.backup_section("work", false).unwrap();

        store.append_entry("work", "after");
        let live = temp.path().join("sections").join("work.txt");
        let current = fs::read(&live).unwrap();

        let report = restore.try_restore(&artifact, Some("work"), false).unwrap();
        assert_eq!(
            report,
            RestoreReport::Section {
                section_id: "work".to_string(),
                restored: false,
            }
        );
        // Existing file is byte-unchanged.
        assert_eq!(fs::read(&live).unwrap(), current);
    }

    #[test]
    fn test_full_round_trip() {
        let (restore, backup, store, temp) = test_env(true);

        store.create_section("alpha", "first");
        store.append_entry("alpha", "a1");
        store.create_section("beta", "second");
        store.append_entry("beta", "b1");

        let artifact = backup.create_full_backup().unwrap();

        // Wipe the live store.
        fs::remove_dir_all(temp.path().join("sections")).unwrap();

        let report = restore.try_restore(&artifact, None, true).unwrap();
        assert!(report.all_restored());

        assert_eq!(store.load_entries("alpha"), vec!["a1"]);
        assert_eq!(store.load_entries("beta"), vec!["b1"]);
        assert_eq!(
            store.metadata().get("alpha").unwrap().unwrap().description,
            "first"
        );
    }

    #[test]
    fn test_full_restore_merges_without_overwrite() {
        let (restore, backup, store, temp) = test_env(false);

        store.create_section("one", "");
        store.append_entry("one", "1");
        store.create_section("two", "");
        store.append_entry("two", "2");
        store.create_section("three", "");
        store.append_entry("three", "3");

        let artifact = backup.create_full_backup().unwrap();

        // Remove one section; keep two with local edits.
        fs::remove_file(temp.path().join("sections").join("three.txt")).unwrap();
        store.append_entry("one", "local");

        let report = restore.try_restore(&artifact, None, false).unwrap();
        match &report {
            RestoreReport::Full {
                restored,
                total,
                skipped,
                metadata_restored,
            } => {
                assert_eq!(*restored, 1);
                assert_eq!(*total, 3);
                assert_eq!(skipped.len(), 2);
                // Sidecar exists, so it was kept.
                assert!(!metadata_restored);
            }
            other => panic!("expected full report, got {:?}", other),
        }
        assert!(report.summary().contains("restored 1 of 3"));

        // Existing sections untouched, missing one recreated.
        assert_eq!(store.load_entries("one"), vec!["1", "local"]);
        assert_eq!(store.load_entries("three"), vec!["3"]);
    }

    #[test]
    fn test_full_restore_never_deletes_extra_sections() {
        let (restore, backup, store, _temp) = test_env(true);

        store.create_section("old", "");
        store.append_entry("old", "o");
        let artifact = backup.create_full_backup().unwrap();

        store.create_section("extra", "");
        store.append_entry("extra", "kept");

        restore.try_restore(&artifact, None, true).unwrap();

        assert_eq!(store.load_entries("extra"), vec!["kept"]);
    }

    #[test]
    fn test_restore_missing_artifact_fails() {
        let (restore, _backup, _store, temp) = test_env(true);

        let bogus = temp.path().join("backups").join("work-nope.bak");
        let err = restore.try_restore(&bogus, Some("work"), true).unwrap_err();
        assert!(err.is_not_found());

        assert!(!restore.restore_from_backup(&bogus, Some("work"), true));
    }

    #[test]
    fn test_restore_corrupt_full_backup_fails() {
        let (restore, _backup, _store, temp) = test_env(false);

        let bad = temp.path().join("backups").join("full-backup-bad.bak");
        fs::write(&bad, "not json").unwrap();

        let err = restore.try_restore(&bad, None, true).unwrap_err();
        assert!(matches!(err, LogbookError::Corrupt(_)));
    }

    #[test]
    fn test_restore_truncated_gzip_fails() {
        let (restore, backup, store, _temp) = test_env(true);

        store.create_section("work", "");
        store.append_entry("work", "data");
        let artifact = backup.backup_section("work", false).unwrap();

        // Truncate the artifact mid-stream.
        let bytes = fs::read(&artifact).unwrap();
        fs::write(&artifact, &bytes[..bytes.len() / 2]).unwrap();

        assert!(restore.try_restore(&artifact, Some("work"), true).is_err());
    }

    #[test]
    fn test_report_summaries() {
        let full = RestoreReport::Full {
            restored: 2,
            total: 3,
            skipped: vec!["one".to_string()],
            metadata_restored: true,
        };
        assert!(full.summary().contains("restored 2 of 3 sections"));
        assert!(full.summary().contains("one"));
        assert!(!full.all_restored());

        let skip = RestoreReport::Section {
            section_id: "work".to_string(),
            restored: false,
        };
        assert!(skip.summary().contains("skipped"));
    }
}
