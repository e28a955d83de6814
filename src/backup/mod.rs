//! Backup system for logbook
//!
//! Provides compressed section and full-repository snapshots with
//! count- and age-based retention, plus restore functionality.
//!
//! # Architecture
//!
//! The backup system consists of two main components:
//!
//! - `BackupManager`: Creates snapshots and enforces retention
//! - `RestoreManager`: Restores snapshots into the live store
//!
//! # Artifact Format
//!
//! Section snapshots are the section's raw text content; full snapshots are
//! one JSON payload:
//! - `timestamp`: when the backup was created
//! - `metadata`: the sidecar contents (empty object if the sidecar is missing)
//! - `sections`: map of section id to full text content
//!
//! Both are gzipped when compression is enabled. Classification is derived
//! from the file name alone — see `BackupKind`.
//!
//! # Retention Policy
//!
//! After every successful backup, two rules run and the union of their
//! matches is deleted:
//! - keep only the newest `max_backups_per_section` artifacts
//! - delete artifacts older than `retention_days` days (0 disables)
//!
//! # Example
//!
//! ```rust,ignore
//! use logbook::backup::{BackupManager, RestoreManager};
//! use logbook::config::{paths::LogbookPaths, settings::BackupSettings};
//!
//! let paths = LogbookPaths::new()?;
//! let manager = BackupManager::new(paths.clone(), BackupSettings::default());
//!
//! let artifact = manager.backup_section("journal", false);
//!
//! // Later, restore it
//! let restore = RestoreManager::new(paths);
//! restore.restore_from_backup(&artifact.unwrap(), Some("journal"), true);
//! ```

mod manager;
mod record;
mod restore;

pub use manager::{BackupManager, FullBackupArchive};
pub use record::{
    backup_timestamp, full_backup_file_name, is_backup_file_name, section_backup_file_name,
    BackupKind, BackupRecord, BACKUP_EXTENSION, COMPRESSED_SUFFIX, FULL_BACKUP_PREFIX,
};
pub use restore::{RestoreManager, RestoreReport};
