//! Backup artifact naming and classification
//!
//! Backup files are classified purely from their file name: full snapshots
//! carry the `full-backup-` prefix, anything else is a section snapshot whose
//! owning section id is the text before the first `-`. All call sites go
//! through `BackupKind::from_file_name` so the convention lives in one place.

use std::path::PathBuf;

use chrono::{DateTime, SecondsFormat, Utc};

/// File name prefix distinguishing full-repository snapshots
pub const FULL_BACKUP_PREFIX: &str = "full-backup-";

/// Extension carried by every backup artifact (before optional `.gz`)
pub const BACKUP_EXTENSION: &str = ".bak";

/// Suffix of compressed artifacts
pub const COMPRESSED_SUFFIX: &str = ".gz";

/// Classification of a backup artifact, derived from its file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackupKind {
    /// Full-repository snapshot (all sections + metadata as one JSON payload)
    Full,
    /// Snapshot of a single section's raw text content
    Section {
        /// Owning section id
        id: String,
    },
}

impl BackupKind {
    /// Classify an artifact by file name
    ///
    /// Section ids are the text before the first `-`; ids that themselves
    /// contain `-` classify under their first dash-free prefix.
    pub fn from_file_name(name: &str) -> BackupKind {
        if name.starts_with(FULL_BACKUP_PREFIX) {
            return BackupKind::Full;
        }
        let id = name.split('-').next().unwrap_or(name);
        BackupKind::Section { id: id.to_string() }
    }

    /// True for full-repository snapshots
    pub fn is_full(&self) -> bool {
        matches!(self, BackupKind::Full)
    }

    /// The owning section id, for section snapshots
    pub fn section_id(&self) -> Option<&str> {
        match self {
            BackupKind::Full => None,
            BackupKind::Section { id } => Some(id),
        }
    }
}

/// One backup artifact on disk
///
/// Records are never mutated after creation; they are only created or
/// deleted by retention.
#[derive(Debug, Clone)]
pub struct BackupRecord {
    /// Derived classification
    pub kind: BackupKind,
    /// Artifact file name
    pub name: String,
    /// Full path to the artifact
    pub path: PathBuf,
    /// Filesystem modification time
    pub modified: DateTime<Utc>,
    /// Size in bytes
    pub size_bytes: u64,
}

impl BackupRecord {
    /// Whether the artifact is gzip-compressed, judged by its name
    pub fn is_compressed(&self) -> bool {
        self.name.ends_with(COMPRESSED_SUFFIX)
    }
}

/// Timestamp component for artifact names
///
/// ISO 8601 in UTC with `:` and `.` replaced by `-` so the name is safe on
/// every filesystem. Millisecond precision keeps rapid successive backups
/// from colliding.
pub fn backup_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

/// Build the file name for a section snapshot
pub fn section_backup_file_name(section_id: &str, timestamp: &str, compressed: bool) -> String {
    let mut name = format!("{}-{}{}", section_id, timestamp, BACKUP_EXTENSION);
    if compressed {
        name.push_str(COMPRESSED_SUFFIX);
    }
    name
}

/// Build the file name for a full snapshot
pub fn full_backup_file_name(timestamp: &str, compressed: bool) -> String {
    let mut name = format!("{}{}{}", FULL_BACKUP_PREFIX, timestamp, BACKUP_EXTENSION);
    if compressed {
        name.push_str(COMPRESSED_SUFFIX);
    }
    name
}

/// True if the file name looks like a backup artifact at all
pub fn is_backup_file_name(name: &str) -> bool {
    let stem = name.strip_suffix(COMPRESSED_SUFFIX).unwrap_or(name);
    stem.ends_with(BACKUP_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_classify_full_backup() {
        let kind = BackupKind::from_file_name("full-backup-2025-01-17T10-30-00-000Z.bak.gz");
        assert!(kind.is_full());
        assert_eq!(kind.section_id(), None);
    }

    #[test]
    fn test_classify_section_backup() {
        let kind = BackupKind::from_file_name("work_notes_-2025-01-17T10-30-00-000Z.bak");
        assert_eq!(kind.section_id(), Some("work_notes_"));
    }

    #[test]
    fn test_section_id_stops_at_first_dash() {
        // Ids containing '-' classify under their first dash-free prefix.
        let kind = BackupKind::from_file_name("daily-log-2025-01-17T10-30-00-000Z.bak");
        assert_eq!(kind.section_id(), Some("daily"));
    }

    #[test]
    fn test_backup_timestamp_is_filesystem_safe() {
        let now = Utc.with_ymd_and_hms(2025, 1, 17, 10, 30, 0).unwrap();
        let stamp = backup_timestamp(now);
        assert_eq!(stamp, "2025-01-17T10-30-00-000Z");
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('.'));
    }

    #[test]
    fn test_file_name_builders() {
        assert_eq!(
            section_backup_file_name("work", "T", false),
            "work-T.bak"
        );
        assert_eq!(
            section_backup_file_name("work", "T", true),
            "work-T.bak.gz"
        );
        assert_eq!(full_backup_file_name("T", false), "full-backup-T.bak");
        assert_eq!(full_backup_file_name("T", true), "full-backup-T.bak.gz");
    }

    #[test]
    fn test_round_trip_classification() {
        let stamp = backup_timestamp(Utc::now());
        let name = section_backup_file_name("work_notes_", &stamp, true);
        let kind = BackupKind::from_file_name(&name);
        assert_eq!(kind.section_id(), Some("work_notes_"));

        let name = full_backup_file_name(&stamp, false);
        assert!(BackupKind::from_file_name(&name).is_full());
    }

    #[test]
    fn test_is_backup_file_name() {
        assert!(is_backup_file_name("work-T.bak"));
        assert!(is_backup_file_name("work-T.bak.gz"));
        assert!(!is_backup_file_name("metadata.json"));
        assert!(!is_backup_file_name("work-T.bak.tmp"));
    }
}
