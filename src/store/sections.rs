//! Append-only section log files
//!
//! A section is one `sections/<id>.txt` file plus an optional description in
//! the metadata sidecar. Entries are single lines appended in arrival order
//! and never rewritten; the only mutation besides append is truncation during
//! backup rotation.
//!
//! Public operations on `SectionStore` follow the interactive tool's failure
//! policy: storage faults are reported on stderr and degrade to a safe
//! default (empty list, `false`, no-op) instead of propagating. The private
//! `try_*` counterparts return `Result` for use inside the crate and tests.

use std::fs::OpenOptions;
use std::io::Write;

use chrono::Local;

use super::metadata::MetadataStore;
use crate::config::paths::LogbookPaths;
use crate::error::{LogbookError, LogbookResult};

/// Well-known default section id
pub const DEFAULT_SECTION: &str = "journal";

/// Description given to the default section on creation
const DEFAULT_SECTION_DESCRIPTION: &str = "General journal";

/// Sanitize a user-supplied section name into a section id
///
/// Every character outside `[A-Za-z0-9_-]` is replaced with `_`, so the id is
/// always safe to use as a file name.
pub fn sanitize_section_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Manages the per-section log files and the metadata sidecar
pub struct SectionStore {
    paths: LogbookPaths,
    rotation_threshold: u64,
    metadata: MetadataStore,
}

impl SectionStore {
    /// Create a new SectionStore
    pub fn new(paths: LogbookPaths, rotation_threshold: u64) -> Self {
        let metadata = MetadataStore::new(paths.metadata_file());
        Self {
            paths,
            rotation_threshold,
            metadata,
        }
    }

    /// Access the metadata sidecar repository
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Format an entry line: locale timestamp prefix, then the text
    ///
    /// The result is opaque to the store; only display code looks inside it
    /// again (for the optional leading `[tag]` marker).
    pub fn stamp_entry(text: &str) -> String {
        format!("{} {}", Local::now().format("%Y-%m-%d %H:%M:%S"), text)
    }

    /// Create a section, returning its sanitized id
    ///
    /// Idempotent on the log file: an existing file is untouched. The sidecar
    /// description is overwritten unconditionally.
    pub fn create_section(&self, name: &str, description: &str) -> String {
        let section_id = sanitize_section_name(name);
        if let Err(e) = self.try_create_section(&section_id, description) {
            eprintln!("warning: failed to create section '{}': {}", section_id, e);
        }
        section_id
    }

    fn try_create_section(&self, section_id: &str, description: &str) -> LogbookResult<()> {
        std::fs::create_dir_all(self.paths.sections_dir())
            .map_err(|e| LogbookError::Io(format!("Failed to create sections directory: {}", e)))?;

        let path = self.paths.section_file(section_id);
        if !path.exists() {
            std::fs::write(&path, "")
                .map_err(|e| LogbookError::Io(format!("Failed to create section file: {}", e)))?;
        }

        self.metadata.set_description(section_id, description)
    }

    /// List all section ids, derived from the log files on disk
    ///
    /// Unordered; callers sort as needed. Empty on a directory-read error.
    pub fn list_sections(&self) -> Vec<String> {
        match self.try_list_sections() {
            Ok(sections) => sections,
            Err(e) => {
                eprintln!("warning: failed to list sections: {}", e);
                Vec::new()
            }
        }
    }

    fn try_list_sections(&self) -> LogbookResult<Vec<String>> {
        let dir = self.paths.sections_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut sections = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .map_err(|e| LogbookError::Io(format!("Failed to read sections directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| LogbookError::Io(format!("Failed to read directory entry: {}", e)))?;
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == "txt") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    sections.push(stem.to_string());
                }
            }
        }
        Ok(sections)
    }

    /// Append one entry line to a section's log file
    ///
    /// Creates the file on first write. Returns true iff the file now exceeds
    /// the rotation threshold; false on any storage fault.
    pub fn append_entry(&self, section_id: &str, text: &str) -> bool {
        match self.try_append_entry(section_id, text) {
            Ok(rotation_needed) => rotation_needed,
            Err(e) => {
                eprintln!("warning: failed to append to '{}': {}", section_id, e);
                false
            }
        }
    }

    fn try_append_entry(&self, section_id: &str, text: &str) -> LogbookResult<bool> {
        std::fs::create_dir_all(self.paths.sections_dir())
            .map_err(|e| LogbookError::Io(format!("Failed to create sections directory: {}", e)))?;

        let path = self.paths.section_file(section_id);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LogbookError::Io(format!("Failed to open section file: {}", e)))?;

        writeln!(file, "{}", text)
            .map_err(|e| LogbookError::Io(format!("Failed to write entry: {}", e)))?;

        file.flush()
            .map_err(|e| LogbookError::Io(format!("Failed to flush entry: {}", e)))?;

        let size = file
            .metadata()
            .map_err(|e| LogbookError::Io(format!("Failed to stat section file: {}", e)))?
            .len();

        Ok(size > self.rotation_threshold)
    }

    /// Load all entries of a section in append order
    ///
    /// Blank lines are dropped and trailing whitespace trimmed. Returns an
    /// empty vec if the file is absent or unreadable.
    pub fn load_entries(&self, section_id: &str) -> Vec<String> {
        match self.try_load_entries(section_id) {
            Ok(entries) => entries,
            Err(e) => {
                eprintln!("warning: failed to load section '{}': {}", section_id, e);
                Vec::new()
            }
        }
    }

    fn try_load_entries(&self, section_id: &str) -> LogbookResult<Vec<String>> {
        let path = self.paths.section_file(section_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path)
            .map_err(|e| LogbookError::Io(format!("Failed to read section file: {}", e)))?;

        Ok(contents
            .lines()
            .map(|line| line.trim_end())
            .filter(|line| !line.is_empty())
            .map(|line| line.to_string())
            .collect())
    }

    /// Guarantee that the default section exists
    pub fn ensure_default_section(&self) {
        if !self.paths.section_file(DEFAULT_SECTION).exists() {
            self.create_section(DEFAULT_SECTION, DEFAULT_SECTION_DESCRIPTION);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp: &TempDir) -> SectionStore {
        let paths = LogbookPaths::with_base_dir(temp.path().to_path_buf());
        paths.ensure_directories().unwrap();
        SectionStore::new(paths, 5 * 1024 * 1024)
    }

    #[test]
    fn test_sanitize_section_name() {
        assert_eq!(sanitize_section_name("work notes!"), "work_notes_");
        assert_eq!(sanitize_section_name("daily-log_2"), "daily-log_2");
        assert_eq!(sanitize_section_name("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_section_name("caf\u{e9}"), "caf_");
    }

    #[test]
    fn test_create_section_writes_file_and_sidecar() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let id = store.create_section("work notes!", "Scratch pad");

        assert_eq!(id, "work_notes_");
        let file = temp.path().join("sections").join("work_notes_.txt");
        assert!(file.exists());
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "");

        let meta = store.metadata().get("work_notes_").unwrap().unwrap();
        assert_eq!(meta.description, "Scratch pad");
    }

    #[test]
    fn test_create_section_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let id = store.create_section("work", "first");
        store.append_entry(&id, "entry one");

        // Second create must not clobber the log file, but the description
        // is overwritten.
        store.create_section("work", "second");

        assert_eq!(store.load_entries("work"), vec!["entry one"]);
        let meta = store.metadata().get("work").unwrap().unwrap();
        assert_eq!(meta.description, "second");
    }

    #[test]
    fn test_list_sections_excludes_sidecar() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.create_section("alpha", "");
        store.create_section("beta", "");

        let mut sections = store.list_sections();
        sections.sort();
        assert_eq!(sections, vec!["alpha", "beta"]);
    }

    #[test]
    fn test_append_and_load_preserves_order() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.append_entry("work", "one");
        store.append_entry("work", "two");
        store.append_entry("work", "three");

        assert_eq!(store.load_entries("work"), vec!["one", "two", "three"]);
    }

    #[test]
    fn test_load_entries_filters_blanks_and_trims() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let path = temp.path().join("sections").join("work.txt");
        std::fs::write(&path, "one  \n\n   \ntwo\n").unwrap();

        assert_eq!(store.load_entries("work"), vec!["one", "two"]);
    }

    #[test]
    fn test_load_entries_missing_section() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        assert!(store.load_entries("nope").is_empty());
    }

    #[test]
    fn test_append_entry_signals_rotation() {
        let temp = TempDir::new().unwrap();
        let paths = LogbookPaths::with_base_dir(temp.path().to_path_buf());
        paths.ensure_directories().unwrap();
        let store = SectionStore::new(paths, 16);

        assert!(!store.append_entry("work", "short"));
        assert!(store.append_entry("work", "a line long enough to cross the threshold"));
    }

    #[test]
    fn test_ensure_default_section_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.ensure_default_section();
        store.append_entry(DEFAULT_SECTION, "kept");
        store.ensure_default_section();

        assert_eq!(store.load_entries(DEFAULT_SECTION), vec!["kept"]);
    }

    #[test]
    fn test_stamp_entry_has_timestamp_prefix() {
        let stamped = SectionStore::stamp_entry("hello");
        assert!(stamped.ends_with(" hello"));
        // "YYYY-MM-DD HH:MM:SS hello"
        assert_eq!(stamped.len(), 19 + 1 + "hello".len());
    }
}
