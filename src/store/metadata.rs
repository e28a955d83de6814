//! Metadata sidecar for section descriptions
//!
//! Manages sections/metadata.json, a single JSON object mapping section ids
//! to their metadata. The file is rewritten wholesale on every mutation; the
//! atomic write in `file_io` keeps that safe.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::file_io::{read_json, write_json_atomic};
use crate::error::LogbookError;

/// Per-section metadata record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionMeta {
    /// Free-text description of the section
    #[serde(default)]
    pub description: String,
}

/// Repository for the metadata sidecar file
///
/// Owned exclusively by the section store; nothing else writes the sidecar.
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    /// Create a new metadata store backed by the given sidecar path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the full metadata map; missing file yields an empty map
    pub fn load(&self) -> Result<BTreeMap<String, SectionMeta>, LogbookError> {
        read_json(&self.path)
    }

    /// Get the metadata record for one section, if present
    pub fn get(&self, section_id: &str) -> Result<Option<SectionMeta>, LogbookError> {
        Ok(self.load()?.remove(section_id))
    }

    /// Set the description for a section, overwriting any prior value
    ///
    /// Rewrites the whole sidecar.
    pub fn set_description(&self, section_id: &str, description: &str) -> Result<(), LogbookError> {
        let mut metadata = self.load()?;
        metadata.insert(
            section_id.to_string(),
            SectionMeta {
                description: description.to_string(),
            },
        );
        write_json_atomic(&self.path, &metadata)
    }

    /// Replace the entire sidecar contents
    pub fn replace_all(&self, metadata: &BTreeMap<String, SectionMeta>) -> Result<(), LogbookError> {
        write_json_atomic(&self.path, metadata)
    }

    /// Path to the sidecar file
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> MetadataStore {
        MetadataStore::new(dir.path().join("metadata.json"))
    }

    #[test]
    fn test_load_missing_returns_empty() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        let metadata = store.load().unwrap();
        assert!(metadata.is_empty());
    }

    #[test]
    fn test_set_and_get_description() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.set_description("work", "Work notes").unwrap();

        let meta = store.get("work").unwrap().unwrap();
        assert_eq!(meta.description, "Work notes");
        assert!(store.get("other").unwrap().is_none());
    }

    #[test]
    fn test_latest_description_wins() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.set_description("work", "first").unwrap();
        store.set_description("work", "second").unwrap();

        let metadata = store.load().unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["work"].description, "second");
    }

    #[test]
    fn test_sidecar_is_one_json_object() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.set_description("a", "alpha").unwrap();
        store.set_description("b", "beta").unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["a"]["description"], "alpha");
        assert_eq!(value["b"]["description"], "beta");
    }

    #[test]
    fn test_replace_all() {
        let temp = TempDir::new().unwrap();
        let store = store_in(&temp);

        store.set_description("old", "stale").unwrap();

        let mut fresh = BTreeMap::new();
        fresh.insert(
            "new".to_string(),
            SectionMeta {
                description: "restored".to_string(),
            },
        );
        store.replace_all(&fresh).unwrap();

        let metadata = store.load().unwrap();
        assert!(!metadata.contains_key("old"));
        assert_eq!(metadata["new"].description, "restored");
    }
}
