//! Storage layer for logbook
//!
//! Manages the append-only per-section log files and the JSON metadata
//! sidecar, with atomic sidecar rewrites and automatic directory creation.

pub mod file_io;
pub mod metadata;
pub mod sections;

pub use file_io::{read_json, write_json_atomic};
pub use metadata::{MetadataStore, SectionMeta};
pub use sections::{sanitize_section_name, SectionStore, DEFAULT_SECTION};
