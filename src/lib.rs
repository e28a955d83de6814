//! logbook - Terminal-based sectioned journaling application
//!
//! This library provides the core functionality for the logbook journaling
//! tool. Entries are timestamped lines of free text appended to named
//! "sections"; sections can be backed up as compressed snapshots and
//! restored later.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `store`: Append-only section files and the metadata sidecar
//! - `backup`: Snapshot creation, restore, and retention
//! - `cli`: Command handlers and the interactive shell
//! - `display`: Terminal formatting for entries and tags
//!
//! # Example
//!
//! ```rust,ignore
//! use logbook::config::{paths::LogbookPaths, settings::Settings};
//! use logbook::store::SectionStore;
//!
//! let paths = LogbookPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let store = SectionStore::new(paths.clone(), settings.rotation_threshold_bytes);
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod store;

pub use error::LogbookError;
