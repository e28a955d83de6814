//! Configuration management for logbook
//!
//! Provides path resolution and user settings.

pub mod paths;
pub mod settings;

pub use paths::LogbookPaths;
pub use settings::{BackupSettings, Settings};
