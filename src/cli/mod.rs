//! CLI command handlers
//!
//! This module contains the implementation of CLI commands and the
//! interactive shell, bridging the clap argument parsing with the store and
//! backup layers.

pub mod backup;
pub mod section;
pub mod shell;

pub use backup::{handle_backup_command, restore_by_index, BackupCommands};
pub use section::{append_to_section, handle_section_command, search_section, SectionCommands};
pub use shell::run_shell;
