//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use clap::Subcommand;

use crate::backup::{BackupKind, BackupManager, BackupRecord, RestoreManager};
use crate::config::paths::LogbookPaths;
use crate::config::settings::Settings;
use crate::error::{LogbookError, LogbookResult};

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Snapshot one section
    Create {
        /// Section id
        section: String,

        /// Truncate the live log after the snapshot is written
        #[arg(long)]
        rotate: bool,
    },

    /// Snapshot every section plus the metadata sidecar
    All,

    /// List all available backups
    List {
        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore from a backup
    Restore {
        /// Backup type: "full" or "section"
        kind: String,

        /// 1-based index into the newest-first listing of that type
        index: usize,

        /// Target section id (defaults to the id derived from the file name)
        #[arg(short, long)]
        section: Option<String>,

        /// Overwrite existing files; without it existing data is kept
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    paths: &LogbookPaths,
    settings: &Settings,
    cmd: BackupCommands,
) -> LogbookResult<()> {
    let manager = BackupManager::new(paths.clone(), settings.backup.clone());

    match cmd {
        BackupCommands::Create { section, rotate } => {
            println!("Creating backup of '{}'...", section);
            if let Some(artifact) = manager.backup_section(&section, rotate) {
                println!("Backup created: {}", artifact.display());
                if rotate {
                    println!("Live log truncated.");
                }
            }
        }

        BackupCommands::All => {
            println!("Creating full backup...");
            if let Some(artifact) = manager.create_full_backup() {
                println!("Full backup created: {}", artifact.display());
            }
        }

        BackupCommands::List { verbose } => {
            let backups = ranked_backups(&manager);

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: logbook backup all");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            let mut full_index = 0;
            let mut section_index = 0;
            for backup in &backups {
                let (label, index) = match &backup.kind {
                    BackupKind::Full => {
                        full_index += 1;
                        ("full".to_string(), full_index)
                    }
                    BackupKind::Section { id } => {
                        section_index += 1;
                        (format!("section {}", id), section_index)
                    }
                };

                let age = chrono::Utc::now().signed_duration_since(backup.modified);
                let age_str = format_duration(age);

                if verbose {
                    println!(
                        "{}. [{}] {}\n   Modified: {}\n   Size: {}\n   Age: {}\n   Compressed: {}\n",
                        index,
                        label,
                        backup.name,
                        backup.modified.format("%Y-%m-%d %H:%M:%S UTC"),
                        format_size(backup.size_bytes),
                        age_str,
                        if backup.is_compressed() { "yes" } else { "no" },
                    );
                } else {
                    println!(
                        "  {}. [{}] {} ({} ago, {})",
                        index,
                        label,
                        backup.name,
                        age_str,
                        format_size(backup.size_bytes),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
            println!("Restore with: logbook backup restore <full|section> <index>");
        }

        BackupCommands::Restore {
            kind,
            index,
            section,
            force,
        } => {
            restore_by_index(paths, settings, &kind, index, section.as_deref(), force)?;
        }
    }

    Ok(())
}

/// Restore the index-th newest backup of the given type
///
/// Shared by the one-shot CLI and the interactive shell. All argument
/// validation happens before anything is written.
pub fn restore_by_index(
    paths: &LogbookPaths,
    settings: &Settings,
    kind: &str,
    index: usize,
    section_override: Option<&str>,
    force: bool,
) -> LogbookResult<()> {
    let want_full = match kind {
        "full" => true,
        "section" => false,
        other => {
            return Err(LogbookError::Validation(format!(
                "Unknown backup type '{}' (expected 'full' or 'section')",
                other
            )))
        }
    };

    let manager = BackupManager::new(paths.clone(), settings.backup.clone());
    let candidates: Vec<BackupRecord> = ranked_backups(&manager)
        .into_iter()
        .filter(|record| record.kind.is_full() == want_full)
        .collect();

    if index == 0 || index > candidates.len() {
        return Err(LogbookError::Validation(format!(
            "Backup index {} out of range (have {} {} backup(s))",
            index,
            candidates.len(),
            kind
        )));
    }
    let record = &candidates[index - 1];

    let derived_id = record.kind.section_id().map(str::to_string);
    let section_id = section_override.or(derived_id.as_deref());

    if !force {
        println!("Restoring without --force: existing files are kept, not overwritten.");
    }

    let restore = RestoreManager::new(paths.clone());
    if !restore.restore_from_backup(&record.path, section_id, force) {
        return Err(LogbookError::Io(format!(
            "Restore of {} did not complete",
            record.name
        )));
    }

    Ok(())
}

/// All backups, newest first
///
/// The engine returns directory enumeration order; ranking for display and
/// index-based selection happens here.
fn ranked_backups(manager: &BackupManager) -> Vec<BackupRecord> {
    let mut backups = manager.list_backups();
    backups.sort_by(|a, b| b.modified.cmp(&a.modified));
    backups
}

/// Format a duration in human-readable form
fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds();

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    let months = days / 30;
    format!("{}mo", months)
}

/// Format a file size in human-readable form
fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
