//! Section CLI commands
//!
//! Implements CLI commands for managing sections and their entries.

use clap::Subcommand;

use crate::backup::BackupManager;
use crate::config::paths::LogbookPaths;
use crate::config::settings::Settings;
use crate::display::{entry_tag, format_entries};
use crate::error::{LogbookError, LogbookResult};
use crate::store::SectionStore;

/// Section subcommands
#[derive(Subcommand)]
pub enum SectionCommands {
    /// Create a new section (or update its description)
    Create {
        /// Section name; characters outside [A-Za-z0-9_-] become '_'
        name: String,

        /// Free-text description stored in the metadata sidecar
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List all sections
    List,

    /// Print a section's entries
    Show {
        /// Section id
        section: String,

        /// Only show the last N entries
        #[arg(short, long)]
        limit: Option<usize>,

        /// Only show entries carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },
}

/// Handle a section command
pub fn handle_section_command(
    paths: &LogbookPaths,
    settings: &Settings,
    cmd: SectionCommands,
) -> LogbookResult<()> {
    let store = SectionStore::new(paths.clone(), settings.rotation_threshold_bytes);

    match cmd {
        SectionCommands::Create { name, description } => {
            if name.trim().is_empty() {
                return Err(LogbookError::Validation(
                    "Section name must not be empty".into(),
                ));
            }
            let id = store.create_section(&name, &description);
            println!("Created section '{}'", id);
        }

        SectionCommands::List => {
            let mut sections = store.list_sections();
            if sections.is_empty() {
                println!("No sections found.");
                println!("Create one with: logbook section create <name>");
                return Ok(());
            }
            sections.sort();

            let metadata = store.metadata().load().unwrap_or_default();
            let name_width = sections.iter().map(|s| s.len()).max().unwrap_or(4).max(4);

            println!("{:<name_width$}  Description", "Name", name_width = name_width);
            println!("{:-<name_width$}  -----------", "", name_width = name_width);
            for id in &sections {
                let description = metadata
                    .get(id)
                    .map(|m| m.description.as_str())
                    .unwrap_or("");
                println!("{:<name_width$}  {}", id, description, name_width = name_width);
            }
            println!();
            println!("Total: {} section(s)", sections.len());
        }

        SectionCommands::Show {
            section,
            limit,
            tag,
        } => {
            let mut entries = store.load_entries(&section);
            if let Some(tag) = &tag {
                entries.retain(|line| entry_tag(line) == Some(tag.as_str()));
            }
            if let Some(limit) = limit {
                let skip = entries.len().saturating_sub(limit);
                entries.drain(..skip);
            }

            if entries.is_empty() {
                println!("No entries in section '{}'.", section);
            } else {
                println!("{}", format_entries(&entries));
            }
        }
    }

    Ok(())
}

/// Append one entry to a section, rotating its log when the write pushes it
/// past the rotation threshold
pub fn append_to_section(
    paths: &LogbookPaths,
    settings: &Settings,
    section: &str,
    text: &str,
    tag: Option<&str>,
) -> LogbookResult<()> {
    if section.trim().is_empty() {
        return Err(LogbookError::Validation(
            "Section name must not be empty".into(),
        ));
    }
    if text.trim().is_empty() {
        return Err(LogbookError::Validation("Entry text must not be empty".into()));
    }

    let store = SectionStore::new(paths.clone(), settings.rotation_threshold_bytes);
    let section_id = crate::store::sanitize_section_name(section);

    let body = match tag {
        Some(tag) => format!("[{}] {}", tag, text),
        None => text.to_string(),
    };
    let entry = SectionStore::stamp_entry(&body);

    let rotation_needed = store.append_entry(&section_id, &entry);

    if rotation_needed {
        println!(
            "Section '{}' exceeded the rotation threshold; snapshotting and truncating.",
            section_id
        );
        let manager = BackupManager::new(paths.clone(), settings.backup.clone());
        if let Some(artifact) = manager.backup_section(&section_id, true) {
            println!("Rotated into: {}", artifact.display());
        }
    }

    Ok(())
}

/// Case-insensitive in-memory search over a section's entries
pub fn search_section(
    paths: &LogbookPaths,
    settings: &Settings,
    section: &str,
    query: &str,
) -> LogbookResult<()> {
    if query.trim().is_empty() {
        return Err(LogbookError::Validation("Search query must not be empty".into()));
    }

    let store = SectionStore::new(paths.clone(), settings.rotation_threshold_bytes);
    let needle = query.to_lowercase();
    let matches: Vec<String> = store
        .load_entries(section)
        .into_iter()
        .filter(|line| line.to_lowercase().contains(&needle))
        .collect();

    if matches.is_empty() {
        println!("No entries matching '{}' in section '{}'.", query, section);
    } else {
        println!("{}", format_entries(&matches));
        println!();
        println!("{} match(es)", matches.len());
    }

    Ok(())
}
