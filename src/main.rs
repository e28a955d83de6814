use anyhow::Result;
use clap::{Parser, Subcommand};

use logbook::cli::{
    append_to_section, handle_backup_command, handle_section_command, run_shell, search_section,
};
use logbook::config::{paths::LogbookPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "logbook",
    author = "Kaylee Beyene",
    version,
    about = "Terminal-based sectioned journaling application",
    long_about = "logbook is a terminal journaling tool. Entries are timestamped \
                  lines appended to named sections; sections can be tagged, \
                  searched, backed up as compressed snapshots, and restored."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive shell
    Shell,

    /// Section management commands
    #[command(subcommand)]
    Section(logbook::cli::SectionCommands),

    /// Append a timestamped entry to a section
    Append {
        /// Section name
        section: String,
        /// Entry text
        text: String,
        /// Optional tag, rendered as a leading [tag] marker
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Search a section's entries (case-insensitive substring match)
    Search {
        /// Section name
        section: String,
        /// Query string
        query: String,
    },

    /// Backup management commands
    #[command(subcommand)]
    Backup(logbook::cli::BackupCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = LogbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    paths.ensure_directories()?;

    match cli.command {
        Some(Commands::Shell) | None => {
            run_shell(paths, settings)?;
        }
        Some(Commands::Section(cmd)) => {
            handle_section_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Append { section, text, tag }) => {
            append_to_section(&paths, &settings, &section, &text, tag.as_deref())?;
        }
        Some(Commands::Search { section, query }) => {
            search_section(&paths, &settings, &section, &query)?;
        }
        Some(Commands::Backup(cmd)) => {
            handle_backup_command(&paths, &settings, cmd)?;
        }
        Some(Commands::Config) => {
            println!("logbook Configuration");
            println!("=====================");
            println!("Base directory:    {}", paths.base_dir().display());
            println!("Sections directory: {}", paths.sections_dir().display());
            println!("Backup directory:  {}", paths.backup_dir().display());
            println!();
            println!("Settings:");
            println!(
                "  Max backups per section: {}",
                settings.backup.max_backups_per_section
            );
            println!("  Retention days:          {}", settings.backup.retention_days);
            println!("  Compression enabled:     {}", settings.backup.use_compression);
            println!(
                "  Rotation threshold:      {} bytes",
                settings.rotation_threshold_bytes
            );
            println!(
                "  Auto backup interval:    {} minute(s)",
                settings.auto_backup_minutes
            );
        }
    }

    Ok(())
}
