//! Interactive shell
//!
//! A line-oriented input loop over the section store and the backup engine.
//! Everything is single-threaded: each command runs to completion before the
//! next input line is read, and the periodic auto backup fires only at the
//! idle point between commands, so it can never interleave with an in-flight
//! append or restore.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use crate::backup::BackupManager;
use crate::config::paths::LogbookPaths;
use crate::config::settings::Settings;
use crate::display::{entry_tag, format_entries};
use crate::error::LogbookResult;
use crate::store::{sanitize_section_name, SectionStore, DEFAULT_SECTION};

use super::backup::restore_by_index;

/// Session state for one shell run
///
/// Explicit context passed through every command handler; the core
/// components stay stateless aside from the filesystem.
struct ShellSession {
    paths: LogbookPaths,
    settings: Settings,
    store: SectionStore,
    backups: BackupManager,
    current_section: String,
    last_auto_backup: Instant,
}

/// Run the interactive shell until the user quits or stdin closes
pub fn run_shell(paths: LogbookPaths, settings: Settings) -> LogbookResult<()> {
    let store = SectionStore::new(paths.clone(), settings.rotation_threshold_bytes);
    let backups = BackupManager::new(paths.clone(), settings.backup.clone());

    store.ensure_default_section();

    let mut session = ShellSession {
        paths,
        settings,
        store,
        backups,
        current_section: DEFAULT_SECTION.to_string(),
        last_auto_backup: Instant::now(),
    };

    println!("logbook interactive shell. Type 'help' for commands.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        session.auto_backup_tick();

        print!("logbook:{}> ", session.current_section);
        io::stdout().flush().ok();

        let Some(line) = lines.next() else {
            break;
        };
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("warning: failed to read input: {}", e);
                break;
            }
        };

        if !session.dispatch(line.trim()) {
            break;
        }
    }

    Ok(())
}

impl ShellSession {
    /// Execute one command line; returns false to leave the loop
    fn dispatch(&mut self, line: &str) -> bool {
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command {
            "" => {}
            "help" => print_help(),
            "sections" => self.cmd_sections(),
            "use" => self.cmd_use(rest),
            "new" => self.cmd_new(rest),
            "write" => self.cmd_write(rest),
            "read" => self.cmd_read(rest),
            "search" => self.cmd_search(rest),
            "tag" => self.cmd_tag(rest),
            "backup" => self.cmd_backup(),
            "backup-all" => self.cmd_backup_all(),
            "backups" => self.cmd_backups(),
            "restore" => self.cmd_restore(rest),
            "quit" | "exit" => return false,
            other => {
                println!("Unknown command '{}'. Type 'help' for commands.", other);
            }
        }
        true
    }

    /// Run the periodic full backup when its interval has elapsed
    fn auto_backup_tick(&mut self) {
        if self.settings.auto_backup_minutes == 0 {
            return;
        }
        let interval = Duration::from_secs(self.settings.auto_backup_minutes * 60);
        if self.last_auto_backup.elapsed() < interval {
            return;
        }
        if let Some(artifact) = self.backups.create_full_backup() {
            println!("(auto backup) {}", artifact.display());
        }
        self.last_auto_backup = Instant::now();
    }

    fn cmd_sections(&self) {
        let mut sections = self.store.list_sections();
        if sections.is_empty() {
            println!("No sections yet. Create one with: new <name> [description]");
            return;
        }
        sections.sort();
        let metadata = self.store.metadata().load().unwrap_or_default();
        for id in sections {
            let description = metadata
                .get(&id)
                .map(|m| m.description.as_str())
                .unwrap_or("");
            let marker = if id == self.current_section { "*" } else { " " };
            if description.is_empty() {
                println!("{} {}", marker, id);
            } else {
                println!("{} {} - {}", marker, id, description);
            }
        }
    }

    fn cmd_use(&mut self, rest: &str) {
        if rest.is_empty() {
            println!("Usage: use <section>");
            return;
        }
        let id = sanitize_section_name(rest);
        if !self.store.list_sections().contains(&id) {
            println!("Section '{}' will be created on first write.", id);
        }
        self.current_section = id;
    }

    fn cmd_new(&mut self, rest: &str) {
        if rest.is_empty() {
            println!("Usage: new <name> [description]");
            return;
        }
        let (name, description) = match rest.split_once(char::is_whitespace) {
            Some((name, description)) => (name, description.trim()),
            None => (rest, ""),
        };
        let id = self.store.create_section(name, description);
        println!("Created section '{}'", id);
        self.current_section = id;
    }

    fn cmd_write(&mut self, rest: &str) {
        if rest.is_empty() {
            println!("Usage: write [tag] <text>  (the [tag] marker is optional)");
            return;
        }
        let entry = SectionStore::stamp_entry(rest);
        let rotation_needed = self.store.append_entry(&self.current_section, &entry);

        if rotation_needed {
            println!(
                "Section '{}' exceeded the rotation threshold; snapshotting and truncating.",
                self.current_section
            );
            if let Some(artifact) = self.backups.backup_section(&self.current_section, true) {
                println!("Rotated into: {}", artifact.display());
            }
        }
    }

    fn cmd_read(&self, rest: &str) {
        let mut entries = self.store.load_entries(&self.current_section);
        if let Ok(limit) = rest.parse::<usize>() {
            let skip = entries.len().saturating_sub(limit);
            entries.drain(..skip);
        }
        if entries.is_empty() {
            println!("No entries in section '{}'.", self.current_section);
        } else {
            println!("{}", format_entries(&entries));
        }
    }

    fn cmd_search(&self, rest: &str) {
        if rest.is_empty() {
            println!("Usage: search <query>");
            return;
        }
        let needle = rest.to_lowercase();
        let matches: Vec<String> = self
            .store
            .load_entries(&self.current_section)
            .into_iter()
            .filter(|line| line.to_lowercase().contains(&needle))
            .collect();
        if matches.is_empty() {
            println!("No matches.");
        } else {
            println!("{}", format_entries(&matches));
        }
    }

    fn cmd_tag(&self, rest: &str) {
        if rest.is_empty() {
            println!("Usage: tag <tag>");
            return;
        }
        let matches: Vec<String> = self
            .store
            .load_entries(&self.current_section)
            .into_iter()
            .filter(|line| entry_tag(line) == Some(rest))
            .collect();
        if matches.is_empty() {
            println!("No entries tagged [{}].", rest);
        } else {
            println!("{}", format_entries(&matches));
        }
    }

    fn cmd_backup(&self) {
        if let Some(artifact) = self.backups.backup_section(&self.current_section, false) {
            println!("Backup created: {}", artifact.display());
        }
    }

    fn cmd_backup_all(&self) {
        if let Some(artifact) = self.backups.create_full_backup() {
            println!("Full backup created: {}", artifact.display());
        }
    }

    fn cmd_backups(&self) {
        let cmd = super::backup::BackupCommands::List { verbose: false };
        if let Err(e) = super::backup::handle_backup_command(&self.paths, &self.settings, cmd) {
            eprintln!("warning: {}", e);
        }
    }

    fn cmd_restore(&self, rest: &str) {
        let mut parts = rest.split_whitespace();
        let (Some(kind), Some(index)) = (parts.next(), parts.next()) else {
            println!("Usage: restore <full|section> <index> [--force]");
            return;
        };
        let Ok(index) = index.parse::<usize>() else {
            println!("Index must be a number. See 'backups' for the list.");
            return;
        };
        let force = parts.any(|p| p == "--force");

        if let Err(e) = restore_by_index(&self.paths, &self.settings, kind, index, None, force) {
            println!("{}", e);
        }
    }
}

fn print_help() {
    println!("Commands:");
    println!("  sections             list sections ('*' marks the current one)");
    println!("  use <section>        switch the current section");
    println!("  new <name> [desc]    create a section");
    println!("  write [tag] <text>   append a timestamped entry");
    println!("  read [n]             show entries (optionally only the last n)");
    println!("  search <query>       filter entries by substring");
    println!("  tag <tag>            filter entries by tag");
    println!("  backup               snapshot the current section");
    println!("  backup-all           snapshot everything");
    println!("  backups              list backups");
    println!("  restore <type> <i>   restore backup i (add --force to overwrite)");
    println!("  quit                 leave the shell");
}
