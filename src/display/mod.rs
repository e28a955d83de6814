//! Display formatting for terminal output
//!
//! Provides utilities for formatting entries and sections for terminal
//! display, including tag colors.

pub mod entry;

pub use entry::{entry_tag, format_entries, format_entry};
