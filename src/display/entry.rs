//! Entry display formatting
//!
//! Entries are stored as `<timestamp> [tag] text` lines; the tag marker is
//! optional. Rendering colors the tag with a stable per-tag color so the same
//! tag always looks the same.

use crossterm::style::{Color, Stylize};

/// Length of the timestamp prefix produced by the store ("%Y-%m-%d %H:%M:%S")
const TIMESTAMP_LEN: usize = 19;

/// Colors cycled through for tags
const TAG_COLORS: [Color; 6] = [
    Color::DarkGreen,
    Color::DarkYellow,
    Color::DarkBlue,
    Color::DarkMagenta,
    Color::DarkCyan,
    Color::DarkRed,
];

/// Extract the tag from an entry line, if the optional `[tag]` marker is
/// present right after the timestamp prefix
pub fn entry_tag(line: &str) -> Option<&str> {
    let rest = line.get(TIMESTAMP_LEN + 1..)?;
    let rest = rest.strip_prefix('[')?;
    let end = rest.find(']')?;
    let tag = &rest[..end];
    if tag.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Pick a stable color for a tag
fn tag_color(tag: &str) -> Color {
    let sum: usize = tag.bytes().map(|b| b as usize).sum();
    TAG_COLORS[sum % TAG_COLORS.len()]
}

/// Render one entry line, coloring the tag marker when present
pub fn format_entry(line: &str) -> String {
    match entry_tag(line) {
        Some(tag) => {
            let marker = format!("[{}]", tag);
            let colored = marker.as_str().with(tag_color(tag)).to_string();
            line.replacen(&marker, &colored, 1)
        }
        None => line.to_string(),
    }
}

/// Render a list of entries, one per line
pub fn format_entries(entries: &[String]) -> String {
    entries
        .iter()
        .map(|line| format_entry(line))
        .collect::<Vec<_>>()
        .join("\n")
}
