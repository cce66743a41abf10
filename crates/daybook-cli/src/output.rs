//! Output formatting helpers for the CLI.

use std::io::IsTerminal;

use comfy_table::presets::NOTHING;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use daybook_core::{Draft, Entry, MAX_RATING, NO_RATING};
use owo_colors::OwoColorize;

use crate::constants::DATE_FORMAT;

/// Colors only on a terminal, and never when NO_COLOR is set.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Convert an entry to JSON for output.
pub fn entry_json(entry: &Entry) -> serde_json::Value {
    serde_json::json!({
        "date": entry.date.format(DATE_FORMAT).to_string(),
        "rating": entry.rating,
        "text": entry.text,
    })
}

pub fn entries_json(entries: &[Entry]) -> Vec<serde_json::Value> {
    entries.iter().map(entry_json).collect()
}

pub fn draft_json(draft: &Draft) -> serde_json::Value {
    serde_json::json!({
        "editing_started": draft.editing_started.format(DATE_FORMAT).to_string(),
        "rating": draft.rating,
        "text": draft.text,
    })
}

/// Rating as stars, `-` when unrated.
pub fn rating_label(rating: i32) -> String {
    if rating == NO_RATING {
        return "-".to_string();
    }
    let filled = rating.clamp(0, MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "*".repeat(filled), ".".repeat(empty))
}

fn colored_rating(rating: i32, color: bool) -> String {
    let label = rating_label(rating);
    if !color {
        return label;
    }
    match rating {
        r if r >= 4 => label.green().to_string(),
        r if r >= 2 => label.yellow().to_string(),
        r if r >= 0 => label.red().to_string(),
        _ => label.dimmed().to_string(),
    }
}

/// First line of the text, shortened for list display.
pub fn summary(text: &str, max_len: usize) -> String {
    let first = text.lines().next().unwrap_or_default();
    let char_count = first.chars().count();
    if char_count <= max_len && !text.contains('\n') {
        return first.to_string();
    }
    let truncated: String = first.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", truncated)
}

/// Print a single entry in human-readable format.
pub fn print_entry(entry: &Entry, quiet: bool) {
    if !quiet {
        let color = use_color();
        let date = entry.date.format(DATE_FORMAT).to_string();
        if color {
            println!("{}  {}", date.bold(), colored_rating(entry.rating, true));
        } else {
            println!("{}  {}", date, rating_label(entry.rating));
        }
        println!();
    }
    println!("{}", entry.text);
}

/// Print entries as a borderless table, or one line per entry in quiet mode.
pub fn print_entry_list(entries: &[Entry], quiet: bool) {
    if quiet {
        for entry in entries {
            println!(
                "{} {} {}",
                entry.date.format(DATE_FORMAT),
                entry.rating,
                summary(&entry.text, 60)
            );
        }
        return;
    }

    if entries.is_empty() {
        println!("No entries found.");
        return;
    }

    let color = use_color();
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header: Vec<Cell> = ["DATE", "RATING", "TEXT"]
        .into_iter()
        .map(|title| {
            let cell = Cell::new(title);
            if color {
                cell.add_attribute(Attribute::Dim)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(header);

    for entry in entries {
        table.add_row(vec![
            entry.date.format(DATE_FORMAT).to_string(),
            colored_rating(entry.rating, color),
            summary(&entry.text, 60),
        ]);
    }

    println!("{}", table);
}
