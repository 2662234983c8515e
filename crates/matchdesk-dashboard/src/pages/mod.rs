//! Dashboard pages
//!
//! Each page owns its query state and renders itself as plain text tables.

pub mod matches;
pub mod media;
pub mod moderation;
pub mod overview;
pub mod settings;

pub use matches::MatchesPage;
pub use media::MediaPage;
pub use moderation::ModerationPage;
pub use overview::OverviewPage;
pub use settings::SettingsPage;

use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Widest any single table cell is allowed to render
const MAX_CELL_CHARS: usize = 40;

/// Render rows under a header as a space-aligned table
pub(crate) fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|cell| matchdesk_core::utils::truncate_cell(cell, MAX_CELL_CHARS))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers.iter().map(ToString::to_string).collect();
    push_row(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &cells {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, row: &[String], widths: &[usize]) {
    let line: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, width)| {
            let cell = row.get(i).map_or("", String::as_str);
            format!("{cell:<width$}")
        })
        .collect();
    let _ = writeln!(out, "{}", line.join("  ").trim_end());
}

/// `Page 2 of 5 (93 total)`
pub(crate) fn pagination_line(page: u32, total_pages: u32, total: u64) -> String {
    format!("Page {page} of {total_pages} ({total} total)")
}

/// Timestamp as shown in tables
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(
            &["ID", "Name"],
            &[
                vec!["1".to_string(), "Ana".to_string()],
                vec!["100".to_string(), "Bo".to_string()],
            ],
        );

        assert_eq!(table, "ID   Name\n---  ----\n1    Ana\n100  Bo\n");
    }

    #[test]
    fn test_render_table_empty_rows() {
        assert_eq!(render_table(&["A"], &[]), "A\n-\n");
    }

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 0).single();
        assert_eq!(
            ts.map(format_timestamp).as_deref(),
            Some("2024-03-09 14:05")
        );
    }
}
