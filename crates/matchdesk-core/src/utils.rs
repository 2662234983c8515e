//! Utility functions for the matchdesk admin console

use crate::Result;
use crate::types::SelectedFile;
use std::path::Path;

/// MIME types the bulk upload dialog accepts
pub const ACCEPTED_SPREADSHEET_TYPES: [&str; 3] = [
    "text/csv",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
];

/// Whether a file looks like an uploadable spreadsheet
///
/// Accepts a declared MIME type from [`ACCEPTED_SPREADSHEET_TYPES`], or any name
/// ending in `.csv` regardless of the declared type.
#[must_use]
pub fn is_accepted_spreadsheet(mime_type: Option<&str>, file_name: &str) -> bool {
    mime_type.is_some_and(|mime| ACCEPTED_SPREADSHEET_TYPES.contains(&mime))
        || file_name.to_ascii_lowercase().ends_with(".csv")
}

/// Guess the declared MIME type of a local file from its extension
#[must_use]
pub fn guess_mime_type(path: &Path) -> Option<String> {
    mime_guess::from_path(path)
        .first_raw()
        .map(ToString::to_string)
}

/// Describe a local file the way a file picker would hand it over
///
/// # Errors
///
/// Returns an error if the path has no file name or its metadata cannot be read.
pub fn selected_file_from_path(path: &Path) -> Result<SelectedFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| crate::Error::Validation {
            field: "file".to_string(),
            message: format!("{} has no file name", path.display()),
        })?
        .to_string();

    let metadata = std::fs::metadata(path)?;
    if !metadata.is_file() {
        return Err(crate::Error::Validation {
            field: "file".to_string(),
            message: format!("{} is not a regular file", path.display()),
        });
    }

    Ok(SelectedFile {
        name,
        size: metadata.len(),
        mime_type: guess_mime_type(path),
        path: path.to_path_buf(),
    })
}

/// Format a byte count for display
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{size:.1} {}", UNITS[unit])
}

/// Truncate text for a table cell, appending an ellipsis when cut
#[must_use]
pub fn truncate_cell(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{kept}…")
}
