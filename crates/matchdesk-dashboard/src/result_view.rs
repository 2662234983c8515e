//! Rendering of a finished bulk upload

use matchdesk_core::types::{BulkUploadResult, UploadError};
use matchdesk_core::utils::truncate_cell;
use std::fmt;

/// Widest row preview shown next to an error
const DATA_PREVIEW_CHARS: usize = 60;

/// Headline for a finished upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadHeadline {
    /// Every row was created
    Completed,
    /// Some rows were created, some failed
    CompletedWithErrors,
    /// Nothing could be processed
    Failed,
}

impl fmt::Display for UploadHeadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => write!(f, "Upload completed"),
            Self::CompletedWithErrors => write!(f, "Upload completed with errors"),
            Self::Failed => write!(f, "Upload failed"),
        }
    }
}

/// Read-only view over a [`BulkUploadResult`]
#[derive(Debug, Clone, Copy)]
pub struct ResultPanel<'a> {
    result: &'a BulkUploadResult,
}

impl<'a> ResultPanel<'a> {
    /// Wrap a result for display
    pub const fn new(result: &'a BulkUploadResult) -> Self {
        Self { result }
    }

    /// Headline for the panel
    pub const fn headline(&self) -> UploadHeadline {
        if self.result.success && self.result.error_count == 0 {
            UploadHeadline::Completed
        } else if self.result.success_count > 0 {
            UploadHeadline::CompletedWithErrors
        } else {
            UploadHeadline::Failed
        }
    }

    /// `(processed, succeeded, failed)` as reported by the backend
    pub const fn counts(&self) -> (usize, usize, usize) {
        (
            self.result.total_processed,
            self.result.success_count,
            self.result.error_count,
        )
    }

    /// Per-row errors in backend order
    pub fn error_rows(&self) -> &'a [UploadError] {
        &self.result.errors
    }

    /// One line per error: `Row N: message`, with a preview of the row data
    pub fn error_lines(&self) -> Vec<String> {
        self.result
            .errors
            .iter()
            .map(|e| match e.data {
                Some(ref data) => format!(
                    "Row {}: {} ({})",
                    e.row,
                    e.message,
                    truncate_cell(&data.to_string(), DATA_PREVIEW_CHARS)
                ),
                None => format!("Row {}: {}", e.row, e.message),
            })
            .collect()
    }
}

impl fmt::Display for ResultPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (processed, succeeded, failed) = self.counts();
        writeln!(f, "{}", self.headline())?;
        writeln!(f, "  Total processed: {processed}")?;
        writeln!(f, "  Successful:      {succeeded}")?;
        writeln!(f, "  Failed:          {failed}")?;

        if !self.result.errors.is_empty() {
            writeln!(f, "Errors:")?;
            for line in self.error_lines() {
                writeln!(f, "  {line}")?;
            }
        }
        Ok(())
    }
}
