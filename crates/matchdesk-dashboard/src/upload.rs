//! Bulk user upload: orchestration and the dialog state around it
//!
//! [`BulkUploadOrchestrator`] runs one upload at a time: read the file, parse
//! it, hand the rows to the backend and return a [`BulkUploadResult`]. Every
//! failure along the way is folded into a single-error result so the dialog
//! always has something to show.

use crate::intake::{FileGesture, FileIntake, IntakeOutcome};
use crate::{DashboardError, Result};
use matchdesk_core::types::{BulkUploadResult, SelectedFile};
use matchdesk_core::utils::format_file_size;
use matchdesk_services::{AdminService, parse_csv_data};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{error, info, warn};

/// Message used when a failure carries no text of its own
pub const FALLBACK_FAILURE_MESSAGE: &str = "Upload failed";

/// Releases the in-flight flag when dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs bulk uploads against the admin backend, one at a time
pub struct BulkUploadOrchestrator {
    service: Arc<dyn AdminService>,
    max_file_size: u64,
    in_flight: AtomicBool,
}

impl BulkUploadOrchestrator {
    /// Create an orchestrator that refuses files larger than `max_file_size` bytes
    pub fn new(service: Arc<dyn AdminService>, max_file_size: u64) -> Self {
        Self {
            service,
            max_file_size,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Whether an upload is currently running
    pub fn is_uploading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Upload `file` with no completion callback
    pub async fn upload(&self, file: &SelectedFile) -> Result<BulkUploadResult> {
        self.upload_with(file, |_| {}).await
    }

    /// Upload `file` and hand the final result to `on_complete`
    ///
    /// The callback runs for successful and failed uploads alike.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UploadInProgress`] without touching the file or
    /// the callback when another upload is still running.
    pub async fn upload_with<F>(
        &self,
        file: &SelectedFile,
        on_complete: F,
    ) -> Result<BulkUploadResult>
    where
        F: FnOnce(&BulkUploadResult) + Send,
    {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!(name = %file.name, "Upload rejected, another upload is in progress");
            return Err(DashboardError::UploadInProgress);
        };

        info!(name = %file.name, size = file.size, "Starting bulk upload");

        let result = match self.run(file).await {
            Ok(result) => {
                info!(
                    processed = result.total_processed,
                    created = result.success_count,
                    failed = result.error_count,
                    "Bulk upload finished"
                );
                result
            }
            Err(e) => {
                error!(name = %file.name, error = %e, "Bulk upload failed");
                let message = e.to_string();
                if message.trim().is_empty() {
                    BulkUploadResult::failed(FALLBACK_FAILURE_MESSAGE)
                } else {
                    BulkUploadResult::failed(message)
                }
            }
        };

        on_complete(&result);
        Ok(result)
    }

    async fn run(&self, file: &SelectedFile) -> Result<BulkUploadResult> {
        if file.size > self.max_file_size {
            return Err(DashboardError::invalid_file(
                &file.name,
                format!(
                    "file is {}, the limit is {}",
                    format_file_size(file.size),
                    format_file_size(self.max_file_size)
                ),
            ));
        }

        let text = tokio::fs::read_to_string(&file.path).await?;
        let rows = parse_csv_data(&text)?;
        let result = self.service.bulk_upload_users(&rows).await?;
        Ok(result)
    }
}

impl std::fmt::Debug for BulkUploadOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BulkUploadOrchestrator")
            .field("service", &self.service.name())
            .field("max_file_size", &self.max_file_size)
            .field("in_flight", &self.is_uploading())
            .finish()
    }
}

/// State of the bulk upload dialog
///
/// Holds the selected file and the last result. Dismissing the dialog clears
/// both.
#[derive(Debug)]
pub struct BulkUploadDialog {
    orchestrator: Arc<BulkUploadOrchestrator>,
    intake: FileIntake,
    result: Option<BulkUploadResult>,
}

impl BulkUploadDialog {
    /// Create a dialog driving `orchestrator`
    pub const fn new(orchestrator: Arc<BulkUploadOrchestrator>) -> Self {
        Self {
            orchestrator,
            intake: FileIntake::new(),
            result: None,
        }
    }

    /// Handle a drop or picker gesture
    pub fn select(&mut self, gesture: FileGesture) -> IntakeOutcome {
        self.intake.handle(gesture)
    }

    /// Currently held file
    pub const fn selected(&self) -> Option<&SelectedFile> {
        self.intake.selected()
    }

    /// Whether the upload action is available
    pub fn can_upload(&self) -> bool {
        self.intake.selected().is_some() && !self.orchestrator.is_uploading()
    }

    /// Upload the held file, storing and returning the result
    pub async fn upload<F>(&mut self, on_complete: F) -> Result<&BulkUploadResult>
    where
        F: FnOnce(&BulkUploadResult) + Send,
    {
        let file = self
            .intake
            .selected()
            .ok_or(DashboardError::NoFileSelected)?;
        let result = self.orchestrator.upload_with(file, on_complete).await?;
        Ok(self.result.insert(result))
    }

    /// Result of the last upload
    pub const fn result(&self) -> Option<&BulkUploadResult> {
        self.result.as_ref()
    }

    /// Close the dialog, forgetting the file and the result
    pub fn dismiss(&mut self) {
        self.intake.clear();
        self.result = None;
    }
}
