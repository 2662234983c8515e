//! Integration tests for the bulk user upload dialog

#![allow(clippy::unwrap_used)]

mod common;

use common::*;
use matchdesk_core::types::PhotoFilters;
use matchdesk_dashboard::template::template_csv;
use matchdesk_dashboard::{
    BulkUploadDialog, BulkUploadOrchestrator, DashboardError, FileGesture, IntakeOutcome,
    ResultPanel,
};
use matchdesk_services::{AdminService, MockAdminService};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

const MAX_FILE_SIZE: u64 = 1024 * 1024;

fn dialog_for(service: Arc<MockAdminService>) -> BulkUploadDialog {
    BulkUploadDialog::new(Arc::new(BulkUploadOrchestrator::new(service, MAX_FILE_SIZE)))
}

/// A filled-in template goes end to end and creates users and photos
#[tokio::test]
async fn test_template_round_trip_creates_user() {
    init_test_logging();
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(MockAdminService::new());
    let mut dialog = dialog_for(service.clone());

    let file = write_file(dir.path(), "filled.csv", &template_csv().unwrap());
    let outcome = dialog.select(FileGesture::Drop(vec![file]));
    assert_eq!(
        outcome,
        IntakeOutcome::Accepted {
            name: "filled.csv".to_string()
        }
    );

    let result = dialog.upload(|_| {}).await.unwrap().clone();

    assert!(result.success);
    assert_eq!(result.success_count, 1);
    assert_eq!(result.created_user_ids.len(), 1);
    assert_eq!(service.users()[0].email, "jane.doe@example.com");
    let photos = service
        .get_photos(1, 10, &PhotoFilters::default())
        .await
        .unwrap();
    assert_eq!(photos.total, 2);
}

/// Partial failure renders exactly the reported numbers and error rows
#[tokio::test]
async fn test_partial_failure_renders_counts() {
    let dir = tempfile::tempdir().unwrap();
    let mut dialog = dialog_for(Arc::new(MockAdminService::new()));
    dialog.select(FileGesture::Picker(Some(write_file(
        dir.path(),
        "mixed.csv",
        MIXED_UPLOAD_CSV,
    ))));

    let result = dialog.upload(|_| {}).await.unwrap();
    let panel = ResultPanel::new(result);

    assert_eq!(panel.counts(), (5, 3, 2));
    assert_eq!(panel.error_rows().len(), 2);
    let rows: Vec<usize> = panel.error_rows().iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![4, 6]);
    let rendered = panel.to_string();
    assert!(rendered.contains("Total processed: 5"));
    assert!(rendered.contains("Row 6: Age must be between 18 and 100, got 16"));
}

/// A rejected file leaves the previously held file in place
#[tokio::test]
async fn test_rejected_file_keeps_selection() {
    let dir = tempfile::tempdir().unwrap();
    let mut dialog = dialog_for(Arc::new(MockAdminService::new()));
    dialog.select(FileGesture::Picker(Some(write_file(
        dir.path(),
        "users.csv",
        CLEAN_UPLOAD_CSV,
    ))));

    let outcome = dialog.select(FileGesture::Drop(vec![write_file(
        dir.path(),
        "photo.png",
        "not a spreadsheet",
    )]));

    assert_eq!(
        outcome,
        IntakeOutcome::Rejected {
            name: "photo.png".to_string()
        }
    );
    assert_eq!(dialog.selected().unwrap().name, "users.csv");
}

/// Spreadsheet-tool output with one unreadable cell still creates the good rows
#[tokio::test]
async fn test_unreadable_cell_fails_only_its_row() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(MockAdminService::new());
    let mut dialog = dialog_for(service.clone());
    dialog.select(FileGesture::Picker(Some(write_file(
        dir.path(),
        "export.csv",
        SPREADSHEET_EXPORT_CSV,
    ))));

    let result = dialog.upload(|_| {}).await.unwrap();

    assert!(!result.success);
    assert_eq!((result.total_processed, result.success_count, result.error_count), (3, 2, 1));
    assert_eq!(result.errors[0].row, 3);
    assert_eq!(
        result.errors[0].message,
        "Invalid age: expected a whole number, got \"twenty\""
    );
    assert!(result.errors[0].data.is_some());

    let users = service.users();
    let emails: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails, vec!["ana@example.com", "cy@example.com"]);
    assert!(users[0].is_verified);
    assert!(!users[1].is_verified);
}

/// Backend failure produces the single synthesized error and still calls back
#[tokio::test]
async fn test_network_timeout_result() {
    let dir = tempfile::tempdir().unwrap();
    let service = Arc::new(MockAdminService::new().with_failure("network timeout"));
    let orchestrator = BulkUploadOrchestrator::new(service, MAX_FILE_SIZE);
    let file = write_file(dir.path(), "users.csv", CLEAN_UPLOAD_CSV);
    let callbacks = AtomicUsize::new(0);

    let result = orchestrator
        .upload_with(&file, |_| {
            callbacks.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert!(!result.success);
    assert_eq!(result.error_count, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].message, "network timeout");
    assert_eq!(callbacks.load(Ordering::SeqCst), 1);
}

/// A second upload while one is running is refused without a result or callback
#[tokio::test]
async fn test_concurrent_upload_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let gate = Arc::new(Notify::new());
    let service = Arc::new(MockAdminService::new().with_gate(gate.clone()));
    let orchestrator = BulkUploadOrchestrator::new(service.clone(), MAX_FILE_SIZE);
    let file = write_file(dir.path(), "users.csv", CLEAN_UPLOAD_CSV);
    let callbacks = AtomicUsize::new(0);

    let (first, second) = tokio::join!(
        orchestrator.upload_with(&file, |_| {
            callbacks.fetch_add(1, Ordering::SeqCst);
        }),
        async {
            // Wait until the first upload is held inside the backend.
            while service.call_count("bulk_upload_users") == 0 {
                tokio::task::yield_now().await;
            }
            assert!(orchestrator.is_uploading());
            let second = orchestrator
                .upload_with(&file, |_| {
                    callbacks.fetch_add(1, Ordering::SeqCst);
                })
                .await;
            gate.notify_one();
            second
        }
    );

    assert!(first.unwrap().success);
    assert!(matches!(second, Err(DashboardError::UploadInProgress)));
    assert_eq!(callbacks.load(Ordering::SeqCst), 1);
    assert_eq!(service.call_count("bulk_upload_users"), 1);
    assert!(!orchestrator.is_uploading());

    // The guard is released, so the next upload runs.
    gate.notify_one();
    let third = orchestrator.upload(&file).await.unwrap();
    assert_eq!(third.error_count, 2);
}
