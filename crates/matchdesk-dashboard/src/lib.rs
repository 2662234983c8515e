//! Dashboard pages and dialogs for the matchdesk admin console
//!
//! Pages own their query state and render as text; dialogs hold the state of
//! the bulk user upload and manual swipe workflows. Everything talks to the
//! backend through [`matchdesk_services::AdminService`].

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::significant_drop_tightening,
    clippy::future_not_send
)]

pub mod error;
pub mod intake;
pub mod pages;
pub mod query;
pub mod result_view;
pub mod state;
pub mod swipes;
pub mod template;
pub mod upload;

pub use error::{DashboardError, Result};
pub use intake::{FileGesture, FileIntake, IntakeOutcome};
pub use query::{ListController, ListQuery, RequestSequencer, RequestToken};
pub use result_view::ResultPanel;
pub use state::AppState;
pub use swipes::{AddTargetOutcome, MAX_TARGET_USERS, SubmitOutcome, SwipeCreationForm};
pub use upload::{BulkUploadDialog, BulkUploadOrchestrator};
