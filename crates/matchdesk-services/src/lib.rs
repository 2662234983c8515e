//! Admin service layer for the matchdesk console
//!
//! The console never talks to the backend directly. Every page goes through the
//! [`AdminService`] trait, which has an HTTP implementation for the real admin
//! API and an in-memory implementation for tests and offline use. Bulk upload
//! spreadsheets are parsed here too, so both backends receive typed rows.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, missing_docs)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::cast_possible_truncation,
    clippy::significant_drop_tightening,
    clippy::unnecessary_literal_bound,
    clippy::return_self_not_must_use
)]

pub mod csv_import;
pub mod error;
pub mod http;
pub mod mock;
pub mod service;

pub use csv_import::{TEMPLATE_HEADERS, UserCsvRow, parse_csv_data};
pub use error::{ServiceError, ServiceResult};
pub use http::HttpAdminService;
pub use mock::MockAdminService;
pub use service::AdminService;
