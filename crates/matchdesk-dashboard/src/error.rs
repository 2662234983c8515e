//! Error types for the dashboard pages and dialogs

use matchdesk_services::ServiceError;
use std::{error::Error as StdError, fmt};

/// Result type alias for dashboard operations
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors that can escape a dashboard page or dialog
#[derive(Debug)]
pub enum DashboardError {
    /// An upload is already running on this orchestrator
    UploadInProgress,

    /// Upload requested with no file held
    NoFileSelected,

    /// A file was offered that is not an accepted spreadsheet
    InvalidFile {
        /// File name as offered
        name: String,
        /// Reason for rejection
        reason: String,
    },

    /// Form input failed local validation
    Validation {
        /// Message shown to the operator
        message: String,
    },

    /// Admin service call failed
    Service(ServiceError),

    /// Core configuration or utility error
    Core(matchdesk_core::Error),

    /// I/O error
    Io(std::io::Error),

    /// CSV writer error
    Csv(csv::Error),
}

impl DashboardError {
    /// Create a new validation error
    #[must_use]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new invalid file error
    #[must_use]
    pub fn invalid_file<N: Into<String>, S: Into<String>>(name: N, reason: S) -> Self {
        Self::InvalidFile {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for DashboardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UploadInProgress => write!(f, "An upload is already in progress"),
            Self::NoFileSelected => write!(f, "No file selected"),
            Self::InvalidFile { name, reason } => write!(f, "Invalid file {name}: {reason}"),
            Self::Validation { message } => write!(f, "{message}"),
            Self::Service(err) => write!(f, "{err}"),
            Self::Core(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Csv(err) => write!(f, "CSV error: {err}"),
        }
    }
}

impl StdError for DashboardError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Core(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ServiceError> for DashboardError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl From<matchdesk_core::Error> for DashboardError {
    fn from(err: matchdesk_core::Error) -> Self {
        Self::Core(err)
    }
}

impl From<std::io::Error> for DashboardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for DashboardError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}
