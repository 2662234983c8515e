//! Error types for the admin service layer

use thiserror::Error;

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur while talking to the admin backend
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The backend answered with an error message meant for the operator
    #[error("{0}")]
    Remote(String),

    /// The backend answered with a non-success status and no usable message
    #[error("Admin API returned {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },

    /// Transport failure talking to the backend
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Spreadsheet could not be parsed
    #[error("CSV error on line {line}: {message}")]
    Csv {
        /// 1-based line number in the file, 0 when unknown
        line: u64,
        /// Error message
        message: String,
    },

    /// Request rejected before reaching the backend
    #[error("Validation error: {message}")]
    Validation {
        /// Error message
        message: String,
    },

    /// Requested entity does not exist
    #[error("Not found: {resource}")]
    NotFound {
        /// Resource that was not found
        resource: String,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    Configuration {
        /// Error message
        message: String,
    },
}

impl ServiceError {
    /// Create a remote error carrying the backend's message verbatim
    pub fn remote(message: impl Into<String>) -> Self {
        Self::Remote(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a CSV error
    pub fn csv(line: u64, message: impl Into<String>) -> Self {
        Self::Csv {
            line,
            message: message.into(),
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(err) => err.is_timeout() || err.is_connect(),
            Self::Status { status } => *status >= 500,
            _ => false,
        }
    }
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        Self::Csv {
            line,
            message: err.to_string(),
        }
    }
}

impl From<matchdesk_core::Error> for ServiceError {
    fn from(err: matchdesk_core::Error) -> Self {
        match err {
            matchdesk_core::Error::Validation { field, message } => Self::Validation {
                message: format!("{field}: {message}"),
            },
            matchdesk_core::Error::NotFound { resource } => Self::NotFound { resource },
            matchdesk_core::Error::Configuration { message } => Self::Configuration { message },
            other => Self::Remote(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_remote_error_displays_verbatim() {
        assert_eq!(
            ServiceError::remote("network timeout").to_string(),
            "network timeout"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = ServiceError::Status { status: 502 };
        assert_eq!(err.to_string(), "Admin API returned 502");
        assert!(err.is_retryable());
        assert!(!ServiceError::Status { status: 404 }.is_retryable());
    }

    #[test]
    fn test_csv_error_display() {
        let err = ServiceError::csv(3, "missing email");
        assert_eq!(err.to_string(), "CSV error on line 3: missing email");
    }

    #[test]
    fn test_core_validation_error_conversion() {
        let core = matchdesk_core::Error::Validation {
            field: "min_age".to_string(),
            message: "too low".to_string(),
        };
        let err = ServiceError::from(core);
        assert_eq!(err.to_string(), "Validation error: min_age: too low");
    }
}
