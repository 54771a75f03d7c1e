//! Client error types

use shared::ErrorCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connection, timeout, TLS)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response, even when the body parses. `message` is the
    /// server-provided reason and may be empty.
    #[error("{}", status_text(.status, .message))]
    Status { status: u16, message: String },

    /// Malformed or unexpected response body
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Presence/parse check failed before any request was made
    #[error("Validation error: {message}")]
    Validation { code: ErrorCode, message: String },

    /// A mutating action targeted a legacy non-numeric id
    #[error("Id `{0}` is not numeric")]
    NonNumericId(String),

    /// Some items of a concurrent batch failed; the rest went through
    #[error("{action}: {} of {total} failed ({})", .failed.len(), .failed.join(", "))]
    Batch {
        action: String,
        failed: Vec<String>,
        total: usize,
    },

    /// Key-value store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Report export failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

fn status_text(status: &u16, message: &str) -> String {
    if message.is_empty() {
        format!("Request failed. Status: {status}")
    } else {
        format!("{message} (status {status})")
    }
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::invalid(ErrorCode::ValidationFailed, message)
    }

    /// Validation failure with a specific code
    pub fn invalid(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    /// Validation failure whose message is the code's own
    pub fn required(code: ErrorCode) -> Self {
        Self::invalid(code, code.message())
    }

    /// Stable code for UI localization
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Http(_) => ErrorCode::NetworkError,
            ClientError::Status { status, .. } => ErrorCode::from_http_status(*status),
            ClientError::InvalidResponse(_) | ClientError::Serialization(_) => {
                ErrorCode::InvalidFormat
            }
            ClientError::Validation { code, .. } => *code,
            ClientError::NonNumericId(_) => ErrorCode::ProductInvalidId,
            ClientError::Batch { .. } => ErrorCode::PartialFailure,
            ClientError::Storage(_) => ErrorCode::StorageError,
            ClientError::Csv(_) => ErrorCode::InternalError,
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_message_lists_failed_ids() {
        let err = ClientError::Batch {
            action: "save prices".into(),
            failed: vec!["2".into(), "5".into()],
            total: 4,
        };
        assert_eq!(err.to_string(), "save prices: 2 of 4 failed (2, 5)");
        assert_eq!(err.code(), ErrorCode::PartialFailure);
    }

    #[test]
    fn test_validation_keeps_its_code() {
        let err = ClientError::required(ErrorCode::BannerTextRequired);
        assert_eq!(err.code(), ErrorCode::BannerTextRequired);
        assert_eq!(
            err.to_string(),
            "Validation error: Please enter banner text in English (EN)"
        );
        assert_eq!(
            ClientError::validation("Nothing to confirm").code(),
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn test_status_code_mapping() {
        let err = ClientError::Status {
            status: 404,
            message: "gone".into(),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.to_string(), "gone (status 404)");

        let err = ClientError::Status {
            status: 502,
            message: String::new(),
        };
        assert_eq!(err.to_string(), "Request failed. Status: 502");
    }
}
