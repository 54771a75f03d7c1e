//! Transient user-facing messages (snackbar / dialog alert)

use crate::ClientError;
use shared::ErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// Set for errors so a UI can localize
    pub code: Option<ErrorCode>,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            code: None,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            code: None,
        }
    }

    /// Error notice under `code`, with the underlying error appended
    pub fn failure(code: ErrorCode, err: &ClientError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!("{}: {err}", code.message()),
            code: Some(code),
        }
    }

    pub fn error(err: &ClientError) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: err.to_string(),
            code: Some(err.code()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}
