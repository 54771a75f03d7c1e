//! Unified error codes for the admin console
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 6xxx: Catalog errors (products, categories, images, banner)
//! - 7xxx: User errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values so a UI layer can map them to localized
/// messages without parsing error strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Some items of a batch failed
    PartialFailure = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,

    // ==================== 6xxx: Catalog ====================
    ProductNotFound = 6001,
    ProductInvalidPrice = 6002,
    /// Product id is not numeric (legacy/malformed row)
    ProductInvalidId = 6003,
    CategoryNameRequired = 6102,
    ImageUploadFailed = 6502,
    ImageDeleteFailed = 6503,
    BannerTextRequired = 6601,

    // ==================== 7xxx: User ====================
    UserInvalidId = 7002,

    // ==================== 9xxx: System ====================
    InternalError = 9001,
    NetworkError = 9003,
    StorageError = 9401,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::PartialFailure => "Some items could not be processed",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",

            // Catalog
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInvalidPrice => "Product has invalid price",
            ErrorCode::ProductInvalidId => "Product id is not a valid number",
            ErrorCode::CategoryNameRequired => "Please enter a category name",
            ErrorCode::ImageUploadFailed => "Image upload failed",
            ErrorCode::ImageDeleteFailed => "Failed to delete image from server",
            ErrorCode::BannerTextRequired => "Please enter banner text in English (EN)",

            // User
            ErrorCode::UserInvalidId => "Invalid user ID",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error. Please try again.",
            ErrorCode::StorageError => "Local storage error",
        }
    }

    /// Best-effort mapping from an HTTP status returned by the backend
    pub fn from_http_status(status: u16) -> Self {
        match status {
            200..=299 => ErrorCode::Success,
            400 | 422 => ErrorCode::InvalidRequest,
            401 => ErrorCode::NotAuthenticated,
            403 => ErrorCode::PermissionDenied,
            404 => ErrorCode::NotFound,
            _ => ErrorCode::InternalError,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid error code: {0}")]
pub struct InvalidErrorCode(pub u16);

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            9 => Ok(ErrorCode::PartialFailure),

            // Auth / Permission
            1001 => Ok(ErrorCode::NotAuthenticated),
            2001 => Ok(ErrorCode::PermissionDenied),

            // Catalog
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInvalidPrice),
            6003 => Ok(ErrorCode::ProductInvalidId),
            6102 => Ok(ErrorCode::CategoryNameRequired),
            6502 => Ok(ErrorCode::ImageUploadFailed),
            6503 => Ok(ErrorCode::ImageDeleteFailed),
            6601 => Ok(ErrorCode::BannerTextRequired),

            // User
            7002 => Ok(ErrorCode::UserInvalidId),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9003 => Ok(ErrorCode::NetworkError),
            9401 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}
