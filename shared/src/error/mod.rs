//! Error codes shared by the console client and its UI shells
//!
//! - [`ErrorCode`]: Standardized error codes for every failure the client surfaces
//! - [`ErrorCategory`]: Classification of errors by domain
//!
//! # Example
//!
//! ```
//! use shared::error::{ErrorCategory, ErrorCode};
//!
//! let code = ErrorCode::ImageDeleteFailed;
//! assert_eq!(code.category(), ErrorCategory::Catalog);
//! assert_eq!(code.to_string(), "E6503");
//! ```

mod category;
mod codes;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
