//! Shared types for the dry-fruits admin console
//!
//! Wire and domain models used by the console client and anything that
//! renders its state: products, localized text, categories, users,
//! sessions, error codes and in-process console events.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{ErrorCategory, ErrorCode};
pub use message::ConsoleEvent;
pub use models::*;
