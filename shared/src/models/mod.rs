//! Data models
//!
//! Shared between the console client and whatever renders it.
//! Wire rows (`*Row`, `*Response`) are deliberately permissive; domain
//! types are what the controllers hold.

pub mod banner;
pub mod category;
pub mod ids;
pub mod localized;
pub mod product;
pub mod user;

// Re-exports
pub use banner::*;
pub use category::*;
pub use ids::*;
pub use localized::*;
pub use product::*;
pub use user::*;
