//! Admin Console Client
//!
//! REST client and page controllers for the storefront admin console:
//! catalog editing, user approvals and activity reports, header actions.

pub mod catalog;
pub mod config;
pub mod debounce;
pub mod error;
pub mod events;
pub mod header;
pub mod http;
pub mod logger;
pub mod notice;
pub mod storage;
pub mod translate;
pub mod users;

pub use catalog::{CatalogEditor, CatalogSnapshot};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use events::{EventBus, Listener, Subscription};
pub use header::HeaderActions;
pub use http::{ConsoleApi, ImageFile, NetworkHttpClient};
pub use notice::{Notice, NoticeLevel};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore};
pub use translate::{MyMemoryTranslator, Translator};
pub use users::{UserApprovals, UserManagement};

// Re-export shared types for convenience
pub use shared::ConsoleEvent;
pub use shared::models::{Language, LocalizedText, Product, ProductId};
