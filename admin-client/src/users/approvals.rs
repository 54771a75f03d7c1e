//! User approval decisions
//!
//! A decision goes to the backend first; only on success is it recorded in
//! the local override map and announced on the event bus. Overrides are
//! display hints persisted under [`APPROVAL_STATUS_KEY`]; the backend stays
//! authoritative.

use crate::events::EventBus;
use crate::http::ConsoleApi;
use crate::storage::{KeyValueStore, MemoryStore};
use crate::{ClientError, ClientResult};
use shared::models::{ApprovalStatus, UserId};
use shared::{ConsoleEvent, ErrorCode};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

pub const APPROVAL_STATUS_KEY: &str = "userApprovalStatus";

/// Ids the backend hands out for users it cannot identify
const PLACEHOLDER_IDS: [&str; 2] = ["anonymous", "N/A"];

/// Locally remembered approval decisions, keyed by trimmed user id
pub struct ApprovalOverrides {
    store: Arc<dyn KeyValueStore>,
    entries: Mutex<HashMap<String, ApprovalStatus>>,
}

impl ApprovalOverrides {
    /// Load persisted overrides; unreadable state starts empty
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = match store.get(APPROVAL_STATUS_KEY).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!("Discarding unreadable approval overrides: {e}");
                HashMap::new()
            }),
            Ok(None) => HashMap::new(),
            Err(e) => {
                tracing::warn!("Could not load approval overrides: {e}");
                HashMap::new()
            }
        };
        Self {
            store,
            entries: Mutex::new(entries),
        }
    }

    /// Overrides that live only as long as this process
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, ApprovalStatus>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, user_id: &str) -> Option<ApprovalStatus> {
        self.entries().get(user_id.trim()).copied()
    }

    pub fn snapshot(&self) -> HashMap<String, ApprovalStatus> {
        self.entries().clone()
    }

    /// Remember `status` for `user_id` and persist the whole map
    pub async fn record(&self, user_id: &str, status: ApprovalStatus) -> ClientResult<()> {
        let json = {
            let mut entries = self.entries();
            entries.insert(user_id.trim().to_string(), status);
            serde_json::to_string(&*entries)?
        };
        self.store.set(APPROVAL_STATUS_KEY, &json).await
    }
}

impl std::fmt::Debug for ApprovalOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalOverrides")
            .field("entries", &*self.entries())
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct UserApprovals {
    api: Arc<dyn ConsoleApi>,
    overrides: Arc<ApprovalOverrides>,
    bus: EventBus,
}

impl std::fmt::Debug for UserApprovals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserApprovals")
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl UserApprovals {
    pub fn new(api: Arc<dyn ConsoleApi>, overrides: Arc<ApprovalOverrides>, bus: EventBus) -> Self {
        Self {
            api,
            overrides,
            bus,
        }
    }

    pub fn overrides(&self) -> &Arc<ApprovalOverrides> {
        &self.overrides
    }

    pub async fn approve(&self, user_id: &str) -> ClientResult<()> {
        self.decide(user_id, ApprovalStatus::Approved).await
    }

    pub async fn reject(&self, user_id: &str) -> ClientResult<()> {
        self.decide(user_id, ApprovalStatus::Rejected).await
    }

    /// Send `status` for `user_id`
    ///
    /// Missing or placeholder ids fail before any request. A failed override
    /// write is logged; the decision itself already succeeded.
    pub async fn decide(&self, user_id: &str, status: ApprovalStatus) -> ClientResult<()> {
        let id = user_id.trim();
        if id.is_empty() || PLACEHOLDER_IDS.contains(&id) {
            return Err(ClientError::invalid(
                ErrorCode::UserInvalidId,
                format!("Invalid user ID. Cannot {} this user.", status.action()),
            ));
        }

        match self.api.set_approval(id, status).await {
            Ok(()) => {}
            Err(ClientError::Status { status: code, message }) if message.is_empty() => {
                let err = ClientError::Status {
                    status: code,
                    message: format!("Failed to {} user", status.action()),
                };
                tracing::error!(user_id = %id, "{err}");
                return Err(err);
            }
            Err(e) => {
                tracing::error!(user_id = %id, %status, "Approval request failed: {e}");
                return Err(e);
            }
        }

        if let Err(e) = self.overrides.record(id, status).await {
            tracing::warn!(user_id = %id, "Could not persist approval override: {e}");
        }
        tracing::info!(user_id = %id, %status, "User approval changed");
        self.bus.publish(ConsoleEvent::UserApprovalChanged {
            user_id: UserId::new(id),
            status,
        });
        Ok(())
    }
}
