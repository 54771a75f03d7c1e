//! In-process console events
//!
//! Broadcast between console components; never persisted, never sent over
//! the wire. The bus itself lives in `admin_client::events`.

use crate::models::{ApprovalStatus, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event kind, used for filtering and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    UserApprovalChanged,
    CategoryCreated,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::UserApprovalChanged => write!(f, "user_approval_changed"),
            EventKind::CategoryCreated => write!(f, "category_created"),
        }
    }
}

/// Console event payloads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConsoleEvent {
    /// A user was approved or rejected
    UserApprovalChanged { user_id: UserId, status: ApprovalStatus },
    /// A category was created from the header
    CategoryCreated { name: String },
}

impl ConsoleEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ConsoleEvent::UserApprovalChanged { .. } => EventKind::UserApprovalChanged,
            ConsoleEvent::CategoryCreated { .. } => EventKind::CategoryCreated,
        }
    }
}

impl fmt::Display for ConsoleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleEvent::UserApprovalChanged { user_id, status } => {
                write!(f, "{}({user_id} -> {status})", self.kind())
            }
            ConsoleEvent::CategoryCreated { name } => write!(f, "{}({name})", self.kind()),
        }
    }
}
