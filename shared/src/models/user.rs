//! User, approval and usage-analytics models

use super::UserId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Registered storefront user (`GET /api/users`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub gst_number: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    /// Backend account status, e.g. `PENDING`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    pub fn is_pending(&self) -> bool {
        self.status.as_deref() == Some("PENDING")
    }

    /// "First Last", falling back to whichever part is present
    pub fn display_name(&self) -> String {
        let first = self.first_name.as_deref().unwrap_or("").trim();
        let last = self.last_name.as_deref().unwrap_or("").trim();
        match (first.is_empty(), last.is_empty()) {
            (false, false) => format!("{first} {last}"),
            (false, true) => first.to_string(),
            (true, false) => last.to_string(),
            (true, true) => "Unknown User".to_string(),
        }
    }
}

/// User awaiting approval (`GET /api/users/pending`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUser {
    #[serde(default)]
    pub id: Option<UserId>,
    #[serde(default)]
    pub mobile: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// `GET /api/admin/user-summary`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSummaryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub users: Vec<UserSummary>,
}

/// Lifetime usage of one user
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_mobile: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    /// Seconds
    #[serde(default)]
    pub total_time_spent: Option<u64>,
    #[serde(default)]
    pub total_time_formatted: Option<String>,
    #[serde(default)]
    pub total_sessions: Option<u64>,
    #[serde(default)]
    pub last_session_formatted: Option<String>,
}

/// `GET /api/admin/user-sessions`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserSessionsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub sessions: Vec<UserSession>,
}

/// One storefront session
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSession {
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub user_mobile: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub session_start: Option<String>,
    #[serde(default)]
    pub last_session_date: Option<String>,
    /// Seconds; sent as a number or a numeric string
    #[serde(default)]
    pub session_duration: Option<Value>,
}

impl UserSession {
    pub fn duration_secs(&self) -> u64 {
        self.session_duration
            .as_ref()
            .map(crate::util::leading_int)
            .unwrap_or(0)
    }

    /// Day the session started (falls back to the last-session stamp)
    pub fn day(&self) -> Option<chrono::NaiveDate> {
        self.session_start
            .as_deref()
            .and_then(crate::util::date_part)
            .or_else(|| self.last_session_date.as_deref().and_then(crate::util::date_part))
    }
}

/// Client-side approval decision, kept for display only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    /// Path segment of `PUT /api/users/{id}/approve|reject`
    pub fn action(&self) -> &'static str {
        match self {
            ApprovalStatus::Approved => "approve",
            ApprovalStatus::Rejected => "reject",
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_display_name_fallbacks() {
        let mut user = User {
            first_name: Some("Asha".into()),
            last_name: Some("Rao".into()),
            ..Default::default()
        };
        assert_eq!(user.display_name(), "Asha Rao");
        user.last_name = None;
        assert_eq!(user.display_name(), "Asha");
        user.first_name = Some("  ".into());
        assert_eq!(user.display_name(), "Unknown User");
    }

    #[test]
    fn test_session_duration_and_day() {
        let session: UserSession = serde_json::from_str(
            r#"{"userId": 4, "sessionDuration": "300", "lastSessionDate": "2024-02-01T09:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(session.duration_secs(), 300);
        assert_eq!(session.day(), NaiveDate::from_ymd_opt(2024, 2, 1));
    }

    #[test]
    fn test_approval_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&ApprovalStatus::Rejected).unwrap(),
            r#""rejected""#
        );
        assert_eq!(ApprovalStatus::Approved.action(), "approve");
    }
}
