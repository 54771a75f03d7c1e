//! User management page: activity report plus approve/reject
//!
//! Decisions can also come from the header's pending list; once
//! [`UserManagement::subscribe`] is called the report reloads on every
//! `UserApprovalChanged` event, whoever published it.

mod approvals;
mod report;

pub use approvals::{APPROVAL_STATUS_KEY, ApprovalOverrides, UserApprovals};
pub use report::{
    ActivityRow, ReportRange, ReportSources, UserActivityReport, build_report, export_csv,
    format_duration,
};

use crate::ClientResult;
use crate::events::{EventBus, Listener};
use crate::http::ConsoleApi;
use crate::storage::KeyValueStore;
use chrono::NaiveDate;
use shared::message::EventKind;
use std::sync::Arc;

#[derive(Debug)]
pub struct UserManagement {
    approvals: UserApprovals,
    report: Arc<UserActivityReport>,
    bus: EventBus,
    listener: Option<Listener>,
}

impl UserManagement {
    /// Load approval overrides from `store` and prepare a report for `today`
    pub async fn new(
        api: Arc<dyn ConsoleApi>,
        store: Arc<dyn KeyValueStore>,
        bus: EventBus,
        today: NaiveDate,
    ) -> Self {
        let overrides = Arc::new(ApprovalOverrides::load(store).await);
        Self {
            approvals: UserApprovals::new(Arc::clone(&api), Arc::clone(&overrides), bus.clone()),
            report: Arc::new(UserActivityReport::new(api, overrides, today)),
            bus,
            listener: None,
        }
    }

    /// Reload the report whenever a user is approved or rejected elsewhere
    pub fn subscribe(&mut self) {
        let report = Arc::clone(&self.report);
        self.listener = Some(self.bus.listen(EventKind::UserApprovalChanged, move |event| {
            let report = Arc::clone(&report);
            async move {
                tracing::debug!(%event, "Reloading user activity");
                if let Err(e) = report.reload().await {
                    tracing::warn!("Could not reload user activity: {e}");
                }
            }
        }));
    }

    pub fn is_subscribed(&self) -> bool {
        self.listener.is_some()
    }

    pub fn approvals(&self) -> &UserApprovals {
        &self.approvals
    }

    pub fn report(&self) -> &UserActivityReport {
        &self.report
    }

    /// Approve and return the reloaded report
    pub async fn approve(&self, user_id: &str) -> ClientResult<Vec<ActivityRow>> {
        self.approvals.approve(user_id).await?;
        self.report.reload().await
    }

    pub async fn reject(&self, user_id: &str) -> ClientResult<Vec<ActivityRow>> {
        self.approvals.reject(user_id).await?;
        self.report.reload().await
    }
}
