//! Header bar actions
//!
//! Pending-approval list with approve/reject, banner text editor and quick
//! category creation. The pending list re-fetches whenever a
//! `UserApprovalChanged` event arrives; a created category is announced as
//! `CategoryCreated`.
//!
//! Decisions go through [`UserApprovals`]. Share the user view's instance with
//! [`HeaderActions::with_approvals`] so both write one override map.

use crate::catalog::{TranslationAssist, TranslationStatus};
use crate::events::{EventBus, Listener};
use crate::http::ConsoleApi;
use crate::translate::Translator;
use crate::users::{ApprovalOverrides, UserApprovals};
use crate::{ClientError, ClientResult};
use shared::message::EventKind;
use shared::{ConsoleEvent, ErrorCode};
use shared::models::{BannerText, Language, LocalizedText, PendingUser};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type PendingList = Arc<Mutex<Vec<PendingUser>>>;

/// The banner has a single translatable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BannerField;

pub struct HeaderActions {
    api: Arc<dyn ConsoleApi>,
    bus: EventBus,
    approvals: UserApprovals,
    pending: PendingList,
    banner: TranslationAssist<BannerField>,
    listener: Option<Listener>,
}

impl HeaderActions {
    pub fn new(
        api: Arc<dyn ConsoleApi>,
        translator: Arc<dyn Translator>,
        debounce: Duration,
        bus: EventBus,
    ) -> Self {
        let approvals = UserApprovals::new(
            Arc::clone(&api),
            Arc::new(ApprovalOverrides::in_memory()),
            bus.clone(),
        );
        Self {
            api,
            bus,
            approvals,
            pending: PendingList::default(),
            banner: TranslationAssist::new(translator, debounce),
            listener: None,
        }
    }

    /// Decide through `approvals` instead of a private instance
    pub fn with_approvals(mut self, approvals: UserApprovals) -> Self {
        self.approvals = approvals;
        self
    }

    /// Keep the pending list current on approval changes
    pub fn subscribe(&mut self) {
        let api = Arc::clone(&self.api);
        let pending = Arc::clone(&self.pending);
        self.listener = Some(self.bus.listen(EventKind::UserApprovalChanged, move |event| {
            let api = Arc::clone(&api);
            let pending = Arc::clone(&pending);
            async move {
                tracing::debug!(%event, "Refreshing pending approvals");
                if let Err(e) = fetch_pending(api.as_ref(), &pending).await {
                    tracing::warn!("Could not refresh pending approvals: {e}");
                }
            }
        }));
    }

    pub fn pending_count(&self) -> usize {
        lock(&self.pending).len()
    }

    pub fn pending_users(&self) -> Vec<PendingUser> {
        lock(&self.pending).clone()
    }

    pub async fn refresh_pending(&self) -> ClientResult<usize> {
        fetch_pending(self.api.as_ref(), &self.pending).await
    }

    /// Approve a user from the pending list
    pub async fn approve(&self, user_id: &str) -> ClientResult<()> {
        self.approvals.approve(user_id).await?;
        self.after_decision().await;
        Ok(())
    }

    /// Reject a user from the pending list
    pub async fn reject(&self, user_id: &str) -> ClientResult<()> {
        self.approvals.reject(user_id).await?;
        self.after_decision().await;
        Ok(())
    }

    async fn after_decision(&self) {
        if let Err(e) = self.refresh_pending().await {
            tracing::warn!("Could not refresh pending approvals: {e}");
        }
    }

    pub fn banner_text(&self) -> LocalizedText {
        self.banner.text(BannerField)
    }

    pub fn banner_status(&self) -> TranslationStatus {
        self.banner.status()
    }

    pub fn on_banner_text_change(&self, value: impl Into<String>) {
        self.banner.on_primary_text_change(BannerField, value);
    }

    pub fn set_banner_translation(&self, lang: Language, value: impl Into<String>) {
        self.banner.set_translation(BannerField, lang, value);
    }

    /// Wait for a scheduled banner translation to finish
    pub async fn flush_translation(&self) {
        self.banner.flush().await;
    }

    /// Publish the banner as active; the editor is cleared on success
    pub async fn submit_banner(&self) -> ClientResult<()> {
        let text = self.banner_text();
        if text.is_blank() {
            return Err(ClientError::required(ErrorCode::BannerTextRequired));
        }

        let banner = BannerText {
            text: text.trimmed(),
            is_active: true,
        };
        let ack = self.api.post_banner(&banner).await.inspect_err(|e| {
            tracing::error!("Failed to update banner: {e}");
        })?;
        if !ack.is_success() {
            let reason = ack.reason().unwrap_or("Failed to update banner").to_string();
            tracing::error!("Banner rejected: {reason}");
            return Err(ClientError::InvalidResponse(reason));
        }

        self.banner.reset();
        tracing::info!("Banner text updated");
        Ok(())
    }

    /// Create a category and announce it
    pub async fn create_category(&self, name: &str) -> ClientResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::required(ErrorCode::CategoryNameRequired));
        }

        let ack = self.api.create_category(name).await.inspect_err(|e| {
            tracing::error!(category = name, "Failed to create category: {e}");
        })?;
        if !ack.is_created() {
            let reason = ack
                .reason()
                .unwrap_or("Failed to create category")
                .to_string();
            return Err(ClientError::InvalidResponse(reason));
        }

        tracing::info!(category = name, "Category created");
        self.bus.publish(ConsoleEvent::CategoryCreated {
            name: name.to_string(),
        });
        Ok(())
    }
}

async fn fetch_pending(api: &dyn ConsoleApi, pending: &Mutex<Vec<PendingUser>>) -> ClientResult<usize> {
    let users = api.pending_users().await?;
    let count = users.len();
    *lock(pending) = users;
    Ok(count)
}

fn lock(pending: &Mutex<Vec<PendingUser>>) -> std::sync::MutexGuard<'_, Vec<PendingUser>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl std::fmt::Debug for HeaderActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderActions")
            .field("pending", &self.pending_count())
            .field("subscribed", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
