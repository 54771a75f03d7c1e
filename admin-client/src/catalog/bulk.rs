//! Bulk action dispatcher
//!
//! Dialog chain `Idle → Confirming(action) → Dispatching(action) → Idle`.
//! Confirming is reachable only from `Idle` with a non-empty selection;
//! dispatching always returns to `Idle` and clears the selection, whatever
//! the individual calls did. Each selected id gets its own concurrent call.

use super::{CatalogContext, CatalogStore};
use crate::notice::Notice;
use crate::{ClientError, ClientResult};
use futures::future::join_all;
use shared::models::ProductId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    Delete,
    Disable,
    Enable,
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkAction::Delete => write!(f, "delete"),
            BulkAction::Disable => write!(f, "disable"),
            BulkAction::Enable => write!(f, "enable"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkDialog {
    #[default]
    Idle,
    Confirming(BulkAction),
    Dispatching(BulkAction),
}

/// Per-id outcome of a dispatch
///
/// Partial failure is reported here rather than as an error: the batch
/// always completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub action: BulkAction,
    pub succeeded: Vec<ProductId>,
    pub failed: Vec<ProductId>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct BulkDispatcher {
    ctx: CatalogContext,
    store: CatalogStore,
}

impl BulkDispatcher {
    pub(crate) fn new(ctx: CatalogContext, store: CatalogStore) -> Self {
        Self { ctx, store }
    }

    pub fn dialog(&self) -> BulkDialog {
        self.ctx.state().bulk
    }

    /// Ask for confirmation of `action` on the current selection
    pub fn request(&self, action: BulkAction) -> ClientResult<()> {
        let mut state = self.ctx.state();
        if state.bulk != BulkDialog::Idle {
            return Err(ClientError::validation("A bulk action is already open"));
        }
        if state.selection.is_empty() {
            return Err(ClientError::validation("Select at least one product"));
        }
        state.bulk = BulkDialog::Confirming(action);
        Ok(())
    }

    /// Close the confirmation without dispatching
    pub fn dismiss(&self) {
        let mut state = self.ctx.state();
        if matches!(state.bulk, BulkDialog::Confirming(_)) {
            state.bulk = BulkDialog::Idle;
        }
    }

    /// Dispatch the confirmed action
    pub async fn confirm(&self) -> ClientResult<BatchReport> {
        let (action, ids) = {
            let mut state = self.ctx.state();
            let BulkDialog::Confirming(action) = state.bulk else {
                return Err(ClientError::validation("Nothing to confirm"));
            };
            state.bulk = BulkDialog::Dispatching(action);
            let ids: Vec<ProductId> = state
                .selection
                .iter()
                .filter(|id| id.is_numeric())
                .cloned()
                .collect();
            (action, ids)
        };

        tracing::info!(%action, count = ids.len(), "Dispatching bulk action");
        let calls = ids.iter().map(|id| async move {
            let result = match action {
                BulkAction::Delete => self.ctx.api.delete_product(id).await,
                BulkAction::Disable => self.ctx.api.set_disabled(id, true).await,
                BulkAction::Enable => self.ctx.api.set_disabled(id, false).await,
            };
            (id, result)
        });

        let mut report = BatchReport {
            action,
            succeeded: Vec::new(),
            failed: Vec::new(),
        };
        for (id, result) in join_all(calls).await {
            match result {
                Ok(()) => report.succeeded.push(id.clone()),
                Err(e) => {
                    tracing::error!(product_id = %id, %action, "Bulk action failed: {e}");
                    report.failed.push(id.clone());
                }
            }
        }

        {
            let mut state = self.ctx.state();
            match action {
                BulkAction::Disable | BulkAction::Enable => {
                    let disabled = action == BulkAction::Disable;
                    for id in &report.succeeded {
                        state.replace_everywhere(id, |row| {
                            let mut row = row.clone();
                            row.is_disabled = disabled;
                            row
                        });
                    }
                }
                BulkAction::Delete => {
                    for id in &report.succeeded {
                        state.working.retain(|p| &p.id != id);
                    }
                }
            }
            state.selection.clear();
            state.bulk = BulkDialog::Idle;
            state.notice = Some(if report.is_complete() {
                Notice::success(format!("{} product(s): {action} done", report.total()))
            } else {
                Notice::info(format!(
                    "{action}: {} of {} failed",
                    report.failed.len(),
                    report.total()
                ))
            });
        }

        if action == BulkAction::Delete
            && let Err(e) = self.store.refresh().await
        {
            tracing::error!("Catalog refresh after bulk delete failed: {e}");
        }

        Ok(report)
    }
}
