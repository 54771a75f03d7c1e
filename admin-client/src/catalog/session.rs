//! Edit-session controller
//!
//! View/edit mode toggle, working-copy price edits, row selection and the
//! concurrent price save.
//!
//! # Save policy
//!
//! Only rows whose price differs from the store are written, one
//! `PUT /api/products/{id}/price` each, all in flight at once. Every call is
//! allowed to settle. If any failed, the save reports [`ClientError::Batch`]
//! with the failed ids, the session stays in edit mode with the working copy
//! untouched, and no re-fetch happens; rows that did succeed are already
//! committed server-side. Only a fully successful save leaves edit mode and
//! re-fetches.
//!
//! Concurrent admins are last-write-wins on price; no version stamps are sent.

use super::{CatalogContext, CatalogStore};
use crate::notice::Notice;
use crate::{ClientError, ClientResult};
use futures::future::join_all;
use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::ProductId;
use std::str::FromStr;

/// Result of a successful save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Rows written to the backend
    pub updated: usize,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    ctx: CatalogContext,
    store: CatalogStore,
}

impl EditSession {
    pub(crate) fn new(ctx: CatalogContext, store: CatalogStore) -> Self {
        Self { ctx, store }
    }

    pub fn is_editing(&self) -> bool {
        self.ctx.state().editing
    }

    /// Clone the store into the working copy and clear the selection
    pub fn enter_edit(&self) {
        let mut state = self.ctx.state();
        state.working = state.store.clone();
        state.editing = true;
        state.selection.clear();
        tracing::debug!(rows = state.working.len(), "Entered edit mode");
    }

    /// Discard the working copy; no remote call
    pub fn cancel_edit(&self) {
        self.ctx.state().reset_working();
        tracing::debug!("Edit cancelled");
    }

    /// Set a working-copy price
    pub fn set_price(&self, id: &ProductId, price: Decimal) -> ClientResult<()> {
        if !id.is_numeric() {
            return Err(ClientError::NonNumericId(id.to_string()));
        }
        let mut state = self.ctx.state();
        if !state.editing {
            return Err(ClientError::validation("Not in edit mode"));
        }
        let replaced = state.replace_row(id, |row| {
            let mut row = row.clone();
            row.price = price;
            row
        });
        if !replaced {
            return Err(ClientError::invalid(
                ErrorCode::ProductNotFound,
                format!("Unknown product {id}"),
            ));
        }
        Ok(())
    }

    /// Set a working-copy price from user input
    pub fn set_price_text(&self, id: &ProductId, text: &str) -> ClientResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::invalid(ErrorCode::RequiredField, "Price is required"));
        }
        let price = Decimal::from_str(text).map_err(|_| {
            ClientError::invalid(ErrorCode::ProductInvalidPrice, format!("Invalid price `{text}`"))
        })?;
        self.set_price(id, price)
    }

    /// Flip the selection of one row; returns the new state
    pub fn toggle_selection(&self, id: &ProductId) -> ClientResult<bool> {
        let selected = !self.ctx.state().selection.contains(id);
        self.select(id, selected)?;
        Ok(selected)
    }

    pub fn select(&self, id: &ProductId, selected: bool) -> ClientResult<()> {
        if !id.is_numeric() {
            return Err(ClientError::NonNumericId(id.to_string()));
        }
        let mut state = self.ctx.state();
        if !state.editing {
            return Err(ClientError::validation("Selection requires edit mode"));
        }
        if selected {
            if state.working_row(id).is_none() {
                return Err(ClientError::invalid(
                ErrorCode::ProductNotFound,
                format!("Unknown product {id}"),
            ));
            }
            state.selection.insert(id.clone());
        } else {
            state.selection.remove(id);
        }
        Ok(())
    }

    /// Select every row of the working copy
    pub fn select_all(&self) -> ClientResult<()> {
        let mut state = self.ctx.state();
        if !state.editing {
            return Err(ClientError::validation("Selection requires edit mode"));
        }
        let ids: Vec<ProductId> = state.working.iter().map(|p| p.id.clone()).collect();
        state.selection.extend(ids);
        Ok(())
    }

    pub fn clear_selection(&self) {
        self.ctx.state().selection.clear();
    }

    pub fn selected_ids(&self) -> Vec<ProductId> {
        self.ctx.state().selection.iter().cloned().collect()
    }

    /// Rows whose working price differs from the store
    pub fn changed_prices(&self) -> Vec<(ProductId, Decimal)> {
        let state = self.ctx.state();
        state
            .working
            .iter()
            .filter(|row| row.is_mutable())
            .filter(|row| {
                state
                    .store
                    .iter()
                    .find(|stored| stored.id == row.id)
                    .is_some_and(|stored| stored.price != row.price)
            })
            .map(|row| (row.id.clone(), row.price))
            .collect()
    }

    /// Push changed prices concurrently
    pub async fn save(&self) -> ClientResult<SaveOutcome> {
        if !self.is_editing() {
            return Err(ClientError::validation("Not in edit mode"));
        }

        let changes = self.changed_prices();
        if changes.is_empty() {
            self.ctx.state().reset_working();
            tracing::info!("No price changes to save");
            return Ok(SaveOutcome { updated: 0 });
        }

        let total = changes.len();
        tracing::info!(total, "Saving price changes");
        let writes = changes.iter().map(|(id, price)| async move {
            let result = self.ctx.api.update_price(id, *price).await;
            (id, result)
        });

        let failed: Vec<String> = join_all(writes)
            .await
            .into_iter()
            .filter_map(|(id, result)| match result {
                Ok(()) => None,
                Err(e) => {
                    tracing::error!(product_id = %id, "Failed to update price: {e}");
                    Some(id.to_string())
                }
            })
            .collect();

        if !failed.is_empty() {
            let err = ClientError::Batch {
                action: "Save prices".into(),
                failed,
                total,
            };
            self.ctx.notify(Notice::error(&err));
            return Err(err);
        }

        self.ctx.state().reset_working();
        self.store.refresh().await?;
        self.ctx
            .notify(Notice::success(format!("Updated {total} price(s)")));
        Ok(SaveOutcome { updated: total })
    }
}
