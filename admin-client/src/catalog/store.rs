//! Catalog store: the client-side copy of `GET /api/products`
//!
//! Refreshed on mount and after every successful mutation. There is no
//! incremental patching; a refresh replaces the whole list.

use super::CatalogContext;
use crate::ClientResult;
use crate::notice::Notice;
use chrono::{Days, NaiveDate};
use futures::future::join_all;
use rust_decimal::Decimal;
use shared::models::{PriceHistoryPoint, Product, ProductId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct CatalogStore {
    ctx: CatalogContext,
}

impl CatalogStore {
    pub(crate) fn new(ctx: CatalogContext) -> Self {
        Self { ctx }
    }

    /// Re-fetch the product list
    ///
    /// Rows with non-numeric ids are dropped. Outside edit mode the working
    /// copy is replaced too. On failure the table empties, except in edit
    /// mode: the last-fetched copy stays so unsaved edits still diff against
    /// it.
    pub async fn refresh(&self) -> ClientResult<usize> {
        match self.ctx.api.list_products().await {
            Ok(rows) => {
                let total = rows.len();
                let products: Vec<Product> = rows
                    .into_iter()
                    .filter_map(|row| row.normalize())
                    .filter(Product::is_mutable)
                    .collect();
                if products.len() < total {
                    tracing::debug!(
                        dropped = total - products.len(),
                        "Skipped product rows without a numeric id"
                    );
                }

                let count = products.len();
                let mut state = self.ctx.state();
                state.store = products;
                if !state.editing {
                    state.working = state.store.clone();
                }
                tracing::info!(count, "Catalog refreshed");
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Failed to fetch products: {e}");
                let mut state = self.ctx.state();
                if !state.editing {
                    state.store.clear();
                    state.working.clear();
                }
                state.notice = Some(Notice::error(&e));
                Err(e)
            }
        }
    }

    /// Re-fetch categories; failure leaves an empty list
    pub async fn refresh_categories(&self) -> usize {
        let categories = match self.ctx.api.list_categories().await {
            Ok(categories) => categories,
            Err(e) => {
                tracing::error!("Failed to fetch categories: {e}");
                Vec::new()
            }
        };
        let count = categories.len();
        self.ctx.state().categories = categories;
        count
    }

    /// Rows currently shown
    pub fn products(&self) -> Vec<Product> {
        self.ctx.state().view().to_vec()
    }

    pub fn product(&self, id: &ProductId) -> Option<Product> {
        self.ctx.state().view().iter().find(|p| &p.id == id).cloned()
    }

    /// Price history of every shown product, fetched concurrently
    ///
    /// Products whose history cannot be fetched are absent from the map.
    /// Only the most recent points are kept.
    pub async fn price_histories(&self) -> HashMap<ProductId, Vec<PriceHistoryPoint>> {
        let ids: Vec<ProductId> = self
            .ctx
            .state()
            .view()
            .iter()
            .filter(|p| p.is_mutable())
            .map(|p| p.id.clone())
            .collect();

        let keep = self.ctx.history_points;
        let fetches = ids.into_iter().map(|id| async move {
            match self.ctx.api.price_history(&id).await {
                Ok(rows) => {
                    let skip = rows.len().saturating_sub(keep);
                    let points: Vec<PriceHistoryPoint> = rows
                        .into_iter()
                        .skip(skip)
                        .map(PriceHistoryPoint::from)
                        .collect();
                    Some((id, points))
                }
                Err(e) => {
                    tracing::debug!(product_id = %id, "Price history unavailable: {e}");
                    None
                }
            }
        });

        join_all(fetches).await.into_iter().flatten().collect()
    }
}

/// One day of a sparkline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparkPoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

/// Continuous daily series over the `days` days ending `today`
///
/// Days without a change carry the previous price forward, starting from the
/// oldest known point. Without any history the line is flat at `current`;
/// `today` falls back to `current` when nothing was recorded for it.
pub fn sparkline(
    history: &[PriceHistoryPoint],
    current: Decimal,
    days: usize,
    today: NaiveDate,
) -> Vec<SparkPoint> {
    let Some(start) = days
        .checked_sub(1)
        .and_then(|back| today.checked_sub_days(Days::new(back as u64)))
    else {
        return Vec::new();
    };

    let by_day: HashMap<NaiveDate, Decimal> = history
        .iter()
        .filter_map(|point| point.date.map(|date| (date, point.price)))
        .collect();

    let mut last = history.first().map(|p| p.price).unwrap_or(current);
    start
        .iter_days()
        .take(days)
        .map(|date| {
            if let Some(price) = by_day.get(&date) {
                last = *price;
            } else if date == today {
                last = current;
            }
            SparkPoint { date, price: last }
        })
        .collect()
}
