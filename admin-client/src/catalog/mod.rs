//! Catalog editor
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────── CatalogEditor ─────────────────────────────┐
//! │                                                                        │
//! │  CatalogStore   EditSession   ImageManager   BulkDispatcher   forms    │
//! │       │              │              │               │            │     │
//! │       └──────────────┴──────┬───────┴───────────────┴────────────┘     │
//! │                             ▼                                          │
//! │                       CatalogContext                                   │
//! │          Arc<dyn ConsoleApi> + Arc<Mutex<CatalogState>>                │
//! └────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `CatalogState` holds the last-fetched store, the working copy and the
//! selection. The lock is never held across an await: every component reads
//! what it needs, awaits the backend, then re-locks and replaces whole rows
//! keyed by id. Two callbacks resolving out of order for the same field of
//! the same row therefore race, and the last one to resolve wins.

mod bulk;
mod editor;
mod images;
mod product_form;
mod session;
mod store;
mod translation;

pub use bulk::{BatchReport, BulkAction, BulkDialog, BulkDispatcher};
pub use editor::CatalogEditor;
pub use images::{ImageDialog, ImageManager, UploadReport};
pub use product_form::{ProductDraft, ProductField, ProductForm};
pub use session::{EditSession, SaveOutcome};
pub use store::{CatalogStore, SparkPoint, sparkline};
pub use translation::{TranslationAssist, TranslationStatus};

use crate::http::ConsoleApi;
use crate::notice::Notice;
use shared::models::{Category, Product, ProductId};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Mutable catalog state shared by the editor components
#[derive(Debug, Default)]
pub(crate) struct CatalogState {
    /// Last-fetched copy (numeric ids only)
    pub store: Vec<Product>,
    /// Working copy; equals `store` outside edit mode
    pub working: Vec<Product>,
    pub editing: bool,
    pub selection: BTreeSet<ProductId>,
    pub categories: Vec<Category>,
    pub bulk: BulkDialog,
    pub notice: Option<Notice>,
}

impl CatalogState {
    /// Rows the table shows
    pub fn view(&self) -> &[Product] {
        if self.editing { &self.working } else { &self.store }
    }

    pub fn working_row(&self, id: &ProductId) -> Option<&Product> {
        self.working.iter().find(|p| &p.id == id)
    }

    /// Replace the working-copy row `id` with `f(row)`. Outside edit mode the
    /// store row is replaced too so both copies stay equal.
    pub fn replace_row(&mut self, id: &ProductId, f: impl Fn(&Product) -> Product) -> bool {
        let replaced = replace_in(&mut self.working, id, &f);
        if !self.editing {
            replace_in(&mut self.store, id, &f);
        }
        replaced
    }

    /// Replace the row `id` in both copies
    pub fn replace_everywhere(&mut self, id: &ProductId, f: impl Fn(&Product) -> Product) {
        replace_in(&mut self.store, id, &f);
        replace_in(&mut self.working, id, &f);
    }

    pub fn remove_everywhere(&mut self, id: &ProductId) {
        self.store.retain(|p| &p.id != id);
        self.working.retain(|p| &p.id != id);
        self.selection.remove(id);
    }

    /// Leave edit mode: working copy becomes a clone of the store
    pub fn reset_working(&mut self) {
        self.editing = false;
        self.working = self.store.clone();
        self.selection.clear();
    }
}

fn replace_in(rows: &mut [Product], id: &ProductId, f: &impl Fn(&Product) -> Product) -> bool {
    match rows.iter_mut().find(|p| &p.id == id) {
        Some(row) => {
            *row = f(row);
            true
        }
        None => false,
    }
}

/// Handle shared by every catalog component
#[derive(Clone)]
pub struct CatalogContext {
    pub(crate) api: Arc<dyn ConsoleApi>,
    pub(crate) state: Arc<Mutex<CatalogState>>,
    pub(crate) history_points: usize,
}

impl CatalogContext {
    pub fn new(api: Arc<dyn ConsoleApi>, history_points: usize) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(CatalogState::default())),
            history_points,
        }
    }

    pub(crate) fn state(&self) -> MutexGuard<'_, CatalogState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn notify(&self, notice: Notice) {
        self.state().notice = Some(notice);
    }

    /// Render snapshot
    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.state();
        CatalogSnapshot {
            products: state.view().to_vec(),
            editing: state.editing,
            selected: state.selection.iter().cloned().collect(),
            categories: state.categories.clone(),
            bulk: state.bulk,
            notice: state.notice.clone(),
        }
    }

    /// Take the pending notice, if any
    pub fn take_notice(&self) -> Option<Notice> {
        self.state().notice.take()
    }
}

impl std::fmt::Debug for CatalogContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogContext")
            .field("history_points", &self.history_points)
            .finish_non_exhaustive()
    }
}

/// What a UI renders for the catalog table
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    pub products: Vec<Product>,
    pub editing: bool,
    pub selected: Vec<ProductId>,
    pub categories: Vec<Category>,
    pub bulk: BulkDialog,
    pub notice: Option<Notice>,
}

impl CatalogSnapshot {
    pub fn product(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}
