//! Catalog editor page
//!
//! Owns the shared catalog context and the components built on it, plus the
//! single-product operations of the add/edit/delete dialogs.

use super::{
    BulkDispatcher, CatalogContext, CatalogSnapshot, CatalogStore, EditSession, ImageManager,
    ProductDraft, ProductForm,
};
use crate::events::{EventBus, Listener};
use crate::http::ConsoleApi;
use crate::notice::Notice;
use crate::translate::Translator;
use crate::{ClientConfig, ClientError, ClientResult};
use futures::future::join_all;
use shared::message::EventKind;
use shared::models::{Product, ProductCreate, ProductDetailsUpdate, ProductId};
use std::sync::Arc;
use std::time::Duration;

pub struct CatalogEditor {
    ctx: CatalogContext,
    store: CatalogStore,
    session: EditSession,
    images: ImageManager,
    bulk: BulkDispatcher,
    translator: Arc<dyn Translator>,
    debounce: Duration,
    listener: Option<Listener>,
}

impl CatalogEditor {
    pub fn new(api: Arc<dyn ConsoleApi>, translator: Arc<dyn Translator>, config: &ClientConfig) -> Self {
        let ctx = CatalogContext::new(api, config.price_history_points);
        let store = CatalogStore::new(ctx.clone());
        Self {
            session: EditSession::new(ctx.clone(), store.clone()),
            images: ImageManager::new(ctx.clone(), store.clone()),
            bulk: BulkDispatcher::new(ctx.clone(), store.clone()),
            ctx,
            store,
            translator,
            debounce: config.translation_debounce,
            listener: None,
        }
    }

    /// Re-fetch categories whenever one is created elsewhere
    pub fn subscribe(&mut self, bus: &EventBus) {
        let store = self.store.clone();
        self.listener = Some(bus.listen(EventKind::CategoryCreated, move |event| {
            let store = store.clone();
            async move {
                tracing::debug!(%event, "Refreshing categories");
                store.refresh_categories().await;
            }
        }));
    }

    /// Initial load: products and categories
    pub async fn mount(&self) -> ClientResult<usize> {
        let (products, _) = tokio::join!(self.store.refresh(), self.store.refresh_categories());
        products
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn images(&self) -> &ImageManager {
        &self.images
    }

    pub fn bulk(&self) -> &BulkDispatcher {
        &self.bulk
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        self.ctx.snapshot()
    }

    pub fn take_notice(&self) -> Option<Notice> {
        self.ctx.take_notice()
    }

    /// Empty add-product form
    pub fn new_product_form(&self) -> ProductForm {
        ProductForm::new(Arc::clone(&self.translator), self.debounce)
    }

    /// Edit form prefilled from `product`
    pub fn edit_product_form(&self, product: &Product) -> ProductForm {
        ProductForm::for_product(product, Arc::clone(&self.translator), self.debounce)
    }

    /// Create a product, seed its price history, upload its images, re-fetch
    ///
    /// Returns the created id when the backend returned a numeric one.
    pub async fn add_product(&self, draft: &ProductDraft) -> ClientResult<Option<ProductId>> {
        let price = draft.validate().inspect_err(|e| self.ctx.notify(Notice::error(e)))?;

        let payload = ProductCreate {
            category: draft.category.trim().to_string(),
            name: draft.name.trimmed(),
            description: draft.description.trimmed(),
            price,
        };
        let created = match self.ctx.api.create_product(&payload).await {
            Ok(row) => row,
            Err(e) => {
                tracing::error!("Failed to add product: {e}");
                self.ctx.notify(Notice::error(&e));
                return Err(e);
            }
        };

        let id = created.id.filter(ProductId::is_numeric);
        if let Some(id) = &id {
            // initial price point; the product exists either way
            if let Err(e) = self.ctx.api.update_price(id, price).await {
                tracing::warn!(product_id = %id, "Failed to seed price history: {e}");
            }

            let uploads = draft.images.iter().map(|file| async move {
                (file, self.ctx.api.upload_image(id, file).await)
            });
            for (file, result) in join_all(uploads).await {
                if let Err(e) = result {
                    tracing::error!(product_id = %id, file = %file.name, "Image upload failed: {e}");
                }
            }
            tracing::info!(product_id = %id, "Product created");
        } else {
            tracing::warn!("Created product has no numeric id; skipping price and images");
        }

        self.store.refresh().await?;
        self.ctx.notify(Notice::success("Product added"));
        Ok(id)
    }

    /// Save category, name and description of an existing product
    pub async fn update_details(&self, id: &ProductId, draft: &ProductDraft) -> ClientResult<()> {
        if !id.is_numeric() {
            return Err(ClientError::NonNumericId(id.to_string()));
        }
        draft
            .validate_details()
            .inspect_err(|e| self.ctx.notify(Notice::error(e)))?;

        let update = ProductDetailsUpdate::new(
            draft.category.trim(),
            &draft.name.trimmed(),
            &draft.description.trimmed(),
        )?;
        if let Err(e) = self.ctx.api.update_product(id, &update).await {
            tracing::error!(product_id = %id, "Failed to update product: {e}");
            self.ctx.notify(Notice::error(&e));
            return Err(e);
        }

        self.store.refresh().await?;
        self.ctx.notify(Notice::success("Product updated"));
        Ok(())
    }

    /// Delete one product and drop it from both copies
    pub async fn delete_product(&self, id: &ProductId) -> ClientResult<()> {
        if !id.is_numeric() {
            return Err(ClientError::NonNumericId(id.to_string()));
        }
        if let Err(e) = self.ctx.api.delete_product(id).await {
            tracing::error!(product_id = %id, "Failed to delete product: {e}");
            self.ctx.notify(Notice::error(&e));
            return Err(e);
        }
        self.ctx.state().remove_everywhere(id);
        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}

impl std::fmt::Debug for CatalogEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEditor")
            .field("ctx", &self.ctx)
            .field("subscribed", &self.listener.is_some())
            .finish_non_exhaustive()
    }
}
