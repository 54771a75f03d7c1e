//! Image manager
//!
//! Per-product image dialog with two modes:
//!
//! - **View**: fetches the attached ids on every open, read-only.
//! - **Edit**: files accumulate in a pending list until [`ImageManager::upload_pending`];
//!   deletes go to the backend immediately.
//!
//! Image ids that are not numbers are placeholders and only ever removed
//! locally. Closing the dialog always re-fetches the catalog.

use super::{CatalogContext, CatalogStore};
use crate::http::ImageFile;
use crate::notice::{Notice, NoticeLevel};
use crate::{ClientError, ClientResult};
use futures::future::join_all;
use shared::ErrorCode;
use shared::models::{ImageId, ProductId};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImageDialog {
    #[default]
    Closed,
    View {
        product_id: ProductId,
        image_ids: Vec<ImageId>,
    },
    Edit {
        product_id: ProductId,
        pending: Vec<ImageFile>,
    },
}

/// Outcome of [`ImageManager::upload_pending`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadReport {
    /// Returned ids, in pending-list order
    pub uploaded: Vec<ImageId>,
    /// Names of files that failed; they stay in the pending list
    pub failed: Vec<String>,
}

impl UploadReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ImageManager {
    ctx: CatalogContext,
    store: CatalogStore,
    dialog: Arc<Mutex<ImageDialog>>,
}

impl ImageManager {
    pub(crate) fn new(ctx: CatalogContext, store: CatalogStore) -> Self {
        Self {
            ctx,
            store,
            dialog: Arc::new(Mutex::new(ImageDialog::Closed)),
        }
    }

    fn dialog(&self) -> MutexGuard<'_, ImageDialog> {
        self.dialog
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn state(&self) -> ImageDialog {
        self.dialog().clone()
    }

    /// Open read-only, always fetching fresh ids
    pub async fn open_view(&self, product_id: &ProductId) -> Vec<ImageId> {
        *self.dialog() = ImageDialog::View {
            product_id: product_id.clone(),
            image_ids: Vec::new(),
        };
        if !product_id.is_numeric() {
            return Vec::new();
        }

        let image_ids = match self.ctx.api.list_images(product_id).await {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!(%product_id, "Failed to fetch images: {e}");
                Vec::new()
            }
        };

        let mut dialog = self.dialog();
        if let ImageDialog::View {
            product_id: open, ..
        } = &*dialog
            && open == product_id
        {
            *dialog = ImageDialog::View {
                product_id: product_id.clone(),
                image_ids: image_ids.clone(),
            };
        }
        image_ids
    }

    /// Open for editing with an empty pending list
    pub fn open_edit(&self, product_id: &ProductId) -> ClientResult<()> {
        if !product_id.is_numeric() {
            return Err(ClientError::NonNumericId(product_id.to_string()));
        }
        *self.dialog() = ImageDialog::Edit {
            product_id: product_id.clone(),
            pending: Vec::new(),
        };
        Ok(())
    }

    fn edit_target(&self) -> ClientResult<ProductId> {
        match &*self.dialog() {
            ImageDialog::Edit { product_id, .. } => Ok(product_id.clone()),
            _ => Err(ClientError::validation("Image dialog is not in edit mode")),
        }
    }

    /// Image ids of the product being edited, from the working copy
    pub fn image_ids(&self) -> Vec<ImageId> {
        let Ok(product_id) = self.edit_target() else {
            return Vec::new();
        };
        self.ctx
            .state()
            .working_row(&product_id)
            .map(|p| p.image_ids.clone())
            .unwrap_or_default()
    }

    pub fn add_pending(&self, files: impl IntoIterator<Item = ImageFile>) -> ClientResult<usize> {
        match &mut *self.dialog() {
            ImageDialog::Edit { pending, .. } => {
                pending.extend(files);
                Ok(pending.len())
            }
            _ => Err(ClientError::validation("Image dialog is not in edit mode")),
        }
    }

    pub fn remove_pending(&self, index: usize) -> Option<ImageFile> {
        match &mut *self.dialog() {
            ImageDialog::Edit { pending, .. } if index < pending.len() => {
                Some(pending.remove(index))
            }
            _ => None,
        }
    }

    pub fn clear_pending(&self) {
        if let ImageDialog::Edit { pending, .. } = &mut *self.dialog() {
            pending.clear();
        }
    }

    pub fn pending(&self) -> Vec<ImageFile> {
        match &*self.dialog() {
            ImageDialog::Edit { pending, .. } => pending.clone(),
            _ => Vec::new(),
        }
    }

    /// Delete the image at `index` right away
    ///
    /// Numeric ids are deleted remotely first and removed locally on success;
    /// placeholders are removed locally without a call.
    pub async fn delete_image(&self, index: usize) -> ClientResult<ImageId> {
        let product_id = self.edit_target()?;
        let image_id = self
            .ctx
            .state()
            .working_row(&product_id)
            .and_then(|p| p.image_ids.get(index).cloned())
            .ok_or_else(|| ClientError::validation(format!("No image at position {index}")))?;

        if image_id.is_numeric() {
            if let Err(e) = self.ctx.api.delete_image(&image_id).await {
                tracing::error!(%product_id, %image_id, "Failed to delete image: {e}");
                self.ctx.notify(Notice::failure(ErrorCode::ImageDeleteFailed, &e));
                return Err(e);
            }
            tracing::info!(%product_id, %image_id, "Image deleted");
        } else {
            tracing::debug!(%product_id, %image_id, "Removing placeholder image locally");
        }

        self.ctx.state().replace_row(&product_id, |row| {
            let mut row = row.clone();
            // the list may have changed while the delete was in flight
            let position = if row.image_ids.get(index) == Some(&image_id) {
                Some(index)
            } else {
                row.image_ids.iter().position(|id| id == &image_id)
            };
            if let Some(position) = position {
                row.image_ids.remove(position);
            }
            row
        });
        Ok(image_id)
    }

    /// Upload every pending file concurrently
    pub async fn upload_pending(&self) -> ClientResult<UploadReport> {
        let product_id = self.edit_target()?;
        let files = {
            let mut dialog = self.dialog();
            match &mut *dialog {
                ImageDialog::Edit { pending, .. } => std::mem::take(pending),
                _ => Vec::new(),
            }
        };
        if files.is_empty() {
            return Ok(UploadReport::default());
        }

        let uploads = files.iter().map(|file| {
            let product_id = &product_id;
            async move { self.ctx.api.upload_image(product_id, file).await }
        });
        let results = join_all(uploads).await;

        let mut report = UploadReport::default();
        let mut retry = Vec::new();
        for (file, result) in files.into_iter().zip(results) {
            match result {
                Ok(image_id) => report.uploaded.push(image_id),
                Err(e) => {
                    tracing::error!(%product_id, file = %file.name, "Image upload failed: {e}");
                    report.failed.push(file.name.clone());
                    retry.push(file);
                }
            }
        }

        if !report.uploaded.is_empty() {
            let uploaded = report.uploaded.clone();
            self.ctx.state().replace_row(&product_id, |row| {
                let mut row = row.clone();
                row.image_ids.extend(uploaded.iter().cloned());
                row
            });
        }
        if let ImageDialog::Edit { pending, .. } = &mut *self.dialog() {
            retry.append(pending);
            *pending = retry;
        }

        if report.is_complete() {
            self.ctx.notify(Notice::success(format!(
                "Uploaded {} image(s)",
                report.uploaded.len()
            )));
        } else {
            self.ctx.notify(Notice {
                level: NoticeLevel::Error,
                message: format!(
                    "Uploaded {}, {} failed",
                    report.uploaded.len(),
                    report.failed.len()
                ),
                code: Some(ErrorCode::ImageUploadFailed),
            });
        }
        Ok(report)
    }

    /// Close the dialog and re-fetch the catalog
    pub async fn close(&self) -> ClientResult<()> {
        *self.dialog() = ImageDialog::Closed;
        self.store.refresh().await.map(|_| ())
    }

    /// Display URL of an image
    pub fn image_url(&self, image_id: &ImageId) -> String {
        self.ctx.api.image_url(image_id)
    }
}
