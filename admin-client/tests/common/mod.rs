//! In-memory backend and translator shared by the integration tests

#![allow(dead_code)]

use admin_client::http::{ConsoleApi, ImageFile};
use admin_client::translate::Translator;
use admin_client::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use shared::models::{
    AckResponse, ApprovalStatus, BannerText, Category, ImageId, Language, LocalizedText,
    PendingUser, PriceHistoryRow, ProductCreate, ProductDetailsUpdate, ProductId, ProductRow,
    User, UserSession, UserSummary,
};
use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

pub fn config() -> ClientConfig {
    ClientConfig::new("http://backend.test").with_translation_debounce(Duration::from_millis(800))
}

pub fn row(id: &str, name: &str, price: i64) -> ProductRow {
    ProductRow {
        id: Some(ProductId::from(id)),
        category: Some("Nuts".into()),
        name: Some(LocalizedText::new(name)),
        description: Some(LocalizedText::default()),
        price: Some(Decimal::from(price)),
        image_ids: Some(Vec::new()),
        disabled: Some(json!(false)),
        ..Default::default()
    }
}

/// Backend double: keeps products in memory, records every call as
/// `"<method>:<arg>"` and fails the calls registered with [`fail_on`].
///
/// [`fail_on`]: FakeBackend::fail_on
#[derive(Default)]
pub struct FakeBackend {
    products: Mutex<Vec<ProductRow>>,
    categories: Mutex<Vec<Category>>,
    pub users: Mutex<Vec<User>>,
    pub pending: Mutex<Vec<PendingUser>>,
    pub summaries: Mutex<Vec<UserSummary>>,
    pub sessions: Mutex<Vec<UserSession>>,
    pub banners: Mutex<Vec<BannerText>>,
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashSet<String>>,
    next_id: AtomicI64,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI64::new(100),
            ..Default::default()
        }
    }

    pub fn with_products(rows: Vec<ProductRow>) -> Self {
        let backend = Self::new();
        *backend.products.lock().unwrap() = rows;
        backend
    }

    pub fn set_categories(&self, names: &[&str]) {
        *self.categories.lock().unwrap() = names
            .iter()
            .map(|name| Category {
                id: None,
                name: name.to_string(),
            })
            .collect();
    }

    pub fn set_images(&self, id: &str, image_ids: &[&str]) {
        let mut products = self.products.lock().unwrap();
        if let Some(row) = products
            .iter_mut()
            .find(|r| r.id.as_ref().is_some_and(|p| p.as_str() == id))
        {
            row.image_ids = Some(image_ids.iter().map(|i| ImageId::from(*i)).collect());
        }
    }

    /// Make the call recorded as `key` fail with a 500
    pub fn fail_on(&self, key: &str) {
        self.failures.lock().unwrap().insert(key.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls whose method name is `method`
    pub fn count(&self, method: &str) -> usize {
        let prefix = format!("{method}:");
        self.calls()
            .iter()
            .filter(|c| c.starts_with(&prefix) || c.as_str() == method)
            .count()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    /// Mutating calls only; reads are ignored
    pub fn writes(&self) -> Vec<String> {
        const READS: [&str; 8] = [
            "list_products",
            "price_history",
            "list_images",
            "list_users",
            "pending_users",
            "user_summary",
            "user_sessions",
            "list_categories",
        ];
        self.calls()
            .into_iter()
            .filter(|c| !READS.iter().any(|r| c.starts_with(r)))
            .collect()
    }

    fn record(&self, key: String) -> ClientResult<()> {
        self.calls.lock().unwrap().push(key.clone());
        if self.failures.lock().unwrap().contains(&key) {
            return Err(ClientError::Status {
                status: 500,
                message: String::new(),
            });
        }
        Ok(())
    }

    fn with_row<T>(&self, id: &ProductId, f: impl FnOnce(&mut ProductRow) -> T) -> ClientResult<T> {
        let mut products = self.products.lock().unwrap();
        products
            .iter_mut()
            .find(|r| r.id.as_ref() == Some(id))
            .map(f)
            .ok_or(ClientError::Status {
                status: 404,
                message: "Product not found".into(),
            })
    }
}

#[async_trait]
impl ConsoleApi for FakeBackend {
    async fn list_products(&self) -> ClientResult<Vec<ProductRow>> {
        self.record("list_products".into())?;
        Ok(self.products.lock().unwrap().clone())
    }

    async fn create_product(&self, product: &ProductCreate) -> ClientResult<ProductRow> {
        self.record(format!("create_product:{}", product.name.en))?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let created = ProductRow {
            id: Some(ProductId::from(id)),
            category: Some(product.category.clone()),
            name: Some(product.name.clone()),
            description: Some(product.description.clone()),
            // the backend stores what the float payload parses to
            price: serde_json::to_value(product)
                .ok()
                .and_then(|v| v["price"].as_f64())
                .and_then(|f| Decimal::try_from(f).ok()),
            image_ids: Some(Vec::new()),
            ..Default::default()
        };
        self.products.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn update_product(&self, id: &ProductId, update: &ProductDetailsUpdate) -> ClientResult<()> {
        self.record(format!("update_product:{id}"))?;
        let name: LocalizedText = serde_json::from_str(&update.name_json)?;
        self.with_row(id, |row| {
            row.category = Some(update.category.clone());
            row.name = Some(name);
        })
    }

    async fn delete_product(&self, id: &ProductId) -> ClientResult<()> {
        self.record(format!("delete_product:{id}"))?;
        self.products
            .lock()
            .unwrap()
            .retain(|r| r.id.as_ref() != Some(id));
        Ok(())
    }

    async fn update_price(&self, id: &ProductId, price: Decimal) -> ClientResult<()> {
        self.record(format!("update_price:{id}"))?;
        self.with_row(id, |row| row.price = Some(price))
    }

    async fn price_history(&self, id: &ProductId) -> ClientResult<Vec<PriceHistoryRow>> {
        self.record(format!("price_history:{id}"))?;
        Ok(Vec::new())
    }

    async fn set_disabled(&self, id: &ProductId, disabled: bool) -> ClientResult<()> {
        self.record(format!("set_disabled:{id}"))?;
        self.with_row(id, |row| row.disabled = Some(json!(disabled)))
    }

    async fn list_images(&self, id: &ProductId) -> ClientResult<Vec<ImageId>> {
        self.record(format!("list_images:{id}"))?;
        self.with_row(id, |row| row.image_ids.clone().unwrap_or_default())
    }

    async fn upload_image(&self, id: &ProductId, file: &ImageFile) -> ClientResult<ImageId> {
        self.record(format!("upload_image:{}", file.name))?;
        let image_id = ImageId::from(self.next_id.fetch_add(1, Ordering::SeqCst) + 1000);
        let added = image_id.clone();
        self.with_row(id, move |row| {
            row.image_ids.get_or_insert_with(Vec::new).push(added);
        })?;
        Ok(image_id)
    }

    async fn delete_image(&self, image_id: &ImageId) -> ClientResult<()> {
        self.record(format!("delete_image:{image_id}"))?;
        for row in self.products.lock().unwrap().iter_mut() {
            if let Some(ids) = row.image_ids.as_mut() {
                ids.retain(|i| i != image_id);
            }
        }
        Ok(())
    }

    fn image_url(&self, image_id: &ImageId) -> String {
        format!("http://backend.test/api/images/{image_id}")
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.record("list_users".into())?;
        Ok(self.users.lock().unwrap().clone())
    }

    async fn pending_users(&self) -> ClientResult<Vec<PendingUser>> {
        self.record("pending_users".into())?;
        Ok(self.pending.lock().unwrap().clone())
    }

    async fn set_approval(&self, id: &str, status: ApprovalStatus) -> ClientResult<()> {
        self.record(format!("set_approval:{id}:{}", status.action()))?;
        self.pending
            .lock()
            .unwrap()
            .retain(|p| p.id.as_ref().is_none_or(|p| p.as_str() != id));
        Ok(())
    }

    async fn user_summary(&self) -> ClientResult<Vec<UserSummary>> {
        self.record("user_summary".into())?;
        Ok(self.summaries.lock().unwrap().clone())
    }

    async fn user_sessions(&self) -> ClientResult<Vec<UserSession>> {
        self.record("user_sessions".into())?;
        Ok(self.sessions.lock().unwrap().clone())
    }

    async fn post_banner(&self, banner: &BannerText) -> ClientResult<AckResponse> {
        self.record("post_banner".into())?;
        self.banners.lock().unwrap().push(banner.clone());
        Ok(AckResponse {
            success: Some(true),
            ..Default::default()
        })
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        self.record("list_categories".into())?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn create_category(&self, name: &str) -> ClientResult<AckResponse> {
        self.record(format!("create_category:{name}"))?;
        self.categories.lock().unwrap().push(Category {
            id: None,
            name: name.to_string(),
        });
        Ok(AckResponse {
            name: Some(name.to_string()),
            ..Default::default()
        })
    }
}

/// Translator double answering `"<text> [<lang>]"`
#[derive(Default)]
pub struct EchoTranslator {
    calls: Mutex<Vec<(String, Language)>>,
}

impl EchoTranslator {
    pub fn calls(&self) -> Vec<(String, Language)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for EchoTranslator {
    async fn translate(&self, text: &str, target: Language) -> ClientResult<String> {
        self.calls.lock().unwrap().push((text.to_string(), target));
        Ok(format!("{text} [{}]", target.code()))
    }
}
