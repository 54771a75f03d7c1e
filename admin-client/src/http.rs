//! REST client for the console backend
//!
//! [`ConsoleApi`] is the seam the controllers depend on; [`NetworkHttpClient`]
//! is the reqwest implementation. Tests substitute an in-memory backend.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::models::{
    AckResponse, ApprovalStatus, AvailabilityUpdate, BannerText, Category, CategoryCreate,
    CategoryListResponse, ImageId, ImageUploadResponse, PendingUser, PriceHistoryRow, PriceUpdate,
    ProductCreate, ProductDetailsUpdate, ProductId, ProductRow, User, UserSession,
    UserSessionsResponse, UserSummary, UserSummaryResponse,
};
use std::time::Duration;

/// A file chosen for upload but not yet sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Content type guessed from the file extension
    pub fn mime(&self) -> String {
        mime_guess::from_path(&self.name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }

    pub async fn read(path: impl AsRef<std::path::Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self { name, bytes })
    }
}

/// Backend operations used by the console
///
/// Every method maps to exactly one request. Id-taking methods do not check
/// numeric-ness; callers filter non-numeric ids before calling.
#[async_trait]
pub trait ConsoleApi: Send + Sync {
    // ========== Products ==========

    /// `GET /api/products`
    async fn list_products(&self) -> ClientResult<Vec<ProductRow>>;

    /// `POST /api/products`; returns the created row
    async fn create_product(&self, product: &ProductCreate) -> ClientResult<ProductRow>;

    /// `PUT /api/products/{id}`
    async fn update_product(&self, id: &ProductId, update: &ProductDetailsUpdate)
    -> ClientResult<()>;

    /// `DELETE /api/products/{id}`
    async fn delete_product(&self, id: &ProductId) -> ClientResult<()>;

    /// `PUT /api/products/{id}/price`
    async fn update_price(&self, id: &ProductId, price: Decimal) -> ClientResult<()>;

    /// `GET /api/products/{id}/price-history`
    async fn price_history(&self, id: &ProductId) -> ClientResult<Vec<PriceHistoryRow>>;

    /// `PUT /api/products/{id}/disable` or `/enable`
    async fn set_disabled(&self, id: &ProductId, disabled: bool) -> ClientResult<()>;

    // ========== Images ==========

    /// `GET /api/products/{id}/images`
    async fn list_images(&self, id: &ProductId) -> ClientResult<Vec<ImageId>>;

    /// `POST /api/products/{id}/images` (multipart field `image`)
    async fn upload_image(&self, id: &ProductId, file: &ImageFile) -> ClientResult<ImageId>;

    /// `DELETE /api/products/image/{imageId}`
    async fn delete_image(&self, image_id: &ImageId) -> ClientResult<()>;

    /// Display URL of an image (`GET /api/products/image/{imageId}`)
    fn image_url(&self, image_id: &ImageId) -> String;

    // ========== Users ==========

    /// `GET /api/users`
    async fn list_users(&self) -> ClientResult<Vec<User>>;

    /// `GET /api/users/pending`
    async fn pending_users(&self) -> ClientResult<Vec<PendingUser>>;

    /// `PUT /api/users/{id}/approve` or `/reject`
    async fn set_approval(&self, id: &str, status: ApprovalStatus) -> ClientResult<()>;

    /// `GET /api/admin/user-summary`
    async fn user_summary(&self) -> ClientResult<Vec<UserSummary>>;

    /// `GET /api/admin/user-sessions`
    async fn user_sessions(&self) -> ClientResult<Vec<UserSession>>;

    // ========== Header ==========

    /// `POST /api/banner-text`
    async fn post_banner(&self, banner: &BannerText) -> ClientResult<AckResponse>;

    /// `GET /api/categories`
    async fn list_categories(&self) -> ClientResult<Vec<Category>>;

    /// `POST /api/categories`
    async fn create_category(&self, name: &str) -> ClientResult<AckResponse>;
}

/// Reqwest implementation of [`ConsoleApi`]
#[derive(Debug, Clone)]
pub struct NetworkHttpClient {
    client: Client,
    config: ClientConfig,
}

impl NetworkHttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.config.url(path)));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.config.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_response(response).await
    }

    /// PUT whose response body is ignored
    async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<()> {
        let request = self.authorize(self.client.put(self.config.url(path)).json(body));
        let response = request.send().await?;
        Self::handle_empty(response).await
    }

    async fn delete(&self, path: &str) -> ClientResult<()> {
        let request = self.authorize(self.client.delete(self.config.url(path)));
        let response = request.send().await?;
        Self::handle_empty(response).await
    }

    /// POST returning a loose acknowledgement; a non-JSON 2xx body acks as empty
    async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ClientResult<AckResponse> {
        let request = self.authorize(self.client.post(self.config.url(path)).json(body));
        let response = request.send().await?;
        let text = Self::check_status(response).await?;
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    /// Fail on non-2xx, otherwise return the body text
    async fn check_status(response: Response) -> ClientResult<String> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %message, "Backend request failed");
            return Err(ClientError::Status {
                status: status.as_u16(),
                message,
            });
        }
        Ok(text)
    }

    /// Handle the HTTP response
    async fn handle_response<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
        let text = Self::check_status(response).await?;
        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn handle_empty(response: Response) -> ClientResult<()> {
        Self::check_status(response).await.map(|_| ())
    }
}

/// Server-provided reason in an error body: `error`, then `message`, then `detail`
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str).filter(|s| !s.is_empty()))
        .map(str::to_string)
}

/// Decode list elements one at a time; malformed ones are logged and skipped
pub fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> Vec<T> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(row) => Some(row),
            Err(e) => {
                tracing::warn!(index, "Skipping malformed {what} row: {e}");
                None
            }
        })
        .collect()
}

#[async_trait]
impl ConsoleApi for NetworkHttpClient {
    async fn list_products(&self) -> ClientResult<Vec<ProductRow>> {
        let rows: Vec<Value> = self.get("/api/products").await?;
        Ok(decode_rows(rows, "product"))
    }

    async fn create_product(&self, product: &ProductCreate) -> ClientResult<ProductRow> {
        self.post("/api/products", product).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        update: &ProductDetailsUpdate,
    ) -> ClientResult<()> {
        self.put(&format!("/api/products/{id}"), update).await
    }

    async fn delete_product(&self, id: &ProductId) -> ClientResult<()> {
        self.delete(&format!("/api/products/{id}")).await
    }

    async fn update_price(&self, id: &ProductId, price: Decimal) -> ClientResult<()> {
        self.put(&format!("/api/products/{id}/price"), &PriceUpdate { price })
            .await
    }

    async fn price_history(&self, id: &ProductId) -> ClientResult<Vec<PriceHistoryRow>> {
        self.get(&format!("/api/products/{id}/price-history")).await
    }

    async fn set_disabled(&self, id: &ProductId, disabled: bool) -> ClientResult<()> {
        let action = if disabled { "disable" } else { "enable" };
        self.put(
            &format!("/api/products/{id}/{action}"),
            &AvailabilityUpdate {
                is_disable: disabled,
            },
        )
        .await
    }

    async fn list_images(&self, id: &ProductId) -> ClientResult<Vec<ImageId>> {
        self.get(&format!("/api/products/{id}/images")).await
    }

    async fn upload_image(&self, id: &ProductId, file: &ImageFile) -> ClientResult<ImageId> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime())?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let url = self.config.url(&format!("/api/products/{id}/images"));
        let response = self
            .authorize(self.client.post(url).multipart(form))
            .send()
            .await?;
        let uploaded: ImageUploadResponse = Self::handle_response(response).await?;
        Ok(uploaded.image_id)
    }

    async fn delete_image(&self, image_id: &ImageId) -> ClientResult<()> {
        self.delete(&format!("/api/products/image/{image_id}")).await
    }

    fn image_url(&self, image_id: &ImageId) -> String {
        self.config.url(&format!("/api/products/image/{image_id}"))
    }

    async fn list_users(&self) -> ClientResult<Vec<User>> {
        self.get("/api/users").await
    }

    async fn pending_users(&self) -> ClientResult<Vec<PendingUser>> {
        self.get("/api/users/pending").await
    }

    async fn set_approval(&self, id: &str, status: ApprovalStatus) -> ClientResult<()> {
        self.put(
            &format!("/api/users/{}/{}", id.trim(), status.action()),
            &serde_json::json!({}),
        )
        .await
    }

    async fn user_summary(&self) -> ClientResult<Vec<UserSummary>> {
        let response: UserSummaryResponse = self.get("/api/admin/user-summary").await?;
        if !response.success {
            return Err(ClientError::InvalidResponse(
                "user summary reported failure".into(),
            ));
        }
        Ok(response.users)
    }

    async fn user_sessions(&self) -> ClientResult<Vec<UserSession>> {
        let response: UserSessionsResponse = self.get("/api/admin/user-sessions").await?;
        Ok(response.sessions)
    }

    async fn post_banner(&self, banner: &BannerText) -> ClientResult<AckResponse> {
        self.post_ack("/api/banner-text", banner).await
    }

    async fn list_categories(&self) -> ClientResult<Vec<Category>> {
        let response: CategoryListResponse = self.get("/api/categories").await?;
        Ok(response.into_vec())
    }

    async fn create_category(&self, name: &str) -> ClientResult<AckResponse> {
        self.post_ack(
            "/api/categories",
            &CategoryCreate {
                name: name.to_string(),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_precedence() {
        assert_eq!(
            error_message(r#"{"message": "m", "error": "e"}"#).as_deref(),
            Some("e")
        );
        assert_eq!(
            error_message(r#"{"detail": "user already approved"}"#).as_deref(),
            Some("user already approved")
        );
        assert_eq!(error_message(r#"{"error": ""}"#), None);
        assert_eq!(error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_decode_rows_skips_malformed_products() {
        let body = r#"[
            {"id": 1, "price": 499},
            {"id": 2, "price": "n/a"},
            {"id": 3, "imageIds": [7, null]},
            {"id": 4, "name": {"en": "Almonds"}, "price": 650.5}
        ]"#;
        let rows: Vec<Value> = serde_json::from_str(body).unwrap();

        let products: Vec<ProductRow> = decode_rows(rows, "product");

        let ids: Vec<String> = products
            .iter()
            .filter_map(|r| r.id.as_ref().map(|id| id.to_string()))
            .collect();
        assert_eq!(ids, vec!["1", "4"]);
        assert_eq!(products[1].price, Some(Decimal::new(6505, 1)));
    }

    #[test]
    fn test_image_file_mime() {
        assert_eq!(ImageFile::new("cashew.png", Vec::<u8>::new()).mime(), "image/png");
        assert_eq!(ImageFile::new("blob", Vec::<u8>::new()).mime(), "application/octet-stream");
    }

    #[test]
    fn test_image_url() {
        let client = NetworkHttpClient::new(&ClientConfig::new("http://localhost:8080")).unwrap();
        assert_eq!(
            client.image_url(&ImageId::from("42")),
            "http://localhost:8080/api/products/image/42"
        );
    }
}
