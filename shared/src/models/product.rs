//! Product Model

use super::{ImageId, LocalizedText, ProductId};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product entity as held by the console
///
/// Built from a [`ProductRow`] by [`ProductRow::normalize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub category: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Attached images in upload order
    pub image_ids: Vec<ImageId>,
    pub is_disabled: bool,
}

impl Product {
    /// Whether price/image/availability mutations may target this row
    pub fn is_mutable(&self) -> bool {
        self.id.is_numeric()
    }
}

/// Product row as returned by `GET /api/products`
///
/// The backend has shipped the disabled flag under three names and in
/// several encodings; they are reconciled in [`ProductRow::normalize`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRow {
    #[serde(default)]
    pub id: Option<ProductId>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub name: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default, rename = "imageIds")]
    pub image_ids: Option<Vec<ImageId>>,
    #[serde(default)]
    pub disabled: Option<Value>,
    #[serde(default, rename = "isDisabled")]
    pub is_disabled_camel: Option<Value>,
    #[serde(default, rename = "is_disabled")]
    pub is_disabled_snake: Option<Value>,
}

impl ProductRow {
    /// Convert to a [`Product`]; rows without an id yield `None`.
    pub fn normalize(self) -> Option<Product> {
        let is_disabled = self
            .disabled
            .or(self.is_disabled_camel)
            .or(self.is_disabled_snake)
            .is_some_and(|raw| crate::util::normalize_flag(&raw));

        Some(Product {
            id: self.id?,
            category: self.category.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            image_ids: self.image_ids.unwrap_or_default(),
            is_disabled,
        })
    }
}

/// Create product payload (`POST /api/products`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub category: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Update product details payload (`PUT /api/products/{id}`)
///
/// The backend stores localized text as JSON strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailsUpdate {
    pub category: String,
    pub name_json: String,
    pub description_json: String,
}

impl ProductDetailsUpdate {
    pub fn new(
        category: impl Into<String>,
        name: &LocalizedText,
        description: &LocalizedText,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            category: category.into(),
            name_json: serde_json::to_string(name)?,
            description_json: serde_json::to_string(description)?,
        })
    }
}

/// Price update payload (`PUT /api/products/{id}/price`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceUpdate {
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Availability payload (`PUT /api/products/{id}/disable|enable`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AvailabilityUpdate {
    pub is_disable: bool,
}

/// Upload response (`POST /api/products/{id}/images`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_id: ImageId,
}

/// Price history row (`GET /api/products/{id}/price-history`)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryRow {
    #[serde(default)]
    pub changed_at: Option<String>,
    #[serde(default)]
    pub price: Decimal,
}

/// One point of a product's price sparkline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryPoint {
    /// Day of the change; `None` when the backend omitted or garbled it
    pub date: Option<NaiveDate>,
    pub price: Decimal,
}

impl From<PriceHistoryRow> for PriceHistoryPoint {
    fn from(row: PriceHistoryRow) -> Self {
        Self {
            date: row.changed_at.as_deref().and_then(crate::util::date_part),
            price: row.price,
        }
    }
}
