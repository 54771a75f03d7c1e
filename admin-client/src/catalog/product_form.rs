//! Add / edit product form
//!
//! Name and description go through [`TranslationAssist`]; category, price
//! text and chosen images are plain fields. [`ProductForm::draft`] snapshots
//! the form for submission.

use super::TranslationAssist;
use crate::http::ImageFile;
use crate::translate::Translator;
use crate::{ClientError, ClientResult};
use rust_decimal::Decimal;
use shared::ErrorCode;
use shared::models::{Language, LocalizedText, Product};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Name,
    Description,
}

/// Submitted form contents
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub category: String,
    pub name: LocalizedText,
    pub description: LocalizedText,
    /// Raw price input
    pub price: String,
    /// Images to upload after creation
    pub images: Vec<ImageFile>,
}

impl ProductDraft {
    /// Presence checks shared by create and edit
    pub fn validate_details(&self) -> ClientResult<()> {
        if self.category.trim().is_empty() {
            return Err(ClientError::invalid(ErrorCode::RequiredField, "Category is required"));
        }
        if self.name.is_blank() {
            return Err(ClientError::invalid(ErrorCode::RequiredField, "English name is required"));
        }
        Ok(())
    }

    /// Checks for a new product; returns the parsed price
    pub fn validate(&self) -> ClientResult<Decimal> {
        self.validate_details()?;
        let price = self.price.trim();
        if price.is_empty() {
            return Err(ClientError::invalid(ErrorCode::RequiredField, "Price is required"));
        }
        Decimal::from_str(price).map_err(|_| {
            ClientError::invalid(ErrorCode::ProductInvalidPrice, format!("Invalid price `{price}`"))
        })
    }
}

#[derive(Debug, Default)]
struct Fields {
    category: String,
    price: String,
    images: Vec<ImageFile>,
}

#[derive(Debug)]
pub struct ProductForm {
    assist: TranslationAssist<ProductField>,
    fields: Mutex<Fields>,
}

impl ProductForm {
    /// Empty form for a new product
    pub fn new(translator: Arc<dyn Translator>, debounce: Duration) -> Self {
        Self {
            assist: TranslationAssist::new(translator, debounce),
            fields: Mutex::new(Fields::default()),
        }
    }

    /// Form prefilled from an existing product
    pub fn for_product(
        product: &Product,
        translator: Arc<dyn Translator>,
        debounce: Duration,
    ) -> Self {
        let form = Self::new(translator, debounce);
        form.assist.set_text(ProductField::Name, product.name.clone());
        form.assist
            .set_text(ProductField::Description, product.description.clone());
        {
            let mut fields = form.fields();
            fields.category = product.category.clone();
            fields.price = product.price.to_string();
        }
        form
    }

    fn fields(&self) -> MutexGuard<'_, Fields> {
        self.fields
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_category(&self, category: impl Into<String>) {
        self.fields().category = category.into();
    }

    pub fn set_price_text(&self, price: impl Into<String>) {
        self.fields().price = price.into();
    }

    pub fn on_name_change(&self, value: impl Into<String>) {
        self.assist.on_primary_text_change(ProductField::Name, value);
    }

    pub fn on_description_change(&self, value: impl Into<String>) {
        self.assist
            .on_primary_text_change(ProductField::Description, value);
    }

    /// Manual override of a translated value
    pub fn set_translation(&self, field: ProductField, lang: Language, value: impl Into<String>) {
        self.assist.set_translation(field, lang, value);
    }

    pub fn add_image(&self, file: ImageFile) {
        self.fields().images.push(file);
    }

    pub fn remove_image(&self, index: usize) -> Option<ImageFile> {
        let mut fields = self.fields();
        (index < fields.images.len()).then(|| fields.images.remove(index))
    }

    pub fn assist(&self) -> &TranslationAssist<ProductField> {
        &self.assist
    }

    pub fn draft(&self) -> ProductDraft {
        let fields = self.fields();
        ProductDraft {
            category: fields.category.clone(),
            name: self.assist.text(ProductField::Name),
            description: self.assist.text(ProductField::Description),
            price: fields.price.clone(),
            images: fields.images.clone(),
        }
    }

    /// Dialog closed: stop pending translations
    pub fn close(&self) {
        self.assist.cancel();
    }
}
