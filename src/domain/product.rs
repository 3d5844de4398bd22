//! Catalog product types.
//!
//! A `Product` is the stored catalog entry. A `ProductDraft` is the raw
//! admin form input; it only becomes a `Product` once validated and
//! assigned an identifier (see `usecases::view::ViewState::build_product`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::lenient;

/// Stable product identifier. Never changes once assigned.
pub type ProductId = String;

/// Identifier of the product that must always be present in the catalog.
pub const REQUIRED_PRODUCT_ID: &str = "care-set-1";

/// A catalog entry.
///
/// Field names on disk follow the layout the storefront has always used
/// (`desc`, `imageDataUrl`, `createdAt`), so documents written by older
/// versions decode unchanged. Only `id` is mandatory; every other field
/// falls back to an empty value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique, immutable identifier.
    #[serde(deserialize_with = "lenient::text")]
    pub id: ProductId,
    /// Display title.
    #[serde(default, deserialize_with = "lenient::text")]
    pub title: String,
    /// Exact-match filter key.
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    /// Optional free-form description. Stored as `""` when absent.
    #[serde(
        default,
        rename = "desc",
        deserialize_with = "lenient::optional_text",
        serialize_with = "lenient::empty_if_none"
    )]
    pub description: Option<String>,
    /// Data-encoded image or asset path. Empty when the product has no image.
    #[serde(default, deserialize_with = "lenient::text")]
    pub image_data_url: String,
    /// Time of the last save. The epoch when unknown.
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Create a product with no description and no image.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        category: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category: category.into(),
            description: None,
            image_data_url: String::new(),
            created_at,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.description = (!description.is_empty()).then_some(description);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image_data_url: impl Into<String>) -> Self {
        self.image_data_url = image_data_url.into();
        self
    }

    /// Whether the product carries an image reference.
    pub fn has_image(&self) -> bool {
        !self.image_data_url.is_empty()
    }

    /// Description, or an empty string when none was given.
    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Rejected admin form input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductFormError {
    #[error("product title is required")]
    MissingTitle,
    #[error("product category is required")]
    MissingCategory,
}

/// Admin form input for creating or updating a product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDraft {
    pub title: String,
    pub category: String,
    pub description: String,
    /// A newly supplied image. `None` keeps the existing image on update.
    pub image_data_url: Option<String>,
}

impl ProductDraft {
    /// Check required fields. Title and category must not be blank.
    pub fn validate(&self) -> Result<(), ProductFormError> {
        if self.title.trim().is_empty() {
            return Err(ProductFormError::MissingTitle);
        }
        if self.category.trim().is_empty() {
            return Err(ProductFormError::MissingCategory);
        }
        Ok(())
    }
}
