//! Order intake types.
//!
//! Orders are immutable once created. They hold a soft reference to the
//! product plus a snapshot of its title and category, so history stays
//! readable after the product is edited or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ids::timestamp_id;
use super::lenient;
use super::product::{Product, ProductId};

/// Order identifier, derived from the creation time.
pub type OrderId = String;

/// A submitted order.
///
/// Only `id` is mandatory when decoding; history rows from older versions
/// fall back to empty fields and display defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(deserialize_with = "lenient::text")]
    pub id: OrderId,
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub address: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
    /// Soft reference; the product may no longer exist.
    #[serde(default, deserialize_with = "lenient::text")]
    pub product_id: ProductId,
    /// Product title at order time.
    #[serde(default, deserialize_with = "lenient::text")]
    pub product_title: String,
    /// Product category at order time.
    #[serde(default, deserialize_with = "lenient::text")]
    pub category: String,
    /// Quantity as entered in the form.
    #[serde(default, deserialize_with = "lenient::text")]
    pub quantity: String,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Quantity for display; orders saved without one count as a single unit.
    pub fn display_quantity(&self) -> &str {
        if self.quantity.trim().is_empty() {
            "1"
        } else {
            &self.quantity
        }
    }

    /// Product title for display in order history.
    pub fn display_title(&self) -> &str {
        if self.product_title.is_empty() {
            "-"
        } else {
            &self.product_title
        }
    }
}

/// Rejected order submission. Raised before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntakeError {
    #[error("no product selected")]
    NoProductSelected,
    #[error("required field `{0}` is empty")]
    MissingField(&'static str),
}

/// Customer form input for an order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub quantity: String,
    pub notes: String,
}

impl OrderDraft {
    /// Check that every required field is filled in.
    pub fn validate(&self) -> Result<(), IntakeError> {
        let required = [
            ("name", &self.name),
            ("phone", &self.phone),
            ("address", &self.address),
            ("quantity", &self.quantity),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(IntakeError::MissingField(field));
            }
        }
        Ok(())
    }

    /// Turn the draft into an order for `product`, stamped at `now`.
    pub fn into_order(self, product: &Product, now: DateTime<Utc>) -> Order {
        Order {
            id: timestamp_id(now),
            name: self.name,
            phone: self.phone,
            address: self.address,
            notes: self.notes,
            product_id: product.id.clone(),
            product_title: product.title.clone(),
            category: product.category.clone(),
            quantity: self.quantity,
            created_at: now,
        }
    }
}
