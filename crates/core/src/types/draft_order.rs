//! Draft orders: the "cart" kept on the Admin API side.
//!
//! A draft order is created from form input and later fetched or removed;
//! its id is assigned by Shopify.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::de::null_as_default;
use super::id::{DraftOrderId, VariantId};
use super::resources::Customer;

/// Errors from building a [`LineItem`] out of caller input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LineItemError {
    /// Quantity must be at least one.
    #[error("quantity must be a positive integer")]
    ZeroQuantity,
    /// Title is required.
    #[error("title cannot be empty")]
    EmptyTitle,
}

/// A single variant line in a draft order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub variant_id: VariantId,
    pub quantity: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
}

impl LineItem {
    /// Build a line item from caller input.
    ///
    /// # Errors
    ///
    /// Returns [`LineItemError`] if the quantity is zero or the title is blank.
    pub fn new(
        variant_id: VariantId,
        quantity: u32,
        title: impl Into<String>,
    ) -> Result<Self, LineItemError> {
        if quantity == 0 {
            return Err(LineItemError::ZeroQuantity);
        }
        let title = title.into();
        if title.trim().is_empty() {
            return Err(LineItemError::EmptyTitle);
        }
        Ok(Self {
            variant_id,
            quantity,
            title,
        })
    }
}

/// An uncommitted order on the Admin API.
///
/// Serializes to the shape Shopify expects inside `{"draft_order": ...}`;
/// `id` and `customer` are omitted when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftOrder {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DraftOrderId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<Customer>,
}

impl DraftOrder {
    /// A new draft order with the given lines and no customer.
    #[must_use]
    pub const fn new(line_items: Vec<LineItem>) -> Self {
        Self {
            id: None,
            line_items,
            customer: None,
        }
    }

    /// Attach a customer reference.
    #[must_use]
    pub fn with_customer(mut self, customer: Customer) -> Self {
        self.customer = Some(customer);
        self
    }
}
