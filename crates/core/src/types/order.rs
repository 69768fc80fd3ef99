//! Outbound payload for placing an order directly (`orders.json`).

use serde::{Deserialize, Serialize};

use super::email::Email;
use super::id::{CustomerId, VariantId};
use super::status::FinancialStatus;

/// An order to create on the Admin API.
///
/// Serializes to the body Shopify expects inside `{"order": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: NewOrderCustomer,
    pub line_items: Vec<NewOrderLineItem>,
    pub shipping_address: ShippingAddress,
    pub financial_status: FinancialStatus,
}

/// The existing customer the order is placed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderCustomer {
    pub id: CustomerId,
    pub email: Email,
}

/// A variant and quantity on a new order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderLineItem {
    pub variant_id: VariantId,
    pub quantity: u32,
}

/// Where the order ships.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address1: String,
    pub city: String,
    pub province: String,
    pub country: String,
}
