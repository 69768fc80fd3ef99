//! Storefront cart as relayed to callers.
//!
//! The Storefront API returns lines as a GraphQL connection
//! (`lines.edges[].node`); the gateway flattens that into a plain list.

use serde::{Deserialize, Serialize};

use super::handle::{CartId, CartLineId, MerchandiseId};
use super::price::Money;

/// A Storefront cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: CartId,
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Total quantity across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}

/// One line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: CartLineId,
    pub quantity: i64,
    /// Absent when the query did not select merchandise.
    pub merchandise: Option<CartMerchandise>,
}

/// The product variant behind a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    pub id: MerchandiseId,
    pub title: String,
    pub price: Option<Money>,
}
