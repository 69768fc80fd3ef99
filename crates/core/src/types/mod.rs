//! Core types for Shopgate.
//!
//! This module provides type-safe wrappers for the Shopify resources the
//! gateway relays.

pub mod cart;
mod de;
pub mod draft_order;
pub mod email;
pub mod handle;
pub mod id;
pub mod order;
pub mod price;
pub mod resources;
pub mod status;

pub use cart::{Cart, CartLine, CartMerchandise};
pub use draft_order::{DraftOrder, LineItem, LineItemError};
pub use email::{Email, EmailError};
pub use handle::{CartId, CartLineId, HandleError, MerchandiseId};
pub use id::*;
pub use order::{NewOrder, NewOrderCustomer, NewOrderLineItem, ShippingAddress};
pub use price::Money;
pub use resources::{
    CheckOut, Customer, DiscountCode, Order, OrderCustomer, PriceRule, Product, ProductImage,
    ProductVariant,
};
pub use status::{FinancialStatus, UnknownFinancialStatus};
