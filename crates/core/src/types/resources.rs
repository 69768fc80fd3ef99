//! Read-only projections of Shopify Admin REST resources.
//!
//! Each record keeps only the fields the gateway's callers use. Unknown fields
//! are ignored and nullable scalars decode to their zero value, so a new field
//! or a `null` from Shopify never fails a whole listing.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::de::null_as_default;
use super::id::{
    CheckoutId, CustomerId, DiscountCodeId, ImageId, OrderId, PriceRuleId, ProductId, VariantId,
};

/// A catalog product (`products.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub vendor: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: Vec<ProductImage>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<ProductVariant>,
}

/// An image attached to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ImageId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub src: String,
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: VariantId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price: Decimal,
    #[serde(default)]
    pub image_id: Option<ImageId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variant_ids: Vec<VariantId>,
}

/// A placed order (`orders.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default)]
    pub customer: Option<OrderCustomer>,
}

/// The customer reference embedded in an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomer {
    pub id: CustomerId,
    #[serde(default)]
    pub email: Option<String>,
}

/// A store customer (`customers.json`), also embedded in draft orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// An abandoned checkout (`checkouts.json`).
///
/// Customer and line items are relayed untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOut {
    pub id: CheckoutId,
    #[serde(default)]
    pub cart_token: Option<String>,
    #[serde(default)]
    pub customer: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub line_items: Vec<serde_json::Value>,
}

/// A discount policy (`price_rules.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRule {
    pub id: PriceRuleId,
    #[serde(default)]
    pub starts_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<FixedOffset>>,
    /// Discount value; negative for reductions (e.g. `"-10.0"`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: Decimal,
}

/// A redeemable code under a price rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountCode {
    pub id: DiscountCodeId,
    pub price_rule_id: PriceRuleId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usage_count: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_decodes_nested_records() {
        let product: Product = serde_json::from_value(json!({
            "id": 632_910_392,
            "title": "IPod Nano - 8GB",
            "vendor": "Apple",
            "body_html": "<p>ignored</p>",
            "images": [{"id": 850_703_190, "src": "https://cdn.example.com/ipod.png"}],
            "variants": [{
                "id": 808_950_810,
                "product_id": 632_910_392,
                "title": "Pink",
                "price": "199.00",
                "image_id": null
            }]
        }))
        .unwrap();

        assert_eq!(product.id, ProductId::new(632_910_392));
        assert_eq!(product.currency, None);
        assert_eq!(product.images.len(), 1);
        let variant = &product.variants[0];
        assert_eq!(variant.price, Decimal::new(19900, 2));
        assert_eq!(variant.image_id, None);
        assert!(variant.variant_ids.is_empty());
    }

    #[test]
    fn test_nulls_decode_to_zero_values() {
        let order: Order = serde_json::from_value(json!({
            "id": 450_789_469,
            "currency": null,
            "customer": null
        }))
        .unwrap();
        assert_eq!(order.currency, "");
        assert!(order.customer.is_none());
    }

    #[test]
    fn test_price_rule_keeps_offset() {
        let rule: PriceRule = serde_json::from_value(json!({
            "id": 507_328_175,
            "starts_at": "2017-01-19T17:59:10-05:00",
            "ends_at": null,
            "value": "-10.0"
        }))
        .unwrap();

        assert_eq!(rule.value, Decimal::new(-100, 1));
        assert_eq!(
            rule.starts_at.unwrap().to_rfc3339(),
            "2017-01-19T17:59:10-05:00"
        );
        assert!(rule.ends_at.is_none());
    }

    #[test]
    fn test_checkout_relays_free_form_fields() {
        let checkout: CheckOut = serde_json::from_value(json!({
            "id": 450_789_469,
            "cart_token": "68778783ad298f1c80c3bafcddeea02f",
            "customer": {"id": 207_119_551, "email": "bob@example.com"},
            "line_items": [{"title": "IPod Nano", "quantity": 1}]
        }))
        .unwrap();

        assert_eq!(checkout.customer.unwrap()["email"], "bob@example.com");
        assert_eq!(checkout.line_items[0]["quantity"], 1);
    }
}
