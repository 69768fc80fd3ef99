//! Read-only Admin catalog routes.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use shopgate_core::PriceRuleId;

use super::parse_required;
use crate::error::{AppError, Result};
use crate::shopify::Transport;
use crate::state::AppState;

/// Query parameters for discount codes.
#[derive(Debug, Deserialize)]
pub struct DiscountCodesQuery {
    pub price_rule_id: Option<String>,
}

/// List products.
#[instrument(skip(state))]
pub async fn products<T: Transport>(State(state): State<AppState<T>>) -> Result<Json<Value>> {
    let products = state
        .gateway()
        .fetch_products()
        .await
        .map_err(AppError::shopify("products"))?;

    Ok(Json(json!({
        "products": products,
        "message": "Products fetched successfully",
    })))
}

/// List orders.
#[instrument(skip(state))]
pub async fn orders<T: Transport>(State(state): State<AppState<T>>) -> Result<Json<Value>> {
    let orders = state
        .gateway()
        .fetch_orders()
        .await
        .map_err(AppError::shopify("orders"))?;

    Ok(Json(json!({
        "orders": orders,
        "message": "Orders fetched successfully",
    })))
}

/// List customers.
#[instrument(skip(state))]
pub async fn customers<T: Transport>(State(state): State<AppState<T>>) -> Result<Json<Value>> {
    let customers = state
        .gateway()
        .fetch_customers()
        .await
        .map_err(AppError::shopify("customers"))?;

    Ok(Json(json!({
        "customers": customers,
        "message": "Customers fetched successfully",
    })))
}

/// List abandoned checkouts.
#[instrument(skip(state))]
pub async fn checkouts<T: Transport>(State(state): State<AppState<T>>) -> Result<Json<Value>> {
    let checkouts = state
        .gateway()
        .fetch_checkouts()
        .await
        .map_err(AppError::shopify("checkouts"))?;

    Ok(Json(json!({
        "checkouts": checkouts,
        "message": "Checkouts fetched successfully",
    })))
}

/// List price rules.
#[instrument(skip(state))]
pub async fn price_rules<T: Transport>(State(state): State<AppState<T>>) -> Result<Json<Value>> {
    let price_rules = state
        .gateway()
        .fetch_price_rules()
        .await
        .map_err(AppError::shopify("price_rules"))?;

    Ok(Json(json!({
        "price_rules": price_rules,
        "message": "Price Rules fetched successfully",
    })))
}

/// List the discount codes under `?price_rule_id=`.
#[instrument(skip(state, query))]
pub async fn discount_codes<T: Transport>(
    State(state): State<AppState<T>>,
    query: std::result::Result<Query<DiscountCodesQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(query) = query?;
    let price_rule_id: PriceRuleId =
        parse_required("price_rule_id", query.price_rule_id.as_deref())?;

    let discount_codes = state
        .gateway()
        .fetch_discount_codes(price_rule_id)
        .await
        .map_err(AppError::shopify("discount_codes"))?;

    Ok(Json(json!({
        "discount_codes": discount_codes,
        "message": "Discount Codes fetched successfully",
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, get, send};
    use crate::shopify::mock::MockTransport;

    #[tokio::test]
    async fn test_products_relays_array() {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            &json!({"products": [{"id": 1, "title": "Mug", "vendor": "Acme", "images": [], "variants": []}]}),
        );

        let (status, body) = send(app(&mock), get("/products")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["products"][0]["title"], "Mug");
        assert_eq!(body["message"], "Products fetched successfully");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_each_listing_relays_its_key() {
        for (uri, key, record) in [
            ("/orders", "orders", json!({"id": 450_789_469, "currency": "CAD"})),
            ("/customers", "customers", json!({"id": 207_119_551, "email": "bob@example.com"})),
            ("/checkouts", "checkouts", json!({"id": 901_414_060, "cart_token": "68778783ad29"})),
            ("/pricerules", "price_rules", json!({"id": 507_328_175})),
        ] {
            let mock = MockTransport::new();
            mock.respond_json(200, &json!({ key: [record.clone()] }));

            let (status, body) = send(app(&mock), get(uri)).await;

            assert_eq!(status, StatusCode::OK, "{uri}");
            let relayed = body[key].as_array().unwrap();
            assert_eq!(relayed.len(), 1, "{uri}");
            assert_eq!(relayed[0]["id"], record["id"], "{uri}");
        }
    }

    #[tokio::test]
    async fn test_listing_without_its_key_is_empty() {
        let mock = MockTransport::new();
        mock.respond_json(200, &json!({}));

        let (status, body) = send(app(&mock), get("/customers")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["customers"], json!([]));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500_with_null_key() {
        let mock = MockTransport::new();
        mock.respond(502, "Bad Gateway");

        let (status, body) = send(app(&mock), get("/orders")).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["orders"], json!(null));
        let message = body["message"].as_str().unwrap();
        assert!(message.starts_with("Error: "));
        assert!(message.contains("502"));
    }

    #[tokio::test]
    async fn test_discount_codes_requires_price_rule_id() {
        let mock = MockTransport::new();

        let (status, body) = send(app(&mock), get("/discountcodes")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("price_rule_id"));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_discount_codes_rejects_non_numeric_id() {
        let mock = MockTransport::new();

        let (status, _) = send(app(&mock), get("/discountcodes?price_rule_id=abc")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_discount_codes_for_rule() {
        let mock = MockTransport::new();
        mock.respond_json(
            200,
            &json!({"discount_codes": [{"id": 1, "price_rule_id": 507_328_175, "code": "WINTER", "usage_count": 4}]}),
        );

        let (status, body) = send(app(&mock), get("/discountcodes?price_rule_id=507328175")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["discount_codes"][0]["code"], "WINTER");
        assert!(
            mock.requests()[0]
                .url
                .path()
                .contains("/price_rules/507328175/discount_codes.json")
        );
    }
}
