//! Storefront cart routes.
//!
//! All three are GET endpoints driven by query parameters, including the
//! two that mutate the cart.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use shopgate_core::{CartId, CartLineId, HandleError, MerchandiseId};

use super::{parse_quantity, required};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::shopify::Transport;
use crate::state::AppState;

/// Query parameters shared by the cart routes.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub cart_id: Option<String>,
    pub line_id: Option<String>,
    /// Merchandise (product variant) id; `merchandise_id` is also accepted.
    #[serde(alias = "merchandise_id")]
    pub merchent_id: Option<String>,
    pub quantity: Option<String>,
}

fn handle<H>(
    name: &str,
    value: Option<&str>,
    parse: impl FnOnce(&str) -> std::result::Result<H, HandleError>,
) -> Result<H> {
    parse(required(name, value)?).map_err(|e| AppError::invalid(name, e))
}

/// Fetch the cart named by `?cart_id=`.
#[instrument(skip(state, query))]
pub async fn details<T: Transport>(
    State(state): State<AppState<T>>,
    query: std::result::Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(query) = query?;
    let cart_id = handle("cart_id", query.cart_id.as_deref(), CartId::parse)?;

    let cart = state
        .gateway()
        .fetch_cart(&cart_id)
        .await
        .map_err(AppError::shopify("cart"))?;

    Ok(Json(json!({
        "cart": cart,
        "message": "Cart details fetched successfully",
    })))
}

/// Remove `?line_id=` from `?cart_id=`.
#[instrument(skip(state, query))]
pub async fn remove_line<T: Transport>(
    State(state): State<AppState<T>>,
    query: std::result::Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(query) = query?;
    let cart_id = handle("cart_id", query.cart_id.as_deref(), CartId::parse)?;
    let line_id = handle("line_id", query.line_id.as_deref(), CartLineId::parse)?;

    let cart = state
        .gateway()
        .remove_cart_line(&cart_id, &line_id)
        .await
        .map_err(AppError::shopify("cart"))?;

    Ok(Json(json!({
        "cart": cart,
        "message": "Cart line removed successfully",
    })))
}

/// Add `?merchent_id=` to `?cart_id=`.
///
/// Uses `?quantity=` when given, otherwise the configured default.
#[instrument(skip(state, query))]
pub async fn add_line<T: Transport>(
    State(state): State<AppState<T>>,
    query: std::result::Result<Query<CartQuery>, QueryRejection>,
) -> Result<Json<Value>> {
    let Query(query) = query?;
    let cart_id = handle("cart_id", query.cart_id.as_deref(), CartId::parse)?;
    let merchandise_id = handle(
        "merchent_id",
        query.merchent_id.as_deref(),
        MerchandiseId::parse,
    )?;
    let quantity = match query.quantity.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_quantity("quantity", raw)?,
        _ => state.config().shopify.cart_line_default_quantity,
    };

    add_breadcrumb(
        "cart",
        "Adding cart line",
        Some(&[("cart_id", cart_id.as_str())]),
    );

    let cart = state
        .gateway()
        .add_cart_line(&cart_id, &merchandise_id, quantity)
        .await
        .map_err(AppError::shopify("cart"))?;

    Ok(Json(json!({
        "cart": cart,
        "message": "Cart line added successfully",
    })))
}
