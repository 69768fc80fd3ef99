//! Draft order routes: the Admin-side "cart".

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::instrument;

use shopgate_core::{DraftOrder, DraftOrderId, LineItem, VariantId};

use super::{parse_quantity, parse_required, required};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::shopify::Transport;
use crate::state::AppState;

/// Form data for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub variant_id: Option<String>,
    pub quantity: Option<String>,
    pub title: Option<String>,
}

/// Form data for removing a draft order.
///
/// `variant_id` carries the draft order id.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub variant_id: Option<String>,
}

/// List draft orders.
#[instrument(skip(state))]
pub async fn list<T: Transport>(State(state): State<AppState<T>>) -> Result<Json<Value>> {
    let draft_orders = state
        .gateway()
        .fetch_draft_orders()
        .await
        .map_err(AppError::shopify("draft_orders"))?;

    Ok(Json(json!({
        "draft_orders": draft_orders,
        "message": "Draft orders fetched successfully",
    })))
}

/// Create a one-line draft order from the submitted form.
#[instrument(skip(state, form))]
pub async fn add<T: Transport>(
    State(state): State<AppState<T>>,
    form: std::result::Result<Form<AddToCartForm>, FormRejection>,
) -> Result<Json<Value>> {
    let Form(form) = form?;

    let variant_id: VariantId = parse_required("variant_id", form.variant_id.as_deref())?;
    let quantity = parse_quantity(
        "quantity",
        required("quantity", form.quantity.as_deref())?,
    )?;
    let title = required("title", form.title.as_deref())?;
    let line_item = LineItem::new(variant_id, quantity, title)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    add_breadcrumb(
        "cart",
        "Creating draft order",
        Some(&[("variant_id", variant_id.to_string().as_str())]),
    );

    let order = state
        .gateway()
        .create_draft_order(&DraftOrder::new(vec![line_item]))
        .await
        .map_err(AppError::shopify("order"))?;

    Ok(Json(json!({
        "order": order,
        "message": "Product added to cart",
    })))
}

/// Delete the draft order named by the form's `variant_id`.
#[instrument(skip(state, form))]
pub async fn remove<T: Transport>(
    State(state): State<AppState<T>>,
    form: std::result::Result<Form<RemoveFromCartForm>, FormRejection>,
) -> Result<Json<Value>> {
    let Form(form) = form?;
    let draft_order_id: DraftOrderId = parse_required("variant_id", form.variant_id.as_deref())?;

    state
        .gateway()
        .remove_draft_order(draft_order_id)
        .await
        .map_err(AppError::shopify("draft_order"))?;

    Ok(Json(json!({
        "message": "Product removed from cart successfully",
    })))
}
