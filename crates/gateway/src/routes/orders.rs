//! Direct order submission.

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use tracing::instrument;

use shopgate_core::{
    CustomerId, Email, FinancialStatus, NewOrder, NewOrderCustomer, NewOrderLineItem, OrderId,
    ShippingAddress, VariantId,
};

use super::{parse_quantity, parse_required, required};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::OrderNotifier;
use crate::shopify::Transport;
use crate::state::AppState;

/// Order form fields, named the way the storefront form posts them.
#[derive(Debug, Deserialize)]
pub struct SubmitOrderForm {
    pub variant_id: Option<String>,
    pub quantity: Option<String>,
    #[serde(rename = "customer[id]")]
    pub customer_id: Option<String>,
    #[serde(rename = "customer[email]")]
    pub customer_email: Option<String>,
    #[serde(rename = "shipping_address[address1]")]
    pub address1: Option<String>,
    #[serde(rename = "shipping_address[city]")]
    pub city: Option<String>,
    #[serde(rename = "shipping_address[province]")]
    pub province: Option<String>,
    #[serde(rename = "shipping_address[country]")]
    pub country: Option<String>,
    pub financial_status: Option<String>,
}

impl SubmitOrderForm {
    /// Validate every field into an order payload.
    fn into_order(self) -> Result<NewOrder> {
        let variant_id: VariantId = parse_required("variant_id", self.variant_id.as_deref())?;
        let quantity = parse_quantity("quantity", required("quantity", self.quantity.as_deref())?)?;
        let customer_id: CustomerId = parse_required("customer[id]", self.customer_id.as_deref())?;
        let email = Email::parse(required("customer[email]", self.customer_email.as_deref())?)
            .map_err(|e| AppError::invalid("customer[email]", e))?;
        let financial_status: FinancialStatus =
            parse_required("financial_status", self.financial_status.as_deref())?;

        let shipping_address = ShippingAddress {
            address1: required("shipping_address[address1]", self.address1.as_deref())?.to_owned(),
            city: required("shipping_address[city]", self.city.as_deref())?.to_owned(),
            province: required("shipping_address[province]", self.province.as_deref())?.to_owned(),
            country: required("shipping_address[country]", self.country.as_deref())?.to_owned(),
        };

        Ok(NewOrder {
            customer: NewOrderCustomer {
                id: customer_id,
                email,
            },
            line_items: vec![NewOrderLineItem {
                variant_id,
                quantity,
            }],
            shipping_address,
            financial_status,
        })
    }
}

/// Place an order, then email the customer if SMTP is configured.
///
/// The email is sent in the background; its failure is logged and does not
/// affect the response.
#[instrument(skip(state, form))]
pub async fn submit<T: Transport>(
    State(state): State<AppState<T>>,
    form: std::result::Result<Form<SubmitOrderForm>, FormRejection>,
) -> Result<Json<Value>> {
    let Form(form) = form?;
    let new_order = form.into_order()?;

    add_breadcrumb(
        "order",
        "Submitting order",
        Some(&[("customer_id", new_order.customer.id.to_string().as_str())]),
    );

    let order = state
        .gateway()
        .create_order(&new_order)
        .await
        .map_err(AppError::shopify("order"))?;

    if let Some(notifier) = state.notifier().cloned() {
        spawn_confirmation(notifier, new_order.customer.email, order.id);
    }

    Ok(Json(json!({
        "order": order,
        "message": "Order submitted successfully!",
    })))
}

/// Send the order confirmation on a detached task.
///
/// The task is not awaited on shutdown, so an in-flight send may be lost; the
/// debug line at start marks that a send was attempted.
fn spawn_confirmation(notifier: OrderNotifier, to: Email, order_id: OrderId) -> JoinHandle<()> {
    tokio::spawn(async move {
        tracing::debug!(%order_id, to = %to, "Sending order confirmation");
        if let Err(e) = notifier.order_created(&to, order_id).await {
            tracing::warn!(error = %e, %order_id, "Failed to send order confirmation");
        }
    })
}
