//! HTTP route handlers for the gateway.
//!
//! Every handler validates its form or query fields, makes one gateway call,
//! and answers with JSON. Validation failures answer 400 before any remote
//! call is made.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health              - Health check
//!
//! # Admin catalog (read-only)
//! GET  /products            - All products
//! GET  /orders              - All orders
//! GET  /customers           - All customers
//! GET  /checkouts           - Abandoned checkouts
//! GET  /pricerules          - Price rules
//! GET  /discountcodes       - Discount codes (?price_rule_id=)
//!
//! # Draft orders
//! GET  /cart                - All draft orders
//! POST /addtocart           - Create draft order (form: variant_id, quantity, title)
//! POST /removefromcart      - Delete draft order (form: variant_id = draft order id)
//!
//! # Orders
//! POST /submitorder         - Place order, then email the customer
//!
//! # Storefront cart
//! GET  /getcartdetails      - Fetch cart (?cart_id=)
//! GET  /deletecartdetails   - Remove cart line (?cart_id=&line_id=)
//! GET  /cartlinedetails     - Add cart line (?cart_id=&merchent_id=[&quantity=])
//! ```

pub mod cart;
pub mod catalog;
pub mod draft_orders;
pub mod orders;

use std::str::FromStr;
use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    middleware,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::error::{AppError, Result};
use crate::middleware::request_id_middleware;
use crate::shopify::Transport;
use crate::state::AppState;

/// Create the Admin catalog routes.
pub fn catalog_routes<T: Transport>() -> Router<AppState<T>> {
    Router::new()
        .route("/products", get(catalog::products::<T>))
        .route("/orders", get(catalog::orders::<T>))
        .route("/customers", get(catalog::customers::<T>))
        .route("/checkouts", get(catalog::checkouts::<T>))
        .route("/pricerules", get(catalog::price_rules::<T>))
        .route("/discountcodes", get(catalog::discount_codes::<T>))
}

/// Create the draft order and order submission routes.
pub fn order_routes<T: Transport>() -> Router<AppState<T>> {
    Router::new()
        .route("/cart", get(draft_orders::list::<T>))
        .route("/addtocart", post(draft_orders::add::<T>))
        .route("/removefromcart", post(draft_orders::remove::<T>))
        .route("/submitorder", post(orders::submit::<T>))
}

/// Create the Storefront cart routes.
pub fn cart_routes<T: Transport>() -> Router<AppState<T>> {
    Router::new()
        .route("/getcartdetails", get(cart::details::<T>))
        .route("/deletecartdetails", get(cart::remove_line::<T>))
        .route("/cartlinedetails", get(cart::add_line::<T>))
}

/// Create all gateway routes.
pub fn routes<T: Transport>() -> Router<AppState<T>> {
    Router::new()
        .merge(catalog_routes())
        .merge(order_routes())
        .merge(cart_routes())
}

/// Build the complete application: routes, health check, and middleware.
///
/// # Middleware Order (innermost first)
///
/// 1. Request ID (records into the trace span)
/// 2. `TraceLayer` (request tracing)
/// 3. CORS (any origin)
/// 4. Sentry layers (outermost for full request coverage)
pub fn app<T: Transport>(state: AppState<T>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(|response: &Response<_>, latency: Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                }),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not call Shopify.
async fn health() -> &'static str {
    "ok"
}

// =============================================================================
// Parameter validation
// =============================================================================

/// The trimmed value of a required parameter.
fn required<'a>(name: &str, value: Option<&'a str>) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::missing(name))
}

/// Parse a required parameter.
fn parse_required<V>(name: &str, value: Option<&str>) -> Result<V>
where
    V: FromStr,
    V::Err: std::fmt::Display,
{
    required(name, value)?
        .parse()
        .map_err(|e| AppError::invalid(name, e))
}

/// Parse a strictly positive quantity.
fn parse_quantity(name: &str, value: &str) -> Result<u32> {
    match value.trim().parse::<u32>() {
        Ok(0) => Err(AppError::invalid(name, "must be greater than zero")),
        Ok(quantity) => Ok(quantity),
        Err(e) => Err(AppError::invalid(name, e)),
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use super::test_support::app;
    use super::*;
    use crate::middleware::request_id::REQUEST_ID_HEADER;
    use crate::shopify::mock::MockTransport;

    #[tokio::test]
    async fn test_health() {
        let mock = MockTransport::new();
        let response = app(&mock)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"ok");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let mock = MockTransport::new();
        let response = app(&mock)
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(REQUEST_ID_HEADER, "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-123");
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required("cart_id", Some("  abc ")).unwrap(), "abc");
        assert!(matches!(
            required("cart_id", Some("   ")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(required("cart_id", None), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("quantity", "3").unwrap(), 3);
        assert!(parse_quantity("quantity", "0").is_err());
        assert!(parse_quantity("quantity", "-1").is_err());
        assert!(parse_quantity("quantity", "two").is_err());
    }
}
