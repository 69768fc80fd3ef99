//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`.

use axum::{
    Json,
    extract::rejection::{FormRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::shopify::ShopifyError;

/// Application-level error type for the gateway.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request from client; no remote call was made.
    #[error("{0}")]
    BadRequest(String),

    /// Shopify API operation failed.
    #[error("{source}")]
    Shopify {
        /// Response key the handler would have filled on success.
        key: &'static str,
        #[source]
        source: ShopifyError,
    },
}

impl AppError {
    /// Wrap a gateway failure for a handler whose success body uses `key`.
    pub fn shopify(key: &'static str) -> impl FnOnce(ShopifyError) -> Self {
        move |source| Self::Shopify { key, source }
    }

    /// A missing or blank required parameter.
    pub fn missing(name: &str) -> Self {
        Self::BadRequest(format!("Missing required parameter: {name}"))
    }

    /// A parameter that is present but malformed.
    pub fn invalid(name: &str, reason: impl std::fmt::Display) -> Self {
        Self::BadRequest(format!("Invalid {name}: {reason}"))
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                tracing::debug!(%message, "Rejected request");
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            Self::Shopify { key, source } => {
                let event_id = sentry::capture_error(&source);
                tracing::error!(
                    error = %source,
                    operation = ?source.operation(),
                    sentry_event_id = %event_id,
                    "Request error"
                );

                let mut body = Map::new();
                body.insert(key.to_string(), Value::Null);
                body.insert("message".to_string(), Value::String(format!("Error: {source}")));
                (StatusCode::INTERNAL_SERVER_ERROR, Json(Value::Object(body))).into_response()
            }
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for a gateway action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of calls
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Adding cart line", Some(&[("cart_id", cart_id.as_str())]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
