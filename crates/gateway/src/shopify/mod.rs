//! Commerce gateway client for the Shopify Admin REST and Storefront GraphQL
//! APIs.
//!
//! # Architecture
//!
//! - Shopify is source of truth - NO local sync, NO caching, direct API calls
//! - Every operation performs exactly one outbound call; nothing is retried
//! - Outbound calls go through the [`Transport`] seam so tests can record them
//!
//! # APIs
//!
//! ## Admin REST API
//! - Products, orders, customers, checkouts, price rules, discount codes
//! - Draft orders (create, list, delete) and direct order creation
//! - HTTP basic auth with the API key and secret
//!
//! ## Storefront API
//! - Cart lookup and cart-line add/remove mutations
//! - `X-Shopify-Storefront-Access-Token` header
//!
//! # Example
//!
//! ```rust,ignore
//! use shopgate::shopify::GatewayClient;
//!
//! let client = GatewayClient::new(&config)?;
//!
//! let products = client.fetch_products().await?;
//! let cart = client.add_cart_line(&cart_id, &merchandise_id, 1).await?;
//! ```

mod admin;
mod client;
mod storefront;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use admin::AdminResource;
pub use client::GatewayClient;
pub use transport::{
    HttpTransport, OutboundRequest, RawResponse, RequestAuth, Transport, TransportError,
};

use std::fmt;

use serde::Deserialize;
use thiserror::Error;

/// Maximum number of body characters kept in a status error.
pub(crate) const ERROR_BODY_LIMIT: usize = 500;

/// A named gateway operation, carried by every [`ShopifyError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateDraftOrder,
    FetchDraftOrders,
    RemoveDraftOrder,
    FetchProducts,
    FetchOrders,
    FetchCustomers,
    FetchCheckouts,
    FetchPriceRules,
    FetchDiscountCodes,
    CreateOrder,
    FetchCart,
    RemoveCartLine,
    AddCartLine,
}

impl Operation {
    /// Kebab-case name used in logs and error text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateDraftOrder => "create-draft-order",
            Self::FetchDraftOrders => "fetch-draft-orders",
            Self::RemoveDraftOrder => "remove-draft-order",
            Self::FetchProducts => "fetch-products",
            Self::FetchOrders => "fetch-orders",
            Self::FetchCustomers => "fetch-customers",
            Self::FetchCheckouts => "fetch-checkouts",
            Self::FetchPriceRules => "fetch-price-rules",
            Self::FetchDiscountCodes => "fetch-discount-codes",
            Self::CreateOrder => "create-order",
            Self::FetchCart => "fetch-cart",
            Self::RemoveCartLine => "remove-cart-line",
            Self::AddCartLine => "add-cart-line",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// The outbound HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] TransportError),

    /// The request never produced a response (connect, timeout, TLS).
    #[error("{operation} failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: TransportError,
    },

    /// Shopify answered with a status the operation does not accept.
    #[error("{operation} returned HTTP {status}: {body}")]
    Status {
        operation: Operation,
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("{operation} returned an undecodable response: {source}")]
    Decode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// The outbound payload could not be serialized.
    #[error("{operation} could not encode its request: {source}")]
    Encode {
        operation: Operation,
        #[source]
        source: serde_json::Error,
    },

    /// A required key was absent from the response.
    #[error("{operation} response is missing `{key}`")]
    MissingField {
        operation: Operation,
        key: &'static str,
    },

    /// GraphQL query returned errors.
    #[error("{operation} GraphQL errors: {}", format_graphql_errors(.errors))]
    GraphQL {
        operation: Operation,
        errors: Vec<GraphQLError>,
    },

    /// Mutation rejected its input.
    #[error("{operation} rejected: {}", format_user_errors(.errors))]
    UserErrors {
        operation: Operation,
        errors: Vec<UserError>,
    },

    /// An endpoint URL could not be built.
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ShopifyError {
    /// The operation that failed, if the error belongs to one.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Transport { operation, .. }
            | Self::Status { operation, .. }
            | Self::Decode { operation, .. }
            | Self::Encode { operation, .. }
            | Self::MissingField { operation, .. }
            | Self::GraphQL { operation, .. }
            | Self::UserErrors { operation, .. } => Some(*operation),
            Self::Client(_) | Self::Url(_) => None,
        }
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

impl From<graphql_client::Error> for GraphQLError {
    fn from(e: graphql_client::Error) -> Self {
        Self {
            message: e.message,
            locations: e.locations.map_or_else(Vec::new, |locs| {
                locs.into_iter()
                    .map(|l| GraphQLErrorLocation {
                        line: i64::from(l.line),
                        column: i64::from(l.column),
                    })
                    .collect()
            }),
            path: e.path.map_or_else(Vec::new, |p| {
                p.into_iter()
                    .map(|fragment| match fragment {
                        graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                        graphql_client::PathFragment::Index(i) => {
                            serde_json::Value::Number(i.into())
                        }
                    })
                    .collect()
            }),
        }
    }
}

/// A `userErrors` entry from a cart mutation payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    /// Path to the offending input field.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(|e| match e.field.as_deref() {
            Some(field) if !field.is_empty() => format!("{} ({})", e.message, field.join(".")),
            _ => e.message.clone(),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Keep at most [`ERROR_BODY_LIMIT`] characters of a response body.
pub(crate) fn truncate_body(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
