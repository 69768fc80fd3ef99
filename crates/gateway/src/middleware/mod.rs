//! HTTP middleware for the gateway.
//!
//! - `request_id` - Correlation id for logs, Sentry, and the response

pub mod request_id;

pub use request_id::request_id_middleware;
