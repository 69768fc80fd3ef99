//! Shopgate - commerce gateway relaying form submissions to Shopify.
//!
//! This crate provides the gateway as a library so the router can be driven
//! from tests and reused by the binary.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
