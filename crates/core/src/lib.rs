//! Shopgate Core - Shared types library.
//!
//! This crate provides the records that cross the Shopgate boundary:
//! - typed numeric ids for Admin API resources
//! - opaque Storefront handles (cart, cart line, merchandise)
//! - read-only projections of remote resources (products, orders, ...)
//! - outbound payloads (draft orders, new orders)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Nothing here
//! is owned state: every value is either supplied by a caller or decoded from
//! a Shopify response.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, handles, resource records, and payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
