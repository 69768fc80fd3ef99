//! Integration test harness for Shopgate.
//!
//! Starts an in-process stand-in for the Shopify Admin and Storefront APIs
//! on a loopback port and points a [`GatewayConfig`] at it, so the real
//! reqwest transport is exercised end to end without network access.
//!
//! ```bash
//! cargo test -p shopgate-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::expect_used)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
};
use shopgate::config::GatewayConfig;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// API version the fake store answers under.
pub const API_VERSION: &str = "2024-01";

/// `Basic` credentials for the test api key and secret.
pub const EXPECTED_BASIC_AUTH: &str = "Basic NGYxYzJhOWI3ZTpzaHBzc184ZDFlMGM3YjZhNWY=";

/// Storefront token the fake store expects.
pub const STOREFRONT_TOKEN: &str = "b3c4d5e6f7a8";

/// A request as the fake store received it.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub storefront_token: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl SeenRequest {
    /// The body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is not JSON")
    }
}

type Seen = Arc<Mutex<Vec<SeenRequest>>>;

/// Loopback stand-in for a Shopify store.
pub struct FakeShopify {
    addr: SocketAddr,
    seen: Seen,
    server: JoinHandle<()>,
}

impl FakeShopify {
    /// Serve `routes` on an ephemeral port, recording every request.
    pub async fn start(routes: Router) -> Self {
        let seen = Seen::default();
        let app = routes.layer(middleware::from_fn_with_state(seen.clone(), record));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, seen, server }
    }

    /// Path of an Admin REST resource, e.g. `admin_path("products.json")`.
    pub fn admin_path(resource: &str) -> String {
        format!("/admin/api/{API_VERSION}/{resource}")
    }

    /// Path of the Storefront GraphQL endpoint.
    pub fn storefront_path() -> String {
        format!("/api/{API_VERSION}/graphql.json")
    }

    /// Gateway configuration pointed at this store, with `overrides` applied.
    pub fn config(&self, overrides: &[(&str, &str)]) -> GatewayConfig {
        let mut vars: HashMap<String, String> = [
            ("SHOPIFY_SHOP_NAME", "acme-outfitters"),
            ("SHOPIFY_API_VERSION", API_VERSION),
            ("SHOPIFY_API_KEY", "4f1c2a9b7e"),
            ("SHOPIFY_API_SECRET", "shpss_8d1e0c7b6a5f"),
            ("SHOPIFY_STOREFRONT_ACCESS_TOKEN", STOREFRONT_TOKEN),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        vars.insert(
            "SHOPIFY_ADMIN_ORIGIN".to_string(),
            format!("http://{}/", self.addr),
        );
        vars.insert(
            "SHOPIFY_STOREFRONT_URL".to_string(),
            format!("http://{}{}", self.addr, Self::storefront_path()),
        );
        for (key, value) in overrides {
            vars.insert((*key).to_string(), (*value).to_string());
        }

        GatewayConfig::from_lookup(&|key| vars.get(key).cloned()).unwrap()
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<SeenRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Drop for FakeShopify {
    fn drop(&mut self) {
        self.server.abort();
    }
}

async fn record(State(seen): State<Seen>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let header = |name: &str| {
        parts
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    seen.lock().unwrap().push(SeenRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_string(),
        authorization: header("authorization"),
        storefront_token: header("x-shopify-storefront-access-token"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&bytes).into_owned(),
    });

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Serve `router` (the gateway itself) on an ephemeral port and return its base URL.
pub async fn serve_gateway(router: Router) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (format!("http://{addr}"), handle)
}
