//! Shared client state and the request/response plumbing every operation
//! goes through.

use std::sync::Arc;

use reqwest::Method;
use secrecy::SecretString;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::config::GatewayConfig;

use super::transport::{HttpTransport, OutboundRequest, RawResponse, RequestAuth, Transport};
use super::{Operation, ShopifyError, truncate_body};

/// Client for the Shopify Admin REST and Storefront GraphQL APIs.
///
/// Cheap to clone; all clones share one transport and its connection pool.
/// Holds no mutable state.
pub struct GatewayClient<T: Transport = HttpTransport> {
    pub(super) inner: Arc<GatewayClientInner<T>>,
}

impl<T: Transport> Clone for GatewayClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

pub(super) struct GatewayClientInner<T> {
    pub(super) transport: T,
    /// `{admin_origin}/admin/api/{version}/`
    pub(super) admin_base: Url,
    pub(super) storefront_url: Url,
    pub(super) api_key: String,
    pub(super) api_secret: SecretString,
    pub(super) storefront_token: SecretString,
    pub(super) delete_success_statuses: Vec<u16>,
}

impl GatewayClient<HttpTransport> {
    /// Create a client backed by a pooled HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Client` if the HTTP client cannot be built, or
    /// `ShopifyError::Url` if the admin endpoint cannot be formed.
    pub fn new(config: &GatewayConfig) -> Result<Self, ShopifyError> {
        let transport = HttpTransport::new(config.shopify.timeout).map_err(ShopifyError::Client)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> GatewayClient<T> {
    /// Create a client over an arbitrary transport.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::Url` if the admin endpoint cannot be formed.
    pub fn with_transport(config: &GatewayConfig, transport: T) -> Result<Self, ShopifyError> {
        let shopify = &config.shopify;
        let admin_base = shopify
            .admin_origin
            .join(&format!("admin/api/{}/", shopify.credentials.api_version))?;

        Ok(Self {
            inner: Arc::new(GatewayClientInner {
                transport,
                admin_base,
                storefront_url: shopify.storefront_url.clone(),
                api_key: shopify.credentials.api_key.clone(),
                api_secret: shopify.credentials.api_secret.clone(),
                storefront_token: shopify.credentials.storefront_access_token.clone(),
                delete_success_statuses: shopify.delete_success_statuses.clone(),
            }),
        })
    }

    /// Resolve an Admin REST path (e.g. `draft_orders/5.json`).
    pub(super) fn admin_url(&self, path: &str) -> Result<Url, ShopifyError> {
        Ok(self.inner.admin_base.join(path)?)
    }

    pub(super) fn admin_auth(&self) -> RequestAuth {
        RequestAuth::Basic {
            username: self.inner.api_key.clone(),
            password: self.inner.api_secret.clone(),
        }
    }

    pub(super) fn storefront_auth(&self) -> RequestAuth {
        RequestAuth::StorefrontToken(self.inner.storefront_token.clone())
    }

    /// Send one request and require its status to be in `accepted`.
    ///
    /// Returns the response body on success.
    pub(super) async fn dispatch(
        &self,
        operation: Operation,
        method: Method,
        url: Url,
        auth: RequestAuth,
        body: Option<Vec<u8>>,
        accepted: &[u16],
    ) -> Result<String, ShopifyError> {
        debug!(%operation, %method, %url, "Sending Shopify request");

        let request = OutboundRequest {
            method,
            url,
            auth,
            body,
        };

        let RawResponse { status, body } = self
            .inner
            .transport
            .send(request)
            .await
            .map_err(|source| {
                error!(%operation, error = %source, "Shopify request failed");
                ShopifyError::Transport { operation, source }
            })?;

        if !accepted.contains(&status) {
            let body = truncate_body(&body);
            error!(
                %operation,
                status,
                body = %body,
                "Shopify API returned unexpected status"
            );
            return Err(ShopifyError::Status {
                operation,
                status,
                body,
            });
        }

        Ok(body)
    }
}

/// Serialize `payload` wrapped as `{"<key>": payload}`.
pub(super) fn encode_envelope<P: Serialize>(
    operation: Operation,
    key: &str,
    payload: &P,
) -> Result<Vec<u8>, ShopifyError> {
    let encode = |source| ShopifyError::Encode { operation, source };

    let mut envelope = serde_json::Map::new();
    envelope.insert(key.to_string(), serde_json::to_value(payload).map_err(encode)?);
    serde_json::to_vec(&serde_json::Value::Object(envelope)).map_err(encode)
}

/// Decode the field under `key` of a JSON object body.
///
/// Returns `None` when the key is absent or `null`.
pub(super) fn decode_envelope<R: DeserializeOwned>(
    operation: Operation,
    body: &str,
    key: &'static str,
) -> Result<Option<R>, ShopifyError> {
    let decode = |source| ShopifyError::Decode { operation, source };

    let mut value: serde_json::Value = serde_json::from_str(body).map_err(decode)?;
    match value.get_mut(key).map(serde_json::Value::take) {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(field) => serde_json::from_value(field).map(Some).map_err(decode),
    }
}
