//! The outbound HTTP seam.
//!
//! [`GatewayClient`](super::GatewayClient) builds fully-described
//! [`OutboundRequest`]s and hands them to a [`Transport`]. The production
//! implementation is [`HttpTransport`] over a pooled `reqwest::Client`.

use std::future::Future;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

/// Header carrying the Storefront API access token.
pub const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Failure to obtain any response from the remote platform.
#[derive(Debug, Error)]
pub enum TransportError {
    /// reqwest failed (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The connection failed outside of reqwest.
    #[error("connection error: {0}")]
    Connection(String),
}

/// Credentials attached to an outbound request.
#[derive(Clone)]
pub enum RequestAuth {
    /// Admin API basic auth (API key and secret).
    Basic {
        username: String,
        password: SecretString,
    },
    /// Storefront API access token header.
    StorefrontToken(SecretString),
}

impl std::fmt::Debug for RequestAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"[REDACTED]")
                .finish(),
            Self::StorefrontToken(_) => f.debug_tuple("StorefrontToken").field(&"[REDACTED]").finish(),
        }
    }
}

/// A fully-built outbound call.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub auth: RequestAuth,
    /// JSON body, sent with `Content-Type: application/json`.
    pub body: Option<Vec<u8>>,
}

/// Status and body of a completed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Performs one outbound HTTP call.
///
/// Implementations must not retry; one `send` is one request on the wire.
pub trait Transport: Send + Sync + 'static {
    /// Send the request and return whatever status and body came back.
    ///
    /// # Errors
    ///
    /// Returns `TransportError` if no response was received.
    fn send(
        &self,
        request: OutboundRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// [`Transport`] over a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a transport whose every call is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::Http` if the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("shopgate/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut builder = self.client.request(request.method, request.url);

        builder = match &request.auth {
            RequestAuth::Basic { username, password } => {
                builder.basic_auth(username, Some(password.expose_secret()))
            }
            RequestAuth::StorefrontToken(token) => {
                builder.header(STOREFRONT_TOKEN_HEADER, token.expose_secret())
            }
        };

        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_debug_redacts_secrets() {
        let basic = RequestAuth::Basic {
            username: "api-key".to_string(),
            password: SecretString::from("hunter2-secret"),
        };
        let token = RequestAuth::StorefrontToken(SecretString::from("sf-token-value"));

        let rendered = format!("{basic:?} {token:?}");
        assert!(rendered.contains("api-key"));
        assert!(!rendered.contains("hunter2-secret"));
        assert!(!rendered.contains("sf-token-value"));
    }

    #[test]
    fn test_http_transport_builds_with_timeout() {
        assert!(HttpTransport::new(Duration::from_secs(10)).is_ok());
    }
}
