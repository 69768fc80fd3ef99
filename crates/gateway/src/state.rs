//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::services::{EmailError, OrderNotifier};
use crate::shopify::{GatewayClient, HttpTransport, ShopifyError, Transport};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("gateway client: {0}")]
    Gateway(#[from] ShopifyError),
    #[error("order notifier: {0}")]
    Email(#[from] EmailError),
}

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Generic over the transport so tests can
/// drive handlers against a recording transport.
pub struct AppState<T: Transport = HttpTransport> {
    inner: Arc<AppStateInner<T>>,
}

impl<T: Transport> Clone for AppState<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct AppStateInner<T: Transport> {
    config: GatewayConfig,
    gateway: GatewayClient<T>,
    notifier: Option<OrderNotifier>,
}

impl AppState {
    /// Create application state with the HTTP transport.
    ///
    /// The order notifier is built only when SMTP is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway client or notifier cannot be built.
    pub fn new(config: GatewayConfig) -> Result<Self, StateError> {
        let gateway = GatewayClient::new(&config)?;
        let notifier = config.email.as_ref().map(OrderNotifier::new).transpose()?;

        Ok(Self::with_gateway(config, gateway, notifier))
    }
}

impl<T: Transport> AppState<T> {
    /// Assemble state from already-built parts.
    #[must_use]
    pub fn with_gateway(
        config: GatewayConfig,
        gateway: GatewayClient<T>,
        notifier: Option<OrderNotifier>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                gateway,
                notifier,
            }),
        }
    }

    /// Get a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify gateway client.
    #[must_use]
    pub fn gateway(&self) -> &GatewayClient<T> {
        &self.inner.gateway
    }

    /// The order confirmation notifier, if SMTP is configured.
    #[must_use]
    pub fn notifier(&self) -> Option<&OrderNotifier> {
        self.inner.notifier.as_ref()
    }
}
