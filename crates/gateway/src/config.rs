//! Gateway configuration loaded from environment variables.
//!
//! Configuration is read once at startup into an immutable [`GatewayConfig`]
//! and passed by reference to whatever needs it. Any problem is fatal at
//! startup; nothing is re-read per request.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_SHOP_NAME` - Shop subdomain (the `{shop}` in `{shop}.myshopify.com`)
//! - `SHOPIFY_API_VERSION` - Admin/Storefront API version (e.g., 2024-01)
//! - `SHOPIFY_API_KEY` - Admin API key (basic auth username)
//! - `SHOPIFY_API_SECRET` - Admin API secret/password (basic auth password)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API access token
//!
//! ## Optional
//! - `SHOPIFY_ADMIN_ORIGIN` - Admin API origin (default: `https://{shop}.myshopify.com`)
//! - `SHOPIFY_STOREFRONT_URL` - Storefront GraphQL endpoint
//!   (default: `https://{shop}.myshopify.com/api/{version}/graphql.json`)
//! - `SHOPIFY_TIMEOUT_SECS` - Outbound request timeout (default: 10)
//! - `SHOPIFY_DELETE_SUCCESS_STATUSES` - Comma-separated statuses accepted for
//!   deletes (default: 200)
//! - `CART_LINE_DEFAULT_QUANTITY` - Quantity used when adding a cart line
//!   without an explicit quantity (default: 2)
//! - `GATEWAY_HOST` - Bind address (default: 127.0.0.1)
//! - `GATEWAY_PORT` - Listen port (default: 9090)
//! - `SMTP_HOST`, `SMTP_PORT` (default 587), `SMTP_USERNAME`, `SMTP_PASSWORD`,
//!   `SMTP_FROM` - Order confirmation email; enabled when `SMTP_HOST` is set
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for JSON logs (default: human-readable)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CART_LINE_QUANTITY: u32 = 2;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "xxx",
    "todo",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Environment variable {0} must not be empty")]
    EmptyEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Gateway application configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Shopify endpoints, credentials, and call policy
    pub shopify: ShopifyConfig,
    /// SMTP settings for order confirmation; `None` disables email
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Log output format
    pub log_format: LogFormat,
}

/// Shop identity and API secrets.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct StoreCredentials {
    /// Shop subdomain (e.g., `my-shop` for my-shop.myshopify.com)
    pub shop_name: String,
    /// API version (e.g., 2024-01)
    pub api_version: String,
    /// Admin API key
    pub api_key: String,
    /// Admin API secret/password
    pub api_secret: SecretString,
    /// Storefront API access token
    pub storefront_access_token: SecretString,
}

impl std::fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("shop_name", &self.shop_name)
            .field("api_version", &self.api_version)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("storefront_access_token", &"[REDACTED]")
            .finish()
    }
}

/// Shopify API configuration.
#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    pub credentials: StoreCredentials,
    /// Origin the Admin REST paths are joined onto
    pub admin_origin: Url,
    /// Storefront GraphQL endpoint
    pub storefront_url: Url,
    /// Timeout applied to every outbound call
    pub timeout: Duration,
    /// Statuses that count as a successful delete
    pub delete_success_statuses: Vec<u16>,
    /// Quantity used when a cart-line add does not name one
    pub cart_line_default_quantity: u32,
}

/// SMTP configuration for order confirmation email.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or empty, if a
    /// value fails to parse, or if a secret looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`GatewayConfig::from_env`].
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Env(lookup);

        let host = env
            .get_or_default("GATEWAY_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("GATEWAY_HOST".to_string(), e.to_string()))?;
        let port = env
            .get_or_default("GATEWAY_PORT", "9090")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("GATEWAY_PORT".to_string(), e.to_string()))?;

        let log_format = match env.optional("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            None | Some("pretty" | "") => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::InvalidEnvVar(
                    "LOG_FORMAT".to_string(),
                    format!("expected 'json' or 'pretty', got '{other}'"),
                ));
            }
        };

        Ok(Self {
            host,
            port,
            shopify: ShopifyConfig::load(&env)?,
            email: EmailConfig::load(&env)?,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            log_format,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyConfig {
    fn load(env: &Env<'_>) -> Result<Self, ConfigError> {
        let credentials = StoreCredentials {
            shop_name: env.required("SHOPIFY_SHOP_NAME")?,
            api_version: env.required("SHOPIFY_API_VERSION")?,
            api_key: env.required("SHOPIFY_API_KEY")?,
            api_secret: env.secret("SHOPIFY_API_SECRET")?,
            storefront_access_token: env.secret("SHOPIFY_STOREFRONT_ACCESS_TOKEN")?,
        };

        let admin_origin = env.url(
            "SHOPIFY_ADMIN_ORIGIN",
            &format!("https://{}.myshopify.com", credentials.shop_name),
        )?;
        let storefront_url = env.url(
            "SHOPIFY_STOREFRONT_URL",
            &format!(
                "https://{}.myshopify.com/api/{}/graphql.json",
                credentials.shop_name, credentials.api_version
            ),
        )?;

        let timeout_secs = env.positive::<u64>("SHOPIFY_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let cart_line_default_quantity =
            env.positive::<u32>("CART_LINE_DEFAULT_QUANTITY", DEFAULT_CART_LINE_QUANTITY)?;
        let delete_success_statuses = parse_status_list(
            "SHOPIFY_DELETE_SUCCESS_STATUSES",
            &env.get_or_default("SHOPIFY_DELETE_SUCCESS_STATUSES", "200"),
        )?;

        Ok(Self {
            credentials,
            admin_origin,
            storefront_url,
            timeout: Duration::from_secs(timeout_secs),
            delete_success_statuses,
            cart_line_default_quantity,
        })
    }
}

impl EmailConfig {
    fn load(env: &Env<'_>) -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = env.optional("SMTP_HOST").filter(|h| !h.trim().is_empty()) else {
            return Ok(None);
        };

        let smtp_port = env
            .get_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username: env.required("SMTP_USERNAME")?,
            smtp_password: SecretString::from(env.required("SMTP_PASSWORD")?),
            from_address: env.required("SMTP_FROM")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the validation rules shared by every section.
struct Env<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Env<'_> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a variable with a default value.
    fn get_or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a required, non-empty variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        let value = self
            .optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))?;
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyEnvVar(key.to_string()));
        }
        Ok(value)
    }

    /// Get a required secret that is not a placeholder.
    fn secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = SecretString::from(self.required(key)?);
        reject_placeholder(&value, key)?;
        Ok(value)
    }

    /// Get a URL, falling back to `default` when unset.
    fn url(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        let raw = self.get_or_default(key, default);
        Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Get a strictly positive integer, falling back to `default` when unset.
    fn positive<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr + PartialOrd + Default + Copy,
        T::Err: std::fmt::Display,
    {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        let value = raw
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if value <= T::default() {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                "must be greater than zero".to_string(),
            ));
        }
        Ok(value)
    }
}

/// Parse a comma-separated list of HTTP status codes.
fn parse_status_list(key: &str, raw: &str) -> Result<Vec<u16>, ConfigError> {
    let statuses = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u16>()
                .ok()
                .filter(|code| (100..=599).contains(code))
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(key.to_string(), format!("'{s}' is not an HTTP status"))
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if statuses.is_empty() {
        return Err(ConfigError::EmptyEnvVar(key.to_string()));
    }
    Ok(statuses)
}

/// Reject secrets that look like copied-over sample values.
fn reject_placeholder(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.expose_secret().to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}
