//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SANITY_PROJECT_ID` - Sanity project the content lives in
//!
//! ## Required for commerce (missing values are logged, not fatal)
//! - `SHOPIFY_STORE_DOMAIN` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_ACCESS_TOKEN` - Storefront API public access token
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL (default: <http://localhost:3000>)
//! - `SHOPIFY_STOREFRONT_API_VERSION` - API version (default: 2024-01)
//! - `SANITY_DATASET` - Dataset name (default: production)
//! - `SANITY_API_VERSION` - Query API version (default: 2025-07-23)
//! - `SANITY_USE_CDN` - Query the API CDN (default: true)
//! - `SANITY_TOKEN` - Read token for private datasets
//! - `MAILCHIMP_API_KEY` - Mailchimp API key (`<key>-<datacenter>`)
//! - `MAILCHIMP_AUDIENCE_ID` - Mailchimp audience (list) ID
//! - `HTTP_TIMEOUT_SECS` - Timeout for outbound requests (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `LOG_FORMAT` - `json` for JSON log lines, anything else for text

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

/// Default Storefront API version.
pub const DEFAULT_SHOPIFY_API_VERSION: &str = "2024-01";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Read `LOG_FORMAT` from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        match get_optional_env("LOG_FORMAT").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// Sanity content API configuration
    pub sanity: SanityConfig,
    /// Mailchimp configuration, absent unless both key and audience are set
    pub mailchimp: Option<MailchimpConfig>,
    /// Timeout applied to every outbound HTTP request
    pub http_timeout: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store_domain: String,
    /// Shopify API version (e.g., 2024-01)
    pub api_version: String,
    /// Storefront API access token
    pub access_token: SecretString,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store_domain", &self.store_domain)
            .field("api_version", &self.api_version)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Sanity content API configuration.
#[derive(Clone)]
pub struct SanityConfig {
    /// Project ID
    pub project_id: String,
    /// Dataset name
    pub dataset: String,
    /// Query API version (date string, without the leading `v`)
    pub api_version: String,
    /// Whether to query the CDN host
    pub use_cdn: bool,
    /// Read token for private datasets
    pub token: Option<SecretString>,
}

impl std::fmt::Debug for SanityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanityConfig")
            .field("project_id", &self.project_id)
            .field("dataset", &self.dataset)
            .field("api_version", &self.api_version)
            .field("use_cdn", &self.use_cdn)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Mailchimp audience configuration.
#[derive(Clone)]
pub struct MailchimpConfig {
    /// API key, suffixed with the datacenter (e.g. `abc123-us21`)
    pub api_key: SecretString,
    /// Audience (list) ID
    pub audience_id: String,
}

impl std::fmt::Debug for MailchimpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailchimpConfig")
            .field("api_key", &"[REDACTED]")
            .field("audience_id", &self.audience_id)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("STOREFRONT_HOST", "127.0.0.1")?;
        let port = parse_env("STOREFRONT_PORT", "3000")?;
        let base_url = get_env_or_default("STOREFRONT_BASE_URL", "http://localhost:3000");

        Ok(Self {
            host,
            port,
            base_url,
            shopify: ShopifyStorefrontConfig::from_env(),
            sanity: SanityConfig::from_env()?,
            mailchimp: MailchimpConfig::from_env(),
            http_timeout: http_timeout_from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl ShopifyStorefrontConfig {
    /// Read the Shopify settings. Missing values become empty strings so the
    /// server can still serve content; see [`Self::missing_fields`].
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            store_domain: get_env_or_default("SHOPIFY_STORE_DOMAIN", ""),
            api_version: get_env_or_default(
                "SHOPIFY_STOREFRONT_API_VERSION",
                DEFAULT_SHOPIFY_API_VERSION,
            ),
            access_token: SecretString::from(get_env_or_default(
                "SHOPIFY_STOREFRONT_ACCESS_TOKEN",
                "",
            )),
        }
    }

    /// Names of the required settings that are empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.store_domain.trim().is_empty() {
            missing.push("SHOPIFY_STORE_DOMAIN");
        }
        if self.access_token.expose_secret().trim().is_empty() {
            missing.push("SHOPIFY_STOREFRONT_ACCESS_TOKEN");
        }
        missing
    }

    /// GraphQL endpoint for this store and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        let version = if self.api_version.is_empty() {
            DEFAULT_SHOPIFY_API_VERSION
        } else {
            &self.api_version
        };
        format!("https://{}/api/{version}/graphql.json", self.store_domain)
    }
}

impl SanityConfig {
    /// Read the Sanity settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `SANITY_PROJECT_ID` is missing or `SANITY_USE_CDN`
    /// is not a boolean.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            project_id: get_required_env("SANITY_PROJECT_ID")?,
            dataset: get_env_or_default("SANITY_DATASET", "production"),
            api_version: get_env_or_default("SANITY_API_VERSION", "2025-07-23"),
            use_cdn: parse_bool("SANITY_USE_CDN", &get_env_or_default("SANITY_USE_CDN", "true"))?,
            token: get_optional_env("SANITY_TOKEN").map(SecretString::from),
        })
    }
}

impl MailchimpConfig {
    fn from_env() -> Option<Self> {
        let api_key = get_optional_env("MAILCHIMP_API_KEY");
        let audience_id = get_optional_env("MAILCHIMP_AUDIENCE_ID");
        match (api_key, audience_id) {
            (Some(api_key), Some(audience_id)) => Some(Self {
                api_key: SecretString::from(api_key),
                audience_id,
            }),
            _ => None,
        }
    }
}

/// Read `HTTP_TIMEOUT_SECS`, defaulting to 30 seconds.
///
/// # Errors
///
/// Returns an error if the value is not a positive integer.
pub fn http_timeout_from_env() -> Result<Duration, ConfigError> {
    let secs: u64 = parse_env("HTTP_TIMEOUT_SECS", "30")?;
    if secs == 0 {
        return Err(ConfigError::InvalidEnvVar(
            "HTTP_TIMEOUT_SECS".to_string(),
            "must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(key.to_string())),
    }
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable with a default value.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shopify(store_domain: &str, token: &str) -> ShopifyStorefrontConfig {
        ShopifyStorefrontConfig {
            store_domain: store_domain.to_string(),
            api_version: DEFAULT_SHOPIFY_API_VERSION.to_string(),
            access_token: SecretString::from(token),
        }
    }

    #[test]
    fn test_shopify_endpoint() {
        let config = shopify("marquee.myshopify.com", "tok");
        assert_eq!(
            config.endpoint(),
            "https://marquee.myshopify.com/api/2024-01/graphql.json"
        );
    }

    #[test]
    fn test_shopify_endpoint_empty_version_uses_default() {
        let mut config = shopify("marquee.myshopify.com", "tok");
        config.api_version = String::new();
        assert!(config.endpoint().contains("/api/2024-01/"));
    }

    #[test]
    fn test_missing_fields() {
        assert!(shopify("a.myshopify.com", "tok").missing_fields().is_empty());
        assert_eq!(
            shopify("", " ").missing_fields(),
            vec!["SHOPIFY_STORE_DOMAIN", "SHOPIFY_STOREFRONT_ACCESS_TOKEN"]
        );
    }

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("X", "true").unwrap());
        assert!(parse_bool("X", "1").unwrap());
        assert!(!parse_bool("X", "False").unwrap());
        assert!(matches!(
            parse_bool("X", "maybe"),
            Err(ConfigError::InvalidEnvVar(_, _))
        ));
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            shopify: shopify("a.myshopify.com", "tok"),
            sanity: SanityConfig {
                project_id: "f7eqgv37".to_string(),
                dataset: "production".to_string(),
                api_version: "2025-07-23".to_string(),
                use_cdn: true,
                token: None,
            },
            mailchimp: None,
            http_timeout: Duration::from_secs(30),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug_output = format!("{:?}", shopify("a.myshopify.com", "super_secret_token"));
        assert!(debug_output.contains("a.myshopify.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token"));

        let mailchimp = MailchimpConfig {
            api_key: SecretString::from("abc123-us21"),
            audience_id: "list1".to_string(),
        };
        let debug_output = format!("{mailchimp:?}");
        assert!(debug_output.contains("list1"));
        assert!(!debug_output.contains("abc123"));
    }
}
