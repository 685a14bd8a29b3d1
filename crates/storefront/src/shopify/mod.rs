//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Implements `graphql_client::GraphQLQuery` for each operation so requests
//!   and responses stay typed end to end
//! - Shopify is source of truth: carts are never edited locally, every cart
//!   returned here is exactly what the API sent back
//! - In-memory caching via `moka` for catalog responses (5 minute TTL); cart
//!   operations are never cached
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_storefront::shopify::{CartLineInput, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify, timeout)?;
//!
//! let product = client.get_product_by_handle("blue-train-lp").await?;
//! let cart = client
//!     .create_cart(vec![CartLineInput::new(product.variants[0].id.clone(), 1)])
//!     .await?;
//! ```

mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when interacting with Shopify APIs.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The mutation was rejected with user errors. Carries the first one.
    #[error("{message}")]
    Rejected {
        /// Message of the first user error.
        message: String,
        /// Input field path the error refers to, if any.
        field: Option<Vec<String>>,
    },
}

impl ShopifyError {
    /// Whether the request never produced a usable answer (network, HTTP,
    /// parse, GraphQL or rate-limit failure).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::GraphQL(_) | Self::Parse(_) | Self::RateLimited(_)
        )
    }

    /// Build a rejection from the first user error of a mutation payload.
    pub(crate) fn rejected(errors: Vec<CartUserError>) -> Option<Self> {
        errors.into_iter().next().map(|e| Self::Rejected {
            message: e.message,
            field: e.field,
        })
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

impl GraphQLError {
    /// Error with only a message, used for failures detected client side.
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }
    }
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
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
