//! Integration tests for the Marquee storefront.
//!
//! Every test runs against [`wiremock`] stand-ins for Shopify, Sanity and
//! Mailchimp, so no credentials or network access are needed.
//!
//! ```bash
//! cargo test -p marquee-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Cart state holder against a mocked Storefront API
//! - `content_fetchers` - GROQ fetchers against a mocked Sanity API
//! - `http_api` - Router-level tests for newsletter, view and content routes
//!
//! This module holds the shared fixtures.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use marquee_storefront::config::{
    MailchimpConfig, SanityConfig, ShopifyStorefrontConfig, StorefrontConfig,
};
use marquee_storefront::sanity::SanityClient;
use marquee_storefront::services::MailchimpClient;
use marquee_storefront::shopify::StorefrontClient;
use marquee_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockBuilder, MockServer};

/// Storefront API version used by the fixtures.
pub const SHOPIFY_API_VERSION: &str = "2025-07";

/// Sanity API version used by the fixtures.
pub const SANITY_API_VERSION: &str = "2025-07-23";

/// Dataset queried by the fixtures.
pub const SANITY_DATASET: &str = "production";

/// Mailchimp audience used by the fixtures.
pub const AUDIENCE_ID: &str = "aud123";

const TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// Clients
// ============================================================================

/// Path of the Storefront GraphQL endpoint on the mock server.
#[must_use]
pub fn shopify_graphql_path() -> String {
    format!("/api/{SHOPIFY_API_VERSION}/graphql.json")
}

/// Storefront client pointed at `server`.
#[must_use]
pub fn storefront_client(server: &MockServer) -> StorefrontClient {
    StorefrontClient::with_endpoint(
        format!("{}{}", server.uri(), shopify_graphql_path()),
        SecretString::from("storefront-token"),
        TIMEOUT,
    )
    .unwrap()
}

/// Path of the Sanity query endpoint on the mock server.
#[must_use]
pub fn sanity_query_path() -> String {
    format!("/v{SANITY_API_VERSION}/data/query/{SANITY_DATASET}")
}

/// Sanity client pointed at `server`.
#[must_use]
pub fn sanity_client(server: &MockServer) -> SanityClient {
    SanityClient::with_base_url(
        &format!("{}/v{SANITY_API_VERSION}", server.uri()),
        SANITY_DATASET,
        None,
        TIMEOUT,
    )
    .unwrap()
}

/// Path of the audience members endpoint on the mock server.
#[must_use]
pub fn mailchimp_members_path() -> String {
    format!("/3.0/lists/{AUDIENCE_ID}/members")
}

#[must_use]
pub fn mailchimp_config() -> MailchimpConfig {
    MailchimpConfig {
        api_key: SecretString::from("key-us21"),
        audience_id: AUDIENCE_ID.to_string(),
    }
}

/// Mailchimp client pointed at `server`.
#[must_use]
pub fn mailchimp_client(server: &MockServer) -> MailchimpClient {
    MailchimpClient::with_base_url(
        &mailchimp_config(),
        &format!("{}/3.0", server.uri()),
        TIMEOUT,
    )
    .unwrap()
}

// ============================================================================
// Application state
// ============================================================================

/// Configuration with placeholder credentials. Clients are built separately
/// so they can point at mock servers.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        shopify: ShopifyStorefrontConfig {
            store_domain: "marquee-test.myshopify.com".to_string(),
            api_version: SHOPIFY_API_VERSION.to_string(),
            access_token: SecretString::from("storefront-token"),
        },
        sanity: SanityConfig {
            project_id: "test".to_string(),
            dataset: SANITY_DATASET.to_string(),
            api_version: SANITY_API_VERSION.to_string(),
            use_cdn: false,
            token: None,
        },
        mailchimp: None,
        http_timeout: TIMEOUT,
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Application state whose clients all talk to `server`.
///
/// With `with_mailchimp` false the newsletter relay is unconfigured.
#[must_use]
pub fn test_state(server: &MockServer, with_mailchimp: bool) -> AppState {
    AppState::from_parts(
        test_config(),
        storefront_client(server),
        sanity_client(server),
        with_mailchimp.then(|| mailchimp_client(server)),
    )
}

// ============================================================================
// Shopify fixtures
// ============================================================================

/// Mock matching one Storefront GraphQL operation by name.
#[must_use]
pub fn shopify_operation(operation: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(shopify_graphql_path()))
        .and(body_partial_json(json!({ "operationName": operation })))
}

#[must_use]
pub fn money(amount: &str) -> Value {
    json!({ "amount": amount, "currencyCode": "EUR" })
}

/// Cart node with one line per `(line_id, quantity)`, each priced 25.00.
#[must_use]
pub fn cart_node(cart_id: &str, lines: &[(&str, i64)]) -> Value {
    let total_quantity: i64 = lines.iter().map(|(_, quantity)| quantity).sum();
    let subtotal = format!("{}.00", total_quantity * 25);
    let edges: Vec<Value> = lines
        .iter()
        .map(|(line_id, quantity)| {
            json!({
                "node": {
                    "id": line_id,
                    "quantity": quantity,
                    "cost": { "subtotalAmount": money(&format!("{}.00", quantity * 25)) },
                    "merchandise": {
                        "id": "gid://shopify/ProductVariant/4242",
                        "title": "Default Title",
                        "sku": "LP-001",
                        "price": money("25.00"),
                        "product": {
                            "id": "gid://shopify/Product/7",
                            "title": "Kind of Blue",
                            "handle": "kind-of-blue-lp",
                            "images": { "edges": [] }
                        }
                    }
                }
            })
        })
        .collect();

    json!({
        "id": cart_id,
        "checkoutUrl": format!("https://marquee-test.myshopify.com/cart/c/{}", cart_id.len()),
        "totalQuantity": total_quantity,
        "cost": {
            "subtotalAmount": money(&subtotal),
            "totalAmount": money(&subtotal),
            "totalTaxAmount": null
        },
        "lines": { "edges": edges }
    })
}

/// GraphQL response for a cart mutation returning `cart`.
#[must_use]
pub fn cart_mutation_response(field: &str, cart: Value) -> Value {
    json!({ "data": { field: { "cart": cart, "userErrors": [] } } })
}

/// GraphQL response for a cart mutation refused with one user error.
#[must_use]
pub fn cart_user_error_response(field: &str, message: &str) -> Value {
    json!({
        "data": {
            field: {
                "cart": null,
                "userErrors": [{ "field": ["lines", "0", "quantity"], "message": message }]
            }
        }
    })
}

/// GraphQL response for the `cart(id:)` query.
#[must_use]
pub fn cart_query_response(cart: Option<Value>) -> Value {
    json!({ "data": { "cart": cart } })
}

// ============================================================================
// Sanity fixtures
// ============================================================================

/// Mock matching any Sanity query.
#[must_use]
pub fn sanity_query() -> MockBuilder {
    Mock::given(method("GET")).and(path(sanity_query_path()))
}

/// Sanity response envelope around `result`.
#[must_use]
pub fn sanity_result(result: Value) -> Value {
    json!({ "query": "*", "ms": 3, "result": result })
}
