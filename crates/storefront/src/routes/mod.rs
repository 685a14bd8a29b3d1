//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Health check
//! GET    /checkout                      - Redirect to Shopify checkout
//!
//! # Cart (session-backed)
//! GET    /api/cart                      - Current cart
//! DELETE /api/cart                      - Remove every line
//! POST   /api/cart/lines                - Add line {variantId, quantity}
//! PATCH  /api/cart/lines/{line_id}      - Set quantity {quantity}
//! DELETE /api/cart/lines/{line_id}      - Remove line
//!
//! # Catalog (Shopify, cached)
//! GET    /api/products                  - Product page (?first&after)
//! GET    /api/products/{handle}         - Product detail
//! GET    /api/collections               - Collection page (?first&after)
//! GET    /api/collections/{handle}      - Collection with products
//! GET    /api/shop                      - Shop info
//!
//! # Content (Sanity)
//! GET    /api/content/{document}        - ?locale&slug&category&page&limit
//!
//! # View state
//! GET    /api/view                      - Panel visibility
//! POST   /api/view/{panel}/{action}     - open|close|toggle cart|menu|newsletter
//!
//! # Newsletter
//! POST   /api/newsletter                - Subscribe {email}
//! ```

pub mod cart;
pub mod collections;
pub mod content;
pub mod newsletter;
pub mod products;
pub mod view;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::middleware::{api_rate_limiter, newsletter_rate_limiter};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/lines", post(cart::add_line))
        .route(
            "/lines/{line_id}",
            patch(cart::update_line).delete(cart::remove_line),
        )
}

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{handle}", get(products::show))
        .route("/collections", get(collections::index))
        .route("/collections/{handle}", get(collections::show))
        .route("/shop", get(products::shop))
}

/// Create the view state routes router.
pub fn view_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(view::show))
        .route("/{panel}/{action}", post(view::update))
}

/// Create the newsletter routes router.
pub fn newsletter_routes() -> Router<AppState> {
    Router::new().route(
        "/newsletter",
        post(newsletter::subscribe).fallback(newsletter::method_not_allowed),
    )
}

/// Create the JSON API router, rate limited per client.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/cart", cart_routes())
        .nest("/view", view_routes())
        .merge(catalog_routes())
        .route("/content/{document}", get(content::show))
        .layer(api_rate_limiter())
        .merge(newsletter_routes().layer(newsletter_rate_limiter()))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/checkout", get(cart::checkout))
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}
