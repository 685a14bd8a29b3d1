//! Marquee Storefront library.
//!
//! Headless storefront backend: a Shopify cart state holder with a pluggable
//! persistence bridge, cached Shopify catalog queries, Sanity content
//! fetchers, and a Mailchimp newsletter relay, served as a JSON API.
//!
//! The binary in `main.rs` wires tracing, Sentry and the listener around
//! [`app`]; everything else lives here so it can be tested and reused by the
//! CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod content;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod sanity;
pub mod services;
pub mod shopify;
pub mod state;
pub mod view;

use axum::Router;

use crate::state::AppState;

/// Build the application router with its session and request-ID layers.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .merge(routes::routes())
        .layer(session_layer)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
