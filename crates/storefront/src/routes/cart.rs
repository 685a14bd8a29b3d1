//! Cart route handlers.
//!
//! Each request builds a [`CartStore`] over the visitor's session: the cart ID
//! is read from the session slot, the cart is loaded from Shopify, and the
//! operation runs against it. Mutations share the application-wide
//! [`MutationGate`](crate::cart::MutationGate), so two overlapping requests on
//! the same cart get a 409 instead of racing.
//!
//! Line IDs are Shopify GIDs and must be percent-encoded in the path.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use marquee_core::{CartLineId, VariantId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use crate::cart::{CartState, CartStore, SessionCartIdStore};
use crate::error::{AppError, Result, add_breadcrumb};
use crate::shopify::StorefrontClient;
use crate::state::AppState;

type SessionCart = CartStore<StorefrontClient, SessionCartIdStore>;

/// Add line request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineRequest {
    /// Variant GID, or its numeric ID.
    pub variant_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

const fn default_quantity() -> i64 {
    1
}

/// Update line request body.
#[derive(Debug, Deserialize)]
pub struct UpdateLineRequest {
    pub quantity: i64,
}

// =============================================================================
// Session Helpers
// =============================================================================

/// State holder for this visitor, initialized from the session.
async fn session_cart(state: &AppState, session: Session) -> Result<SessionCart> {
    let scope = session
        .id()
        .map_or_else(|| Uuid::new_v4().to_string(), |id| id.to_string());

    let store = CartStore::new(
        state.storefront().clone(),
        SessionCartIdStore::new(session),
        state.cart_gate().clone(),
        scope,
    );
    store.initialize().await?;
    Ok(store)
}

fn parse_variant_id(raw: &str) -> Result<VariantId> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::BadRequest("variantId is required".to_string()));
    }
    Ok(raw
        .parse::<u64>()
        .map_or_else(|_| VariantId::new(raw), VariantId::from_numeric))
}

fn cart_response(store: &SessionCart) -> Json<CartState> {
    Json(store.snapshot())
}

// =============================================================================
// Handlers
// =============================================================================

/// Current cart, or `null` when the visitor has none.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartState>> {
    let store = session_cart(&state, session).await?;
    Ok(cart_response(&store))
}

/// Add a variant, creating the cart on first use.
#[instrument(skip(state, session), fields(variant_id = %body.variant_id, quantity = body.quantity))]
pub async fn add_line(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddLineRequest>,
) -> Result<Json<CartState>> {
    if body.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be at least 1".to_string(),
        ));
    }
    let variant_id = parse_variant_id(&body.variant_id)?;

    let store = session_cart(&state, session).await?;
    store.add_line(variant_id.clone(), body.quantity).await?;

    add_breadcrumb("cart", "Added line", Some(&[("variant_id", variant_id.as_str())]));
    Ok(cart_response(&store))
}

/// Set a line's quantity. Zero removes the line.
#[instrument(skip(state, session))]
pub async fn update_line(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
    Json(body): Json<UpdateLineRequest>,
) -> Result<Json<CartState>> {
    if body.quantity < 0 {
        return Err(AppError::BadRequest(
            "quantity must not be negative".to_string(),
        ));
    }

    let store = session_cart(&state, session).await?;
    store
        .update_line(CartLineId::new(line_id), body.quantity)
        .await?;
    Ok(cart_response(&store))
}

#[instrument(skip(state, session))]
pub async fn remove_line(
    State(state): State<AppState>,
    session: Session,
    Path(line_id): Path<String>,
) -> Result<Json<CartState>> {
    let store = session_cart(&state, session).await?;
    store.remove_line(CartLineId::new(line_id)).await?;
    Ok(cart_response(&store))
}

/// Remove every line in one request.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Result<Json<CartState>> {
    let store = session_cart(&state, session).await?;
    store.clear_cart().await?;
    add_breadcrumb("cart", "Cleared cart", None);
    Ok(cart_response(&store))
}

/// Redirect to Shopify checkout, or back to the cart when there is none.
#[instrument(skip(state, session))]
pub async fn checkout(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = session_cart(&state, session).await?;

    let response = match store.checkout_url() {
        Some(url) if !store.cart().is_some_and(|c| c.is_empty()) => {
            Redirect::to(&url).into_response()
        }
        _ => Redirect::to("/api/cart").into_response(),
    };
    Ok(response)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant_id() {
        assert_eq!(
            parse_variant_id("gid://shopify/ProductVariant/7").unwrap(),
            VariantId::new("gid://shopify/ProductVariant/7")
        );
        assert_eq!(
            parse_variant_id(" 7 ").unwrap(),
            VariantId::from_numeric(7)
        );
        assert!(matches!(
            parse_variant_id("  "),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_add_line_quantity_defaults_to_one() {
        let body: AddLineRequest =
            serde_json::from_str(r#"{"variantId": "gid://shopify/ProductVariant/7"}"#).unwrap();
        assert_eq!(body.quantity, 1);
    }
}
