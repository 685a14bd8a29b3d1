//! Catalog route handlers for products and the shop.
//!
//! Thin JSON wrappers over the cached Storefront API queries.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::shopify::{Product, ProductConnection, Shop};
use crate::state::AppState;

/// Largest page the Storefront API accepts.
pub const MAX_PAGE_SIZE: i64 = 250;

/// Cursor pagination query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    pub first: Option<i64>,
    pub after: Option<String>,
}

impl PaginationQuery {
    /// Page size clamped to `1..=250`.
    ///
    /// # Errors
    ///
    /// Returns a bad request if `first` is below 1.
    pub fn first(&self) -> Result<Option<i64>> {
        match self.first {
            Some(first) if first < 1 => Err(AppError::BadRequest(
                "first must be at least 1".to_string(),
            )),
            other => Ok(other.map(|first| first.min(MAX_PAGE_SIZE))),
        }
    }

    #[must_use]
    pub fn after(&self) -> Option<String> {
        self.after.clone().filter(|cursor| !cursor.is_empty())
    }
}

/// One page of products.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<ProductConnection>> {
    let products = state
        .storefront()
        .get_products(query.first()?, query.after())
        .await?;
    Ok(Json(products))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
) -> Result<Json<Product>> {
    let product = state.storefront().get_product_by_handle(&handle).await?;
    Ok(Json(product))
}

/// Shop name, description and primary domain.
#[instrument(skip(state))]
pub async fn shop(State(state): State<AppState>) -> Result<Json<Shop>> {
    Ok(Json(state.storefront().get_shop().await?))
}
