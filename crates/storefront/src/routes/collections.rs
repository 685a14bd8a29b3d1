//! Catalog route handlers for collections.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use super::products::PaginationQuery;
use crate::error::Result;
use crate::shopify::{CollectionConnection, CollectionWithProducts};
use crate::state::AppState;

/// One page of collections.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<CollectionConnection>> {
    let collections = state
        .storefront()
        .get_collections(query.first()?, query.after())
        .await?;
    Ok(Json(collections))
}

/// A collection with one page of its products.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(handle): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<CollectionWithProducts>> {
    let collection = state
        .storefront()
        .get_collection_by_handle(&handle, query.first()?, query.after())
        .await?;
    Ok(Json(collection))
}
