//! CMS content route handler.
//!
//! `GET /api/content/{document}` runs the fetcher named by `document` with
//! the query-string parameters it needs.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use marquee_core::Locale;
use serde::Deserialize;
use tracing::instrument;

use crate::content::{self, ContentKind, ContentRequest};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters accepted by every document.
#[derive(Debug, Default, Deserialize)]
pub struct ContentQuery {
    pub locale: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ContentQuery {
    /// Convert into fetcher parameters.
    ///
    /// # Errors
    ///
    /// Returns a bad request for an unsupported locale.
    pub fn into_request(self) -> Result<ContentRequest> {
        let locale = self
            .locale
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(str::parse::<Locale>)
            .transpose()
            .map_err(|e| AppError::BadRequest(e.to_string()))?
            .unwrap_or_default();

        Ok(ContentRequest {
            locale,
            slug: self.slug.filter(|s| !s.is_empty()),
            category: self.category,
            page: self.page,
            limit: self.limit,
        })
    }
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(document): Path<String>,
    Query(query): Query<ContentQuery>,
) -> Result<Json<serde_json::Value>> {
    let kind: ContentKind = document
        .parse()
        .map_err(|e: content::UnknownDocument| AppError::NotFound(e.0))?;
    let request = query.into_request()?;

    let value = content::fetch_document(state.sanity(), kind, &request).await?;
    Ok(Json(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_defaults_to_english() {
        let request = ContentQuery::default().into_request().unwrap();
        assert_eq!(request.locale, Locale::En);

        let request = ContentQuery {
            locale: Some("fr-FR".to_string()),
            slug: Some(String::new()),
            ..ContentQuery::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(request.locale, Locale::Fr);
        assert_eq!(request.slug, None);
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        let result = ContentQuery {
            locale: Some("de".to_string()),
            ..ContentQuery::default()
        }
        .into_request();
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
