//! Read-only content fetchers backed by the Sanity CMS.
//!
//! Each fetcher builds one query with [`queries`], runs it, and returns the
//! typed document. Fetchers share nothing but the HTTP client; there is no
//! caching, so every call reflects the current published dataset.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::Locale;
//! use marquee_storefront::content;
//!
//! let menu = content::menu(&sanity, Locale::Fr).await?;
//! let page = content::products_page(&sanity, Some("vinyls"), 2, 12).await?;
//! ```

pub mod documents;
pub mod locale;
pub mod queries;

use std::fmt;
use std::str::FromStr;

use marquee_core::Locale;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use crate::sanity::{SanityClient, SanityError};
pub use documents::*;

// =============================================================================
// Pages
// =============================================================================

/// Home page carousel.
///
/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn home(client: &SanityClient, locale: Locale) -> Result<Option<HomeDocument>, SanityError> {
    client.fetch(&queries::home(locale)).await
}

/// Video hub page.
///
/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn hub(client: &SanityClient, locale: Locale) -> Result<Option<HubDocument>, SanityError> {
    client.fetch(&queries::hub(locale)).await
}

/// Shop settings with the live product count merged into each category.
///
/// Categories without a count (unknown keys) get zero.
///
/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn shop(client: &SanityClient, locale: Locale) -> Result<Option<ShopDocument>, SanityError> {
    let result: ShopQueryResult = client.fetch(&queries::shop(locale)).await?;
    Ok(merge_product_counts(result))
}

fn merge_product_counts(result: ShopQueryResult) -> Option<ShopDocument> {
    let ShopQueryResult {
        shop,
        product_counts,
    } = result;
    shop.map(|mut shop| {
        for category in &mut shop.categories {
            category.count = category
                .key
                .as_deref()
                .and_then(|key| product_counts.get(key))
                .copied()
                .unwrap_or(0);
        }
        shop
    })
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn menu(client: &SanityClient, locale: Locale) -> Result<Option<MenuDocument>, SanityError> {
    client.fetch(&queries::menu(locale)).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn navigation(
    client: &SanityClient,
    locale: Locale,
) -> Result<Option<NavigationDocument>, SanityError> {
    client.fetch(&queries::navigation(locale)).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn social_media(
    client: &SanityClient,
    locale: Locale,
) -> Result<Option<SocialMediaDocument>, SanityError> {
    client.fetch(&queries::social_media(locale)).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn about(client: &SanityClient, locale: Locale) -> Result<Option<AboutDocument>, SanityError> {
    client.fetch(&queries::about(locale)).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn composition(
    client: &SanityClient,
    locale: Locale,
) -> Result<Option<CompositionDocument>, SanityError> {
    client.fetch(&queries::composition(locale)).await
}

// =============================================================================
// Products
// =============================================================================

/// An active product by slug, or `None`.
///
/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn product(client: &SanityClient, slug: &str) -> Result<Option<ProductDocument>, SanityError> {
    client.fetch(&queries::product(slug)).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn products(client: &SanityClient) -> Result<Vec<ProductDocument>, SanityError> {
    fetch_list(client, &queries::products()).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn products_by_collection(client: &SanityClient) -> Result<Vec<ProductDocument>, SanityError> {
    fetch_list(client, &queries::products_by_collection()).await
}

/// One page of the translated catalogue.
///
/// `category` of `None` or `"all"` lists every product. `page` is 1-based.
///
/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn products_page(
    client: &SanityClient,
    category: Option<&str>,
    page: u32,
    limit: u32,
) -> Result<Vec<ProductDocument>, SanityError> {
    fetch_list(client, &queries::products_page(category, page, limit)).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn product_with_translations(
    client: &SanityClient,
    slug: &str,
) -> Result<Option<ProductDocument>, SanityError> {
    client.fetch(&queries::product_with_translations(slug)).await
}

/// # Errors
///
/// Returns an error if the query fails.
#[instrument(skip(client))]
pub async fn collections(client: &SanityClient) -> Result<Vec<CollectionDocument>, SanityError> {
    fetch_list(client, &queries::collections()).await
}

async fn fetch_list<T>(client: &SanityClient, query: &crate::sanity::GroqQuery) -> Result<Vec<T>, SanityError>
where
    T: for<'de> Deserialize<'de>,
{
    Ok(client.fetch::<Option<Vec<T>>>(query).await?.unwrap_or_default())
}

// =============================================================================
// Dispatch by name
// =============================================================================

/// Error returned for an unknown document name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown content document: {0}")]
pub struct UnknownDocument(pub String);

/// Error from [`fetch_document`].
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Sanity(#[from] SanityError),

    #[error("{0} requires a slug")]
    MissingSlug(ContentKind),

    #[error("{0} not found")]
    NotFound(ContentKind),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Every document a fetcher exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Home,
    Hub,
    Shop,
    Product,
    Products,
    ProductsByCollection,
    ProductsPage,
    ProductWithTranslations,
    Collections,
    Menu,
    Navigation,
    SocialMedia,
    About,
    Composition,
}

impl ContentKind {
    pub const ALL: [Self; 14] = [
        Self::Home,
        Self::Hub,
        Self::Shop,
        Self::Product,
        Self::Products,
        Self::ProductsByCollection,
        Self::ProductsPage,
        Self::ProductWithTranslations,
        Self::Collections,
        Self::Menu,
        Self::Navigation,
        Self::SocialMedia,
        Self::About,
        Self::Composition,
    ];

    /// Kebab-case name used in URLs and on the command line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Hub => "hub",
            Self::Shop => "shop",
            Self::Product => "product",
            Self::Products => "products",
            Self::ProductsByCollection => "products-by-collection",
            Self::ProductsPage => "products-page",
            Self::ProductWithTranslations => "product-with-translations",
            Self::Collections => "collections",
            Self::Menu => "menu",
            Self::Navigation => "navigation",
            Self::SocialMedia => "social-media",
            Self::About => "about",
            Self::Composition => "composition",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentKind {
    type Err = UnknownDocument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownDocument(s.to_string()))
    }
}

/// Parameters for [`fetch_document`]. Each document reads only what it needs.
#[derive(Debug, Clone, Default)]
pub struct ContentRequest {
    pub locale: Locale,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Fetch any document by kind and return it as JSON.
///
/// Singleton and slug lookups that find nothing yield [`ContentError::NotFound`].
///
/// Translated product documents also carry their copy resolved to the
/// request locale under `localized`.
///
/// # Errors
///
/// Returns an error if a required slug is missing, the query fails, or the
/// document does not exist.
pub async fn fetch_document(
    client: &SanityClient,
    kind: ContentKind,
    request: &ContentRequest,
) -> Result<serde_json::Value, ContentError> {
    let locale = request.locale;
    let slug = || request.slug.as_deref().ok_or(ContentError::MissingSlug(kind));

    let value = match kind {
        ContentKind::Home => to_json(kind, home(client, locale).await?)?,
        ContentKind::Hub => to_json(kind, hub(client, locale).await?)?,
        ContentKind::Shop => to_json(kind, shop(client, locale).await?)?,
        ContentKind::Menu => to_json(kind, menu(client, locale).await?)?,
        ContentKind::Navigation => to_json(kind, navigation(client, locale).await?)?,
        ContentKind::SocialMedia => to_json(kind, social_media(client, locale).await?)?,
        ContentKind::About => to_json(kind, about(client, locale).await?)?,
        ContentKind::Composition => to_json(kind, composition(client, locale).await?)?,
        ContentKind::Product => to_json(kind, product(client, slug()?).await?)?,
        ContentKind::ProductWithTranslations => {
            let product = product_with_translations(client, slug()?).await?.map(|mut p| {
                p.localize(locale);
                p
            });
            to_json(kind, product)?
        }
        ContentKind::Products => serde_json::to_value(products(client).await?)?,
        ContentKind::ProductsByCollection => {
            serde_json::to_value(products_by_collection(client).await?)?
        }
        ContentKind::ProductsPage => {
            let mut page = products_page(
                client,
                request.category.as_deref(),
                request.page.unwrap_or(1),
                request.limit.unwrap_or(queries::DEFAULT_PAGE_LIMIT),
            )
            .await?;
            for product in &mut page {
                product.localize(locale);
            }
            serde_json::to_value(page)?
        }
        ContentKind::Collections => serde_json::to_value(collections(client).await?)?,
    };
    Ok(value)
}

fn to_json<T: serde::Serialize>(kind: ContentKind, doc: Option<T>) -> Result<serde_json::Value, ContentError> {
    let doc = doc.ok_or(ContentError::NotFound(kind))?;
    Ok(serde_json::to_value(doc)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in ContentKind::ALL {
            assert_eq!(kind.name().parse::<ContentKind>().unwrap(), kind);
        }
        assert_eq!(
            "blog".parse::<ContentKind>(),
            Err(UnknownDocument("blog".to_string()))
        );
    }

    #[test]
    fn test_merge_product_counts() {
        let result = ShopQueryResult {
            shop: Some(ShopDocument {
                products_per_page: Some(12),
                categories: vec![
                    ShopCategory {
                        key: Some("all".to_string()),
                        label: Some("Tout".to_string()),
                        count: 0,
                    },
                    ShopCategory {
                        key: Some("vinyls".to_string()),
                        label: Some("Vinyles".to_string()),
                        count: 0,
                    },
                    ShopCategory {
                        key: Some("posters".to_string()),
                        label: None,
                        count: 7,
                    },
                ],
                seo: None,
            }),
            product_counts: BTreeMap::from([
                ("all".to_string(), 42),
                ("vinyls".to_string(), 30),
                ("cd".to_string(), 12),
            ]),
        };

        let shop = merge_product_counts(result).unwrap();
        let counts: Vec<u64> = shop.categories.iter().map(|c| c.count).collect();
        assert_eq!(counts, vec![42, 30, 0]);
    }

    #[test]
    fn test_merge_without_shop_document() {
        assert!(merge_product_counts(ShopQueryResult::default()).is_none());
    }
}
