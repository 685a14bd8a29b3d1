//! Typed CMS projections.
//!
//! Field names mirror the GROQ projections in [`super::queries`]. Everything
//! is optional because editors can leave any field blank; lists default to
//! empty. Opaque structures (SEO blocks, portable text, image metadata) stay
//! as JSON values.

use marquee_core::Locale;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::locale::localized_text;

/// A dereferenced image or video asset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
}

/// An `{ asset }` wrapper as stored on image and video fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageField {
    pub asset: Option<Asset>,
}

// =============================================================================
// Pages
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeDocument {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<HomeItem>,
    pub seo: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeItem {
    #[serde(rename = "_key")]
    pub key: Option<String>,
    pub thumbnail: Option<Asset>,
    pub video: Option<Asset>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link_name: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubDocument {
    pub view_text: Option<String>,
    pub watch_all_text: Option<String>,
    pub watch_all_link: Option<String>,
    pub watch_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<HubItem>,
    pub seo: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubItem {
    pub thumbnail_mobile: Option<ImageField>,
    pub thumbnail_desktop: Option<ImageField>,
    pub video_mobile: Option<ImageField>,
    pub video_desktop: Option<ImageField>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub link: Option<String>,
}

/// Shop settings with the product count of each category filled in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopDocument {
    pub products_per_page: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub categories: Vec<ShopCategory>,
    pub seo: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopCategory {
    pub key: Option<String>,
    pub label: Option<String>,
    /// Live products in this category. Not stored in the CMS.
    #[serde(default)]
    pub count: u64,
}

/// Raw result of the shop query before counts are merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopQueryResult {
    pub shop: Option<ShopDocument>,
    #[serde(default)]
    pub product_counts: std::collections::BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuDocument {
    pub menu_text: Option<String>,
    pub menu_close: Option<String>,
    pub description: Option<String>,
    pub newsletter_text: Option<String>,
    pub contact_text: Option<String>,
    pub mail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub main_navigation: Vec<NavigationLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationLink {
    pub text: Option<String>,
    pub url: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialMediaDocument {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub social_links: Vec<SocialLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub url: Option<String>,
    pub link_text: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutDocument {
    pub view_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<AboutItem>,
    pub seo: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AboutItem {
    pub thumbnail: Option<ImageField>,
    pub video: Option<ImageField>,
    pub scroll_image: Option<ImageField>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub social_links: Vec<AboutLink>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AboutLink {
    pub text: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionDocument {
    pub description: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<CompositionItem>,
    pub seo: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompositionItem {
    pub title: Option<String>,
    pub description: Option<String>,
}

// =============================================================================
// Products
// =============================================================================

/// A product as projected by the product queries.
///
/// The queries project different subsets; fields a query does not select
/// stay `None` or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<Value>,
    pub preview_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translations: Option<ProductTranslations>,
    /// `translations` resolved to the requested locale, set by
    /// [`ProductDocument::localize`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub localized: Option<ResolvedTranslations>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub images: Vec<ImageField>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub variants: Vec<VariantDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo: Option<Value>,
}

/// Editor-supplied product copy, each field a locale object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductTranslations {
    #[serde(default)]
    pub title: Value,
    #[serde(default)]
    pub description: Value,
    #[serde(default)]
    pub short_description: Value,
    #[serde(default)]
    pub add_to_cart_text: Value,
    #[serde(default)]
    pub discover_product_text: Value,
}

/// [`ProductTranslations`] resolved to one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTranslations {
    pub title: String,
    pub description: String,
    pub short_description: String,
    pub add_to_cart_text: String,
    pub discover_product_text: String,
}

impl ProductTranslations {
    /// Resolve every field to `locale`, falling back to English.
    #[must_use]
    pub fn resolve(&self, locale: Locale) -> ResolvedTranslations {
        let text = |value: &Value| localized_text(value, locale, Locale::En);
        ResolvedTranslations {
            title: text(&self.title),
            description: text(&self.description),
            short_description: text(&self.short_description),
            add_to_cart_text: text(&self.add_to_cart_text),
            discover_product_text: text(&self.discover_product_text),
        }
    }
}

impl ProductDocument {
    /// Display title in `locale`: the translated title when present, else the
    /// store title.
    #[must_use]
    pub fn display_title(&self, locale: Locale) -> String {
        self.translations
            .as_ref()
            .map(|t| localized_text(&t.title, locale, Locale::En))
            .filter(|title| !title.is_empty())
            .or_else(|| self.title.clone())
            .unwrap_or_default()
    }

    /// Fill [`ProductDocument::localized`] for `locale`. Products without
    /// translations are left untouched.
    pub fn localize(&mut self, locale: Locale) {
        self.localized = self.translations.as_ref().map(|t| ResolvedTranslations {
            title: self.display_title(locale),
            ..t.resolve(locale)
        });
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compare_at_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Shopify variant GID, usable as a cart line's merchandise ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shopify_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: Option<String>,
    pub slug: Option<String>,
}

/// GROQ yields `null` for an empty array projection; treat it as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
