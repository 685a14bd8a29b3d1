//! GROQ query builders for CMS documents.
//!
//! Pure functions: each returns the query text and its parameters without
//! touching the network. Locale codes are interpolated from [`Locale`] only;
//! slugs and categories always travel as parameters.

use marquee_core::Locale;

use super::locale::localized_as;
use crate::sanity::GroqQuery;

/// Category that disables the product-type filter.
pub const ALL_CATEGORY: &str = "all";

/// Default page size for [`products_page`].
pub const DEFAULT_PAGE_LIMIT: u32 = 12;

/// Shop categories backed by a product type, as `(category key, product type)`.
pub const SHOP_CATEGORIES: [(&str, &str); 3] =
    [("vinyls", "vinyl"), ("cd", "cd"), ("clothes", "clothes")];

const IMAGE_ASSET: &str = "asset->{_id, url, metadata}";
const VIDEO_ASSET: &str = "asset->{_id, url, originalFilename}";

/// Products that are synced from the store and not deleted.
const LIVE_PRODUCT: &str = "_type == \"product\" && defined(store) && !store.isDeleted";

// =============================================================================
// Pages
// =============================================================================

#[must_use]
pub fn home(locale: Locale) -> GroqQuery {
    GroqQuery::new(format!(
        r#"*[_type == "home"][0]{{
  {title},
  items[]{{
    _key,
    "thumbnail": thumbnail.{IMAGE_ASSET},
    "video": video.{VIDEO_ASSET},
    {item_title},
    {description},
    {link_name},
    url
  }},
  seo
}}"#,
        title = localized_as("title", "title", locale),
        item_title = localized_as("title", "title", locale),
        description = localized_as("description", "description", locale),
        link_name = localized_as("linkName", "linkName", locale),
    ))
}

#[must_use]
pub fn hub(locale: Locale) -> GroqQuery {
    GroqQuery::new(format!(
        r#"*[_type == "hub"][0]{{
  {view_text},
  {watch_all_text},
  watchAllLink,
  {watch_text},
  items[]{{
    thumbnailMobile{{ {IMAGE_ASSET} }},
    thumbnailDesktop{{ {IMAGE_ASSET} }},
    videoMobile{{ {VIDEO_ASSET} }},
    videoDesktop{{ {VIDEO_ASSET} }},
    {title},
    {subtitle},
    link
  }},
  seo
}}"#,
        view_text = localized_as("viewText", "viewText", locale),
        watch_all_text = localized_as("watchAllText", "watchAllText", locale),
        watch_text = localized_as("watchText", "watchText", locale),
        title = localized_as("title", "title", locale),
        subtitle = localized_as("subtitle", "subtitle", locale),
    ))
}

/// Shop settings together with live product counts per category.
#[must_use]
pub fn shop(locale: Locale) -> GroqQuery {
    let counts = SHOP_CATEGORIES
        .iter()
        .map(|(key, product_type)| {
            format!(
                "    \"{key}\": length(*[{LIVE_PRODUCT} && lower(store.productType) == \"{product_type}\"])"
            )
        })
        .collect::<Vec<_>>()
        .join(",\n");

    GroqQuery::new(format!(
        r#"{{
  "shop": *[_type == "shop"][0]{{
    productsPerPage,
    categories[]{{
      key,
      {label}
    }},
    seo
  }},
  "productCounts": {{
    "{ALL_CATEGORY}": length(*[{LIVE_PRODUCT}]),
{counts}
  }}
}}"#,
        label = localized_as("label", "label", locale),
    ))
}

#[must_use]
pub fn menu(locale: Locale) -> GroqQuery {
    GroqQuery::new(format!(
        r#"*[_type == "menuSettings"][0]{{
  {menu_text},
  {menu_close},
  {description},
  {newsletter_text},
  {contact_text},
  "mail": menu.mail
}}"#,
        menu_text = localized_as("menuText", "menu.menuText", locale),
        menu_close = localized_as("menuClose", "menu.menuClose", locale),
        description = localized_as("description", "menu.description", locale),
        newsletter_text = localized_as("newsletterText", "menu.newsletterText", locale),
        contact_text = localized_as("contactText", "menu.contactText", locale),
    ))
}

#[must_use]
pub fn navigation(locale: Locale) -> GroqQuery {
    GroqQuery::new(format!(
        r#"*[_type == "navigationSettings"][0]{{
  "mainNavigation": mainNavigation.links[]{{
    {text},
    url,
    isActive
  }}
}}"#,
        text = localized_as("text", "text", locale),
    ))
}

#[must_use]
pub fn social_media(locale: Locale) -> GroqQuery {
    GroqQuery::new(format!(
        r#"*[_type == "socialMediaSettings"][0]{{
  socialLinks[]{{
    url,
    {link_text},
    isActive
  }}
}}"#,
        link_text = localized_as("linkText", "linkText", locale),
    ))
}

#[must_use]
pub fn about(locale: Locale) -> GroqQuery {
    GroqQuery::new(format!(
        r#"*[_type == "about"][0]{{
  {view_text},
  items[]{{
    thumbnail{{ {IMAGE_ASSET} }},
    video{{ {VIDEO_ASSET} }},
    scrollImage{{ {IMAGE_ASSET} }},
    {title},
    {description},
    socialLinks[]{{
      {text},
      url
    }}
  }},
  seo
}}"#,
        view_text = localized_as("viewText", "viewText", locale),
        title = localized_as("title", "title", locale),
        description = localized_as("description", "description", locale),
        text = localized_as("text", "text", locale),
    ))
}

#[must_use]
pub fn composition(locale: Locale) -> GroqQuery {
    GroqQuery::new(format!(
        r#"*[_type == "composition"][0]{{
  {description},
  email,
  items[]{{
    {title},
    {item_description}
  }},
  seo
}}"#,
        description = localized_as("description", "description", locale),
        title = localized_as("title", "title", locale),
        item_description = localized_as("description", "description", locale),
    ))
}

// =============================================================================
// Products
// =============================================================================

/// One active product by slug, with its variants.
#[must_use]
pub fn product(slug: &str) -> GroqQuery {
    GroqQuery::new(
        r#"*[_type == "product" && store.slug.current == $slug && store.status == "active" && !store.isDeleted][0]{
  _id,
  "title": store.title,
  "slug": store.slug.current,
  "descriptionHtml": store.descriptionHtml,
  "priceRange": store.priceRange,
  "previewImageUrl": store.previewImageUrl,
  body,
  "variants": *[_type == "productVariant" && store.productId == ^.store.id]{
    _id,
    "title": store.title,
    "sku": store.sku,
    "price": store.price,
    "previewImageUrl": store.previewImageUrl,
    "shopifyId": store.gid
  },
  seo
}"#,
    )
    .param("slug", slug)
}

/// Every active product with a light variant listing.
#[must_use]
pub fn products() -> GroqQuery {
    GroqQuery::new(
        r#"*[_type == "product" && defined(store.status) && store.status == "active" && !store.isDeleted]{
  _id,
  "title": store.title,
  "slug": store.slug.current,
  "previewImageUrl": store.previewImageUrl,
  "variants": *[_type == "productVariant" && store.productId == ^.store.id]{
    _id,
    "title": store.title,
    "price": store.price,
    "image": store.image.asset->url
  }
}"#,
    )
}

/// Every active product with its referenced variants, for collection grids.
#[must_use]
pub fn products_by_collection() -> GroqQuery {
    GroqQuery::new(
        r#"*[_type == "product" && store.status == "active" && !store.isDeleted]{
  _id,
  "title": store.title,
  "slug": store.slug.current,
  "descriptionHtml": store.descriptionHtml,
  "priceRange": store.priceRange,
  "previewImageUrl": store.previewImageUrl,
  "variants": store.variants[]->{
    _id,
    "title": store.title,
    "sku": store.sku,
    "price": store.price,
    "previewImageUrl": store.previewImageUrl
  }
}"#,
    )
}

/// Slice bounds for a 1-based page. Zero page or limit is treated as 1.
#[must_use]
pub fn page_bounds(page: u32, limit: u32) -> (u32, u32) {
    let page = page.max(1);
    let limit = limit.max(1);
    let start = (page - 1).saturating_mul(limit);
    (start, start.saturating_add(limit))
}

fn catalog_projection(with_options: bool) -> String {
    let options = if with_options {
        ",\n    \"options\": {\"option1\": store.option1, \"option2\": store.option2, \"option3\": store.option3}"
    } else {
        ""
    };
    format!(
        r#"{{
  _id,
  "title": store.title,
  "slug": store.slug.current,
  "priceRange": store.priceRange,
  "previewImageUrl": store.previewImageUrl,
  "productType": store.productType,
  "vendor": store.vendor,
  "tags": store.tags,
  translations{{
    title,
    description,
    shortDescription,
    addToCartText,
    discoverProductText
  }},
  images[]{{ {IMAGE_ASSET} }},
  "variants": *[_type == "productVariant" && store.productId == ^.store.id]{{
    _id,
    "title": store.title,
    "sku": store.sku,
    "price": store.price,
    "compareAtPrice": store.compareAtPrice,
    "shopifyId": store.gid,
    "inventory": store.inventory{options}
  }},
  seo
}}"#
    )
}

/// One page of the translated catalogue, optionally filtered by category.
#[must_use]
pub fn products_page(category: Option<&str>, page: u32, limit: u32) -> GroqQuery {
    let (start, end) = page_bounds(page, limit);
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORY))
        .map(str::to_lowercase);

    let filter = if category.is_some() {
        " && lower(store.productType) == $category"
    } else {
        ""
    };
    let query = GroqQuery::new(format!(
        "*[{LIVE_PRODUCT}{filter}] | order(store.title asc) [{start}...{end}]{}",
        catalog_projection(false)
    ));

    match category {
        Some(category) => query.param("category", category),
        None => query,
    }
}

/// One product by slug with translations and variant options.
#[must_use]
pub fn product_with_translations(slug: &str) -> GroqQuery {
    GroqQuery::new(format!(
        "*[{LIVE_PRODUCT} && store.slug.current == $slug][0]{}",
        catalog_projection(true)
    ))
    .param("slug", slug)
}

#[must_use]
pub fn collections() -> GroqQuery {
    GroqQuery::new(
        r#"*[_type == "collection" && !store.isDeleted]{
  _id,
  "title": store.title,
  "slug": store.slug.current
}"#,
    )
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 12), (0, 12));
        assert_eq!(page_bounds(3, 12), (24, 36));
        assert_eq!(page_bounds(0, 0), (0, 1));
    }

    #[test]
    fn test_products_page_all_has_no_filter() {
        for category in [None, Some("all"), Some("ALL"), Some("")] {
            let query = products_page(category, 2, 10);
            assert!(!query.query.contains("$category"));
            assert!(query.query.contains("[10...20]"));
            assert!(query.params.is_empty());
        }
    }

    #[test]
    fn test_products_page_category_is_a_parameter() {
        let query = products_page(Some("Vinyls\" || true"), 1, 12);
        assert!(query.query.contains("lower(store.productType) == $category"));
        assert!(!query.query.contains("|| true"));
        assert_eq!(query.params["category"], json!("vinyls\" || true"));
    }

    #[test]
    fn test_product_binds_slug() {
        let query = product("kind-of-blue");
        assert!(query.query.contains("store.slug.current == $slug"));
        assert_eq!(query.params["slug"], json!("kind-of-blue"));
    }

    #[test]
    fn test_product_with_translations_projects_options() {
        let query = product_with_translations("a-love-supreme");
        assert!(query.query.contains("\"option1\": store.option1"));
        assert!(query.query.ends_with('}'));
        assert!(!products_page(None, 1, 12).query.contains("option1"));
    }

    #[test]
    fn test_localized_singletons() {
        let query = home(Locale::Fr);
        assert!(query.query.starts_with("*[_type == \"home\"][0]"));
        assert!(query.query.contains("coalesce(title.fr, title.en, title)"));
    }

    #[test]
    fn test_menu_reads_nested_menu_object() {
        let query = menu(Locale::En);
        for field in ["menuText", "menuClose", "description", "newsletterText", "contactText"] {
            assert!(query.query.contains(&format!(
                "\"{field}\": coalesce(menu.{field}.en, menu.{field})"
            )));
        }
        assert!(query.query.contains("\"mail\": menu.mail"));

        let query = menu(Locale::Sv);
        assert!(query.query.contains("coalesce(menu.menuClose.sv, menu.menuClose.en, menu.menuClose)"));
    }

    #[test]
    fn test_hub_and_about_keep_asset_objects() {
        let query = hub(Locale::En);
        assert!(query.query.contains("thumbnailMobile{ asset->{_id, url, metadata} }"));
        assert!(query.query.contains("videoDesktop{ asset->{_id, url, originalFilename} }"));
        assert!(!query.query.contains("\"thumbnailMobile\":"));

        let query = about(Locale::En);
        assert!(query.query.contains("scrollImage{ asset->{_id, url, metadata} }"));
        assert!(query.query.contains("video{ asset->{_id, url, originalFilename} }"));

        let query = home(Locale::En);
        assert!(query.query.contains("\"thumbnail\": thumbnail.asset->{_id, url, metadata}"));
    }

    #[test]
    fn test_product_lists_look_up_variants_by_product_id() {
        let reverse = "*[_type == \"productVariant\" && store.productId == ^.store.id]";
        for query in [products(), products_page(None, 1, 12), product_with_translations("x")] {
            assert!(query.query.contains(reverse));
            assert!(!query.query.contains("store.variants[]->"));
        }
        assert!(products().query.contains("defined(store.status)"));
        assert!(products().query.contains("\"image\": store.image.asset->url"));

        let query = products_by_collection();
        assert!(query.query.contains("store.status == \"active\" && !store.isDeleted"));
        assert!(query.query.contains("store.variants[]->"));
    }

    #[test]
    fn test_shop_counts_every_category() {
        let query = shop(Locale::Zh);
        assert!(query.query.contains("\"all\": length("));
        for (key, product_type) in SHOP_CATEGORIES {
            assert!(query.query.contains(&format!("\"{key}\": length(")));
            assert!(query.query.contains(&format!("== \"{product_type}\"")));
        }
        assert!(query.query.contains("coalesce(label.zh, label.en, label)"));
    }
}
