//! Integration tests for the Sanity content fetchers.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use marquee_core::Locale;
use marquee_integration_tests::{sanity_client, sanity_query, sanity_result};
use marquee_storefront::content::{self, ContentError, ContentKind, ContentRequest};
use marquee_storefront::sanity::SanityError;
use serde_json::json;
use wiremock::matchers::{query_param, query_param_contains};
use wiremock::{MockServer, ResponseTemplate};

// ============================================================================
// Singletons
// ============================================================================

#[tokio::test]
async fn test_menu_in_french() {
    let server = MockServer::start().await;

    sanity_query()
        .and(query_param_contains(
            "query",
            "coalesce(menu.menuClose.fr, menu.menuClose.en, menu.menuClose)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!({
            "menuText": "Menu",
            "menuClose": "Fermer",
            "description": null,
            "newsletterText": "Lettre d'information",
            "contactText": "Contact",
            "mail": "hello@marquee.example"
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let menu = content::menu(&sanity_client(&server), Locale::Fr)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(menu.menu_close.as_deref(), Some("Fermer"));
    assert_eq!(menu.mail.as_deref(), Some("hello@marquee.example"));
    assert!(menu.description.is_none());
}

#[tokio::test]
async fn test_missing_singleton_is_none() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!(null))))
        .mount(&server)
        .await;

    let about = content::about(&sanity_client(&server), Locale::En).await.unwrap();
    assert!(about.is_none());
}

#[tokio::test]
async fn test_navigation_with_null_links() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(sanity_result(json!({ "mainNavigation": null }))),
        )
        .mount(&server)
        .await;

    let navigation = content::navigation(&sanity_client(&server), Locale::Ja)
        .await
        .unwrap()
        .unwrap();
    assert!(navigation.main_navigation.is_empty());
}

#[tokio::test]
async fn test_shop_merges_product_counts() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!({
            "shop": {
                "productsPerPage": 12,
                "categories": [
                    { "key": "all", "label": "Tout" },
                    { "key": "vinyls", "label": "Vinyles" },
                    { "key": "posters", "label": "Affiches" }
                ],
                "seo": null
            },
            "productCounts": { "all": 9, "vinyls": 5, "cd": 3, "clothes": 1 }
        }))))
        .mount(&server)
        .await;

    let shop = content::shop(&sanity_client(&server), Locale::Fr)
        .await
        .unwrap()
        .unwrap();

    let counts: Vec<(Option<&str>, u64)> = shop
        .categories
        .iter()
        .map(|c| (c.key.as_deref(), c.count))
        .collect();
    assert_eq!(
        counts,
        vec![(Some("all"), 9), (Some("vinyls"), 5), (Some("posters"), 0)]
    );
    assert_eq!(shop.products_per_page, Some(12));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
async fn test_product_by_slug_binds_parameter() {
    let server = MockServer::start().await;

    sanity_query()
        .and(query_param("$slug", "\"kind-of-blue-lp\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!({
            "_id": "shopifyProduct-7",
            "title": "Kind of Blue",
            "slug": "kind-of-blue-lp",
            "previewImageUrl": null,
            "tags": null,
            "images": null,
            "variants": [
                { "_id": "shopifyProductVariant-4242", "title": "Default Title", "price": 25.0 }
            ]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let product = content::product(&sanity_client(&server), "kind-of-blue-lp")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(product.title.as_deref(), Some("Kind of Blue"));
    assert!(product.tags.is_empty());
    assert_eq!(product.variants.len(), 1);
}

#[tokio::test]
async fn test_products_page_filters_by_category() {
    let server = MockServer::start().await;

    sanity_query()
        .and(query_param("$category", "\"vinyl\""))
        .and(query_param_contains("query", "[12...24]"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!([
            { "_id": "shopifyProduct-7", "title": "Kind of Blue", "slug": "kind-of-blue-lp" },
            { "_id": "shopifyProduct-8", "title": "Blue Train", "slug": "blue-train-lp" }
        ]))))
        .expect(1)
        .mount(&server)
        .await;

    let page = content::products_page(&sanity_client(&server), Some("Vinyl"), 2, 12)
        .await
        .unwrap();

    let slugs: Vec<_> = page.iter().filter_map(|p| p.slug.as_deref()).collect();
    assert_eq!(slugs, vec!["kind-of-blue-lp", "blue-train-lp"]);
}

#[tokio::test]
async fn test_translated_product_is_localized() {
    let server = MockServer::start().await;

    sanity_query()
        .and(query_param("$slug", "\"blue-train-lp\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!({
            "_id": "shopifyProduct-8",
            "title": "Blue Train",
            "slug": "blue-train-lp",
            "translations": {
                "title": { "_type": "localeString", "en": "Blue Train", "fr": "Train bleu" },
                "description": { "_type": "localeText", "en": "Hard bop." },
                "addToCartText": { "_type": "localeString", "en": "Add to cart", "fr": "Ajouter au panier" }
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let request = ContentRequest {
        locale: Locale::Fr,
        slug: Some("blue-train-lp".to_string()),
        ..ContentRequest::default()
    };
    let value = content::fetch_document(
        &sanity_client(&server),
        ContentKind::ProductWithTranslations,
        &request,
    )
    .await
    .unwrap();

    assert_eq!(value["localized"]["title"], "Train bleu");
    assert_eq!(value["localized"]["description"], "Hard bop.");
    assert_eq!(value["localized"]["addToCartText"], "Ajouter au panier");
    assert_eq!(value["translations"]["title"]["fr"], "Train bleu");
}

#[tokio::test]
async fn test_products_page_null_result_is_empty() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!(null))))
        .mount(&server)
        .await;

    let page = content::products_page(&sanity_client(&server), None, 1, 12)
        .await
        .unwrap();
    assert!(page.is_empty());
}

// ============================================================================
// Errors
// ============================================================================

#[tokio::test]
async fn test_query_error_surfaces_description() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "description": "param $slug referenced, but not provided", "type": "queryParseError" }
        })))
        .mount(&server)
        .await;

    let err = content::hub(&sanity_client(&server), Locale::En)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SanityError::Api { status: 400, ref message }
            if message == "param $slug referenced, but not provided"
    ));
}

#[tokio::test]
async fn test_fetch_document_requires_slug() {
    let server = MockServer::start().await;

    let err = content::fetch_document(
        &sanity_client(&server),
        ContentKind::ProductWithTranslations,
        &ContentRequest::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        ContentError::MissingSlug(ContentKind::ProductWithTranslations)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_document_missing_singleton_is_not_found() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!(null))))
        .mount(&server)
        .await;

    let err = content::fetch_document(
        &sanity_client(&server),
        ContentKind::Composition,
        &ContentRequest::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ContentError::NotFound(ContentKind::Composition)));
}
