//! Router-level tests for the JSON API.
//!
//! Requests go through the full application router, including the session,
//! request ID and rate limiting layers. Upstream services are wiremock servers.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use marquee_integration_tests::{
    cart_node, cart_query_response, mailchimp_members_path, sanity_query, sanity_result,
    shopify_operation, test_state,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_IP: &str = "198.51.100.7";

fn app(server: &MockServer, with_mailchimp: bool) -> Router {
    marquee_storefront::app(test_state(server, with_mailchimp))
}

fn request(method: &str, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", CLIENT_IP)
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    request(method, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` part of the session cookie set by `response`.
fn session_cookie(response: &Response) -> String {
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_echoes_request_id() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(
            request("GET", "/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-request-id"], "req-123");
}

// ============================================================================
// Newsletter
// ============================================================================

#[tokio::test]
async fn test_newsletter_rejects_invalid_email() {
    let server = MockServer::start().await;

    let response = app(&server, true)
        .oneshot(json_request(
            "POST",
            "/api/newsletter",
            &json!({ "email": "not-an-email" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "statusCode": 400, "message": "Invalid email address" })
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_newsletter_invalid_email_checked_before_config() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(json_request("POST", "/api/newsletter", &json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_newsletter_subscribes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(mailchimp_members_path()))
        .and(body_partial_json(json!({
            "email_address": "listener@example.com",
            "status": "subscribed"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "b8a7c6",
            "email_address": "listener@example.com",
            "status": "subscribed"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, true)
        .oneshot(json_request(
            "POST",
            "/api/newsletter",
            &json!({ "email": "listener@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Successfully subscribed to newsletter");
    assert_eq!(body["data"]["id"], "b8a7c6");
}

#[tokio::test]
async fn test_newsletter_existing_member_is_conflict() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(mailchimp_members_path()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Member Exists",
            "status": 400,
            "detail": "listener@example.com is already a list member."
        })))
        .mount(&server)
        .await;

    let response = app(&server, true)
        .oneshot(json_request(
            "POST",
            "/api/newsletter",
            &json!({ "email": "listener@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["statusCode"], 409);
}

#[tokio::test]
async fn test_newsletter_other_refusal_keeps_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(mailchimp_members_path()))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "title": "Invalid Resource",
            "status": 400,
            "detail": "listener@example.com looks fake or invalid."
        })))
        .mount(&server)
        .await;

    let response = app(&server, true)
        .oneshot(json_request(
            "POST",
            "/api/newsletter",
            &json!({ "email": "listener@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "listener@example.com looks fake or invalid."
    );
}

#[tokio::test]
async fn test_newsletter_unreadable_refusal_is_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(mailchimp_members_path()))
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>upstream down</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let response = app(&server, true)
        .oneshot(json_request(
            "POST",
            "/api/newsletter",
            &json!({ "email": "listener@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["statusCode"], 500);
    assert_eq!(
        body["message"],
        "An error occurred while subscribing to newsletter"
    );
}

#[tokio::test]
async fn test_newsletter_without_config() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(json_request(
            "POST",
            "/api/newsletter",
            &json!({ "email": "listener@example.com" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["message"],
        "Mailchimp configuration is missing"
    );
}

#[tokio::test]
async fn test_newsletter_get_is_method_not_allowed() {
    let server = MockServer::start().await;

    let response = app(&server, true)
        .oneshot(request("GET", "/api/newsletter").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        body_json(response).await,
        json!({ "statusCode": 405, "message": "Method Not Allowed" })
    );
}

// ============================================================================
// View state
// ============================================================================

#[tokio::test]
async fn test_view_state_persists_in_session() {
    let server = MockServer::start().await;
    let app = app(&server, false);

    let response = app
        .clone()
        .oneshot(request("POST", "/api/view/cart/toggle").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert_eq!(
        body_json(response).await,
        json!({ "cartOpen": true, "menuOpen": false, "newsletterOpen": false })
    );

    let response = app
        .clone()
        .oneshot(
            request("POST", "/api/view/menu/open")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await,
        json!({ "cartOpen": true, "menuOpen": true, "newsletterOpen": false })
    );

    let response = app
        .oneshot(
            request("GET", "/api/view")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(body_json(response).await["menuOpen"], true);
}

#[tokio::test]
async fn test_view_unknown_panel_is_not_found() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(request("POST", "/api/view/drawer/open").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_cart_without_session_is_empty() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(request("GET", "/api/cart").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cart"], Value::Null);
    assert_eq!(body["loading"], false);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cart_add_then_show_uses_session_cart() {
    let server = MockServer::start().await;
    let cart_id = "gid://shopify/Cart/session-1";
    let cart = cart_node(cart_id, &[("gid://shopify/CartLine/l1", 2)]);

    shopify_operation("CreateCart")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartCreate": { "cart": cart.clone(), "userErrors": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    shopify_operation("GetCart")
        .and(body_partial_json(json!({ "variables": { "cartId": cart_id } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(cart_query_response(Some(cart))))
        .expect(1..)
        .mount(&server)
        .await;

    let app = app(&server, false);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/cart/lines",
            &json!({ "variantId": "4242", "quantity": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert_eq!(body_json(response).await["cart"]["total_quantity"], 2);

    let response = app
        .oneshot(
            request("GET", "/api/cart")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["cart"]["id"], cart_id);
    assert_eq!(body["cart"]["total_quantity"], 2);
}

#[tokio::test]
async fn test_cart_lookup_failure_keeps_session_cart() {
    let server = MockServer::start().await;
    let cart_id = "gid://shopify/Cart/session-2";

    shopify_operation("CreateCart")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "cartCreate": { "cart": cart_node(cart_id, &[("gid://shopify/CartLine/l1", 1)]), "userErrors": [] } }
        })))
        .expect(1)
        .mount(&server)
        .await;
    shopify_operation("GetCart")
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let app = app(&server, false);
    let add = json!({ "variantId": "4242", "quantity": 1 });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/cart/lines", &add))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);

    let mut retry = json_request("POST", "/api/cart/lines", &add);
    retry
        .headers_mut()
        .insert(header::COOKIE, cookie.parse().unwrap());
    let response = app.oneshot(retry).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let operations: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .map(|r| serde_json::from_slice::<Value>(&r.body).unwrap()["operationName"].to_string())
        .collect();
    assert_eq!(operations, vec!["\"CreateCart\"", "\"GetCart\""]);
}

#[tokio::test]
async fn test_cart_add_rejects_zero_quantity() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(json_request(
            "POST",
            "/api/cart/lines",
            &json!({ "variantId": "4242", "quantity": 0 }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_without_cart_redirects_to_cart() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(request("GET", "/checkout").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers()[header::LOCATION], "/api/cart");
}

// ============================================================================
// Content
// ============================================================================

#[tokio::test]
async fn test_content_document_as_json() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(ResponseTemplate::new(200).set_body_json(sanity_result(json!({
            "socialLinks": [{ "platform": "Instagram", "url": "https://instagram.com/marquee" }]
        }))))
        .mount(&server)
        .await;

    let response = app(&server, false)
        .oneshot(
            request("GET", "/api/content/social-media?locale=sv")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["socialLinks"][0]["url"], "https://instagram.com/marquee");
}

#[tokio::test]
async fn test_content_unknown_document_is_not_found() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(request("GET", "/api/content/blog").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_content_unknown_locale_is_bad_request() {
    let server = MockServer::start().await;

    let response = app(&server, false)
        .oneshot(
            request("GET", "/api/content/menu?locale=xx")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_content_upstream_failure_is_bad_gateway() {
    let server = MockServer::start().await;

    sanity_query()
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let response = app(&server, false)
        .oneshot(request("GET", "/api/content/home").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["message"], "Content service error");
}
