//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Errors are rendered as JSON:
//!
//! ```json
//! { "statusCode": 409, "message": "This email is already subscribed" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::cart::CartError;
use crate::content::ContentError;
use crate::services::MailchimpError;
use crate::shopify::ShopifyError;

/// Message shown when the newsletter relay fails on our side.
const NEWSLETTER_FAILURE: &str = "An error occurred while subscribing to newsletter";

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Catalog query failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// CMS query failed.
    #[error("Content error: {0}")]
    Content(#[from] ContentError),

    /// Mailing-list subscription failed.
    #[error("Newsletter error: {0}")]
    Newsletter(#[from] MailchimpError),

    /// Session store failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// A required setting is absent. The message is shown to the client.
    #[error("{0}")]
    Configuration(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// HTTP method not supported on this route.
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON error body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Cart(CartError::Remote(err)) | Self::Shopify(err) => shopify_status(err),
            Self::Cart(CartError::NoCart) | Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Cart(CartError::Busy) => StatusCode::CONFLICT,
            Self::Content(ContentError::MissingSlug(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Content(ContentError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Content(ContentError::Sanity(_)) => StatusCode::BAD_GATEWAY,
            Self::Newsletter(MailchimpError::MemberExists) => StatusCode::CONFLICT,
            Self::Newsletter(MailchimpError::Api { status, .. }) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Content(ContentError::Encode(_))
            | Self::Newsletter(MailchimpError::Http(_) | MailchimpError::Parse(_))
            | Self::Session(_)
            | Self::Configuration(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to clients.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Cart(CartError::Remote(err)) | Self::Shopify(err) => match err {
                ShopifyError::Rejected { message, .. } => message.clone(),
                ShopifyError::NotFound(what) => what.clone(),
                _ => "External service error".to_string(),
            },
            Self::Cart(err) => err.to_string(),
            Self::Content(ContentError::Sanity(_)) => "Content service error".to_string(),
            Self::Content(ContentError::Encode(_)) | Self::Session(_) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Content(err) => err.to_string(),
            Self::Newsletter(MailchimpError::Api { message, .. }) => message.clone(),
            Self::Newsletter(MailchimpError::MemberExists) => {
                MailchimpError::MemberExists.to_string()
            }
            Self::Newsletter(_) => NEWSLETTER_FAILURE.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Configuration(message) | Self::BadRequest(message) => message.clone(),
            Self::MethodNotAllowed => self.to_string(),
        }
    }
}

fn shopify_status(err: &ShopifyError) -> StatusCode {
    match err {
        ShopifyError::Rejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        ShopifyError::NotFound(_) => StatusCode::NOT_FOUND,
        ShopifyError::Http(_)
        | ShopifyError::GraphQL(_)
        | ShopifyError::Parse(_)
        | ShopifyError::RateLimited(_) => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added line", Some(&[("variant_id", "gid://shopify/ProductVariant/1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
