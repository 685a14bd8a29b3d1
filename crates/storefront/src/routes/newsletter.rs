//! Newsletter subscription route handlers.
//!
//! Relays a subscription to the Mailchimp audience. Validation happens before
//! the configuration check, so a malformed address is always a 400.

use axum::{Json, body::Bytes, extract::State};
use marquee_core::Email;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Newsletter subscription request body.
#[derive(Debug, Default, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// Successful subscription.
#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: &'static str,
    /// Member record returned by Mailchimp.
    pub data: serde_json::Value,
}

/// Subscribe an address to the newsletter.
///
/// The body is read leniently: anything that is not a JSON object with a
/// valid `email` string is an invalid address.
#[instrument(skip(state, body))]
pub async fn subscribe(State(state): State<AppState>, body: Bytes) -> Result<Json<SubscribeResponse>> {
    let request: SubscribeRequest = serde_json::from_slice(&body).unwrap_or_default();
    let email = request
        .email
        .as_deref()
        .and_then(|email| Email::parse(email).ok())
        .ok_or_else(|| AppError::BadRequest("Invalid email address".to_string()))?;

    let mailchimp = state.mailchimp().ok_or_else(|| {
        AppError::Configuration("Mailchimp configuration is missing".to_string())
    })?;

    let data = mailchimp.subscribe(&email).await?;
    tracing::info!(domain = %email.domain(), "Newsletter subscription successful");

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Successfully subscribed to newsletter",
        data,
    }))
}

/// Any method other than POST.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
