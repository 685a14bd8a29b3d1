//! Mailchimp Marketing API client for newsletter subscriptions.
//!
//! Adds an address to the configured audience with status `subscribed`
//! (single opt-in). The API key carries the datacenter as its suffix
//! (`<key>-us21`), which selects the API host.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use marquee_core::Email;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::instrument;

use crate::config::MailchimpConfig;

/// Datacenter used when the API key carries no suffix.
const DEFAULT_DATACENTER: &str = "us1";

/// `title` Mailchimp returns when the address is already on the audience.
const MEMBER_EXISTS_TITLE: &str = "Member Exists";

/// Errors that can occur when interacting with the Mailchimp API.
#[derive(Debug, Error)]
pub enum MailchimpError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The address is already subscribed.
    #[error("This email is already subscribed")]
    MemberExists,

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to build the request or parse the response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Mailchimp API client bound to one audience. Cheap to clone.
#[derive(Clone)]
pub struct MailchimpClient {
    client: reqwest::Client,
    members_url: String,
}

impl MailchimpClient {
    /// Create a new Mailchimp API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MailchimpConfig, timeout: Duration) -> Result<Self, MailchimpError> {
        let base_url = format!(
            "https://{}.api.mailchimp.com/3.0",
            datacenter(config.api_key.expose_secret())
        );
        Self::with_base_url(config, &base_url, timeout)
    }

    /// Create a client against an explicit API root (e.g. a mock server).
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn with_base_url(
        config: &MailchimpConfig,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, MailchimpError> {
        let mut headers = HeaderMap::new();

        // Basic auth with any user name and the API key as password
        let credentials = BASE64.encode(format!("apikey:{}", config.api_key.expose_secret()));
        let mut auth_value = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| MailchimpError::Parse(format!("Invalid API key format: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            members_url: format!(
                "{}/lists/{}/members",
                base_url.trim_end_matches('/'),
                config.audience_id
            ),
        })
    }

    /// Subscribe an address to the audience.
    ///
    /// Returns the member record Mailchimp sent back.
    ///
    /// # Errors
    ///
    /// Returns [`MailchimpError::MemberExists`] if the address is already on
    /// the audience, [`MailchimpError::Api`] for other refusals,
    /// [`MailchimpError::Parse`] if a refusal carries no JSON problem body, and
    /// [`MailchimpError::Http`] if the request fails.
    #[instrument(skip(self, email))]
    pub async fn subscribe(&self, email: &Email) -> Result<serde_json::Value, MailchimpError> {
        let body = SubscribeRequest {
            email_address: email.as_str(),
            status: "subscribed",
        };

        let response = self.client.post(&self.members_url).json(&body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let problem: ProblemDetail =
                serde_json::from_str(&text).map_err(|e| MailchimpError::Parse(e.to_string()))?;
            if problem.title.as_deref() == Some(MEMBER_EXISTS_TITLE) {
                return Err(MailchimpError::MemberExists);
            }
            return Err(MailchimpError::Api {
                status: status.as_u16(),
                message: problem.message(),
            });
        }

        serde_json::from_str(&text).map_err(|e| MailchimpError::Parse(e.to_string()))
    }
}

/// Datacenter suffix of an API key.
fn datacenter(api_key: &str) -> &str {
    api_key
        .split('-')
        .nth(1)
        .filter(|dc| !dc.is_empty())
        .unwrap_or(DEFAULT_DATACENTER)
}

#[derive(Debug, Serialize)]
struct SubscribeRequest<'a> {
    email_address: &'a str,
    status: &'a str,
}

/// RFC 7807 problem document Mailchimp returns on errors.
#[derive(Debug, Default, Deserialize)]
struct ProblemDetail {
    title: Option<String>,
    detail: Option<String>,
}

impl ProblemDetail {
    fn message(self) -> String {
        self.detail
            .filter(|d| !d.is_empty())
            .or_else(|| self.title.filter(|t| !t.is_empty()))
            .unwrap_or_else(|| "Failed to subscribe to newsletter".to_string())
    }
}
