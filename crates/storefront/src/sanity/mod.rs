//! Sanity content API client.
//!
//! Runs GROQ queries against a project's dataset. Parameters travel as
//! `$name=<json>` query-string pairs so user input (slugs, categories) is
//! never spliced into the query text.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SanityConfig;

/// Errors that can occur when querying Sanity.
#[derive(Debug, Error)]
pub enum SanityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Project or dataset produced an invalid URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// A GROQ query with its parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GroqQuery {
    pub query: String,
    pub params: BTreeMap<String, serde_json::Value>,
}

impl GroqQuery {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: BTreeMap::new(),
        }
    }

    /// Bind `$name` to `value`.
    #[must_use]
    pub fn param(mut self, name: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(name.to_string(), value.into());
        self
    }
}

/// Client for the Sanity query API. Cheap to clone.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    query_url: Url,
    token: Option<SecretString>,
}

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

impl SanityClient {
    /// Create a client for the configured project and dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(config: &SanityConfig, timeout: Duration) -> Result<Self, SanityError> {
        let host = if config.use_cdn { "apicdn" } else { "api" };
        let base_url = format!(
            "https://{}.{host}.sanity.io/v{}",
            config.project_id, config.api_version
        );
        Self::with_base_url(&base_url, &config.dataset, config.token.clone(), timeout)
    }

    /// Create a client against an explicit versioned API root
    /// (e.g. `http://127.0.0.1:4000/v2025-07-23`).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn with_base_url(
        base_url: &str,
        dataset: &str,
        token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, SanityError> {
        let query_url = Url::parse(&format!(
            "{}/data/query/{dataset}",
            base_url.trim_end_matches('/')
        ))?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            inner: Arc::new(SanityClientInner {
                client,
                query_url,
                token,
            }),
        })
    }

    /// Full request URL for a query.
    #[must_use]
    pub fn query_url(&self, query: &GroqQuery) -> Url {
        let mut url = self.inner.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", &query.query);
            for (name, value) in &query.params {
                pairs.append_pair(&format!("${name}"), &value.to_string());
            }
        }
        url
    }

    /// Run a query and deserialize its `result`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, Sanity answers with a non-2xx
    /// status, or the result does not match `T`.
    #[instrument(skip(self, query), fields(params = ?query.params.keys().collect::<Vec<_>>()))]
    pub async fn fetch<T: DeserializeOwned>(&self, query: &GroqQuery) -> Result<T, SanityError> {
        let mut request = self.inner.client.get(self.query_url(query));
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Sanity API returned non-success status"
            );
            return Err(SanityError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        debug!(bytes = text.len(), "Sanity query succeeded");
        let response: QueryResponse<T> = serde_json::from_str(&text)?;
        Ok(response.result)
    }
}

/// Pull `error.description` out of a Sanity error body, falling back to the
/// start of the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/description")
                .or_else(|| v.pointer("/message"))
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> SanityClient {
        SanityClient::new(
            &SanityConfig {
                project_id: "f7eqgv37".to_string(),
                dataset: "production".to_string(),
                api_version: "2025-07-23".to_string(),
                use_cdn: true,
                token: None,
            },
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_query_url_uses_cdn_host() {
        let url = client().query_url(&GroqQuery::new("*[_type == \"home\"][0]"));
        assert_eq!(url.host_str(), Some("f7eqgv37.apicdn.sanity.io"));
        assert_eq!(url.path(), "/v2025-07-23/data/query/production");
    }

    #[test]
    fn test_params_are_json_encoded() {
        let query = GroqQuery::new("*[slug.current == $slug][0]")
            .param("slug", "blue-train")
            .param("start", 0);
        let url = client().query_url(&query);
        let pairs: BTreeMap<String, String> = url.query_pairs().into_owned().collect();

        assert_eq!(pairs["query"], "*[slug.current == $slug][0]");
        assert_eq!(pairs["$slug"], "\"blue-train\"");
        assert_eq!(pairs["$start"], "0");
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"description":"expected '}' following object body","type":"queryParseError"}}"#;
        assert_eq!(error_message(body), "expected '}' following object body");
        assert_eq!(error_message("upstream down"), "upstream down");
    }
}
