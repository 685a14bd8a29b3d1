//! Application state shared across handlers.

use std::sync::Arc;

use crate::cart::MutationGate;
use crate::config::StorefrontConfig;
use crate::sanity::{SanityClient, SanityError};
use crate::services::{MailchimpClient, MailchimpError};
use crate::shopify::{ShopifyError, StorefrontClient};

/// Error building the remote clients.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("failed to build Shopify client: {0}")]
    Shopify(#[from] ShopifyError),
    #[error("failed to build Sanity client: {0}")]
    Sanity(#[from] SanityError),
    #[error("failed to build Mailchimp client: {0}")]
    Mailchimp(#[from] MailchimpError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the remote clients, configuration, and the cart mutation gate.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    sanity: SanityClient,
    mailchimp: Option<MailchimpClient>,
    cart_gate: MutationGate,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The Mailchimp client is only built when both its settings are present.
    ///
    /// # Errors
    ///
    /// Returns an error if any HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let timeout = config.http_timeout;
        let storefront = StorefrontClient::new(&config.shopify, timeout)?;
        let sanity = SanityClient::new(&config.sanity, timeout)?;
        let mailchimp = config
            .mailchimp
            .as_ref()
            .map(|mc| MailchimpClient::new(mc, timeout))
            .transpose()?;

        Ok(Self::from_parts(config, storefront, sanity, mailchimp))
    }

    /// Assemble state from already-built clients.
    #[must_use]
    pub fn from_parts(
        config: StorefrontConfig,
        storefront: StorefrontClient,
        sanity: SanityClient,
        mailchimp: Option<MailchimpClient>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                sanity,
                mailchimp,
                cart_gate: MutationGate::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// Get a reference to the Sanity client.
    #[must_use]
    pub fn sanity(&self) -> &SanityClient {
        &self.inner.sanity
    }

    /// The Mailchimp client, if configured.
    #[must_use]
    pub fn mailchimp(&self) -> Option<&MailchimpClient> {
        self.inner.mailchimp.as_ref()
    }

    /// Gate serializing cart mutations across all requests.
    #[must_use]
    pub fn cart_gate(&self) -> &MutationGate {
        &self.inner.cart_gate
    }
}
