//! Command implementations.
//!
//! Each subcommand builds the client it needs from the environment, so
//! `content` works without Shopify credentials and `cart` without Sanity.

pub mod cart;
pub mod content;
pub mod products;

use marquee_storefront::cart::CartError;
use marquee_storefront::config::{self, ConfigError, SanityConfig, ShopifyStorefrontConfig};
use marquee_storefront::content::ContentError;
use marquee_storefront::sanity::{SanityClient, SanityError};
use marquee_storefront::shopify::{ShopifyError, StorefrontClient};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Missing Shopify settings: {}", .0.join(", "))]
    MissingShopifyConfig(Vec<&'static str>),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    #[error("Sanity error: {0}")]
    Sanity(#[from] SanityError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// How results are printed.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    pub json: bool,
}

/// Print a value as pretty JSON on stdout.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print lines of text on stdout.
#[allow(clippy::print_stdout)]
pub fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

/// Storefront API client from `SHOPIFY_*` variables.
pub fn storefront_client() -> Result<StorefrontClient, CliError> {
    let shopify = ShopifyStorefrontConfig::from_env();
    let missing = shopify.missing_fields();
    if !missing.is_empty() {
        return Err(CliError::MissingShopifyConfig(missing));
    }
    let timeout = config::http_timeout_from_env()?;
    Ok(StorefrontClient::new(&shopify, timeout)?)
}

/// Sanity client from `SANITY_*` variables.
pub fn sanity_client() -> Result<SanityClient, CliError> {
    let sanity = SanityConfig::from_env()?;
    let timeout = config::http_timeout_from_env()?;
    Ok(SanityClient::new(&sanity, timeout)?)
}
