//! Marquee Core - Shared types library.
//!
//! This crate provides common types used across all Marquee components:
//! - `storefront` - Headless storefront API server and client library
//! - `cli` - Command-line cart and content tools
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for Shopify IDs, prices, emails, and locales

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
