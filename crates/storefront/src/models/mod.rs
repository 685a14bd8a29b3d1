//! Domain models for storefront.
//!
//! Session-scoped state lives in [`session`]; Shopify and CMS shapes live
//! beside their clients.

pub mod session;
