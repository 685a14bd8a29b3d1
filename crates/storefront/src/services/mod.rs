//! Clients for third-party services other than Shopify and Sanity.
//!
//! - `mailchimp` - Newsletter audience subscriptions

pub mod mailchimp;

pub use mailchimp::{MailchimpClient, MailchimpError};
