//! Session-related types.
//!
//! Keys under which per-visitor state is kept in the session.

/// Session keys for storefront data.
pub mod keys {
    /// Key for storing the Shopify cart ID.
    pub const CART_ID: &str = crate::cart::storage::CART_ID_SLOT;

    /// Key for the visitor's panel visibility.
    pub const VIEW_STATE: &str = "view_state";
}
