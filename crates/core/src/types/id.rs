//! Newtype IDs for Shopify global identifiers.
//!
//! Shopify identifies every resource with an opaque global ID string such as
//! `gid://shopify/ProductVariant/4242`. The `define_gid!` macro creates
//! wrappers that keep a cart ID from being passed where a line ID is expected.

/// Prefix shared by all Shopify global IDs.
pub const GID_PREFIX: &str = "gid://shopify/";

/// Macro to define a type-safe Shopify global ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`, `from_numeric()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use marquee_core::define_gid;
/// define_gid!(OrderId, "Order");
///
/// let id = OrderId::from_numeric(7);
/// assert_eq!(id.as_str(), "gid://shopify/Order/7");
/// assert_eq!(id.numeric(), Some(7));
/// ```
#[macro_export]
macro_rules! define_gid {
    ($name:ident, $resource:literal) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Shopify resource type name used in the global ID.
            pub const RESOURCE: &'static str = $resource;

            /// Wrap an existing global ID string.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Build a global ID from a legacy numeric resource ID.
            #[must_use]
            pub fn from_numeric(id: u64) -> Self {
                Self(format!("{}{}/{}", $crate::types::id::GID_PREFIX, $resource, id))
            }

            /// Get the underlying ID string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the ID string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Extract the legacy numeric ID, if this is a numeric global ID.
            #[must_use]
            pub fn numeric(&self) -> Option<u64> {
                self.0
                    .strip_prefix($crate::types::id::GID_PREFIX)?
                    .strip_prefix($resource)?
                    .strip_prefix('/')?
                    .split('?')
                    .next()?
                    .parse()
                    .ok()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_gid!(CartId, "Cart");
define_gid!(CartLineId, "CartLine");
define_gid!(VariantId, "ProductVariant");
define_gid!(ProductId, "Product");
define_gid!(CollectionId, "Collection");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_numeric() {
        let id = VariantId::from_numeric(4242);
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/4242");
        assert_eq!(id.numeric(), Some(4242));
    }

    #[test]
    fn test_numeric_ignores_query_suffix() {
        let id = CartLineId::new("gid://shopify/CartLine/17?cart=abc");
        assert_eq!(id.numeric(), Some(17));
    }

    #[test]
    fn test_numeric_on_opaque_id() {
        // Cart IDs are opaque tokens, not numbers
        let id = CartId::new("gid://shopify/Cart/Z2NwLXVzLWVhc3QxOjAxSE?key=abc");
        assert_eq!(id.numeric(), None);
    }

    #[test]
    fn test_numeric_wrong_resource() {
        let id = VariantId::new("gid://shopify/Product/1");
        assert_eq!(id.numeric(), None);
    }

    #[test]
    fn test_display_and_conversions() {
        let id = ProductId::from("gid://shopify/Product/1");
        assert_eq!(id.to_string(), "gid://shopify/Product/1");
        let raw: String = id.clone().into();
        assert_eq!(raw, id.into_inner());
    }
}
