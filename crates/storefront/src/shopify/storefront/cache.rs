//! Cache types for Storefront API responses.

use crate::shopify::types::{
    CollectionConnection, CollectionWithProducts, Product, ProductConnection, Shop,
};

/// Cache key for catalog responses.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products { first: i64, after: Option<String> },
    Collection { handle: String, first: i64, after: Option<String> },
    Collections { first: i64, after: Option<String> },
    Shop,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductConnection),
    Collection(Box<CollectionWithProducts>),
    Collections(CollectionConnection),
    Shop(Shop),
}
