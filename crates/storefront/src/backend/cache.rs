//! Cache types for backend API responses.

use crate::backend::types::{Product, StoreRecord};

/// Cache key for catalog and store lookups.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(String),
    Products { limit: Option<i64> },
    StoreByHost(String),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Store(Box<StoreRecord>),
}
