//! Cache types for Storefront API responses.

use pocket_shop_core::Price;

use crate::shopify::types::{Product, ShopPolicies, StoreContext};

/// Cache key for catalog reads. Customer and cart data are never cached.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    HighestPrice(StoreContext),
    Product {
        handle: String,
        context: StoreContext,
    },
    ShopPolicies,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    HighestPrice(Option<Price>),
    Product(Box<Product>),
    ShopPolicies(ShopPolicies),
}
