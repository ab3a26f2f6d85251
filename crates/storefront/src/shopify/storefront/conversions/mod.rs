//! Type conversion functions for Shopify Storefront API responses.

pub mod cart;
pub mod customer;
pub mod products;

pub use cart::{convert_cart, convert_cart_payload};
pub use customer::{convert_customer, convert_token_payload};
pub use products::{convert_money, convert_product, convert_search_page};
