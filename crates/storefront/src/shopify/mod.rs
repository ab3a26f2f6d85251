//! Shopify Storefront API client.
//!
//! # Architecture
//!
//! - Operations implement `graphql_client::GraphQLQuery` by hand, with the
//!   query document kept next to its typed variables and response structs
//! - Shopify is source of truth: products, carts and customers are fetched on
//!   demand and never reconciled locally
//! - Catalog reads are cached in memory via `moka` (5 minute TTL)
//! - Soft failures (`customerUserErrors`, missing payloads) are normalized
//!   into typed results here, so callers never inspect payload shape
//!
//! # Example
//!
//! ```rust,ignore
//! use pocket_shop_storefront::shopify::{SearchParams, StorefrontClient};
//!
//! let client = StorefrontClient::new(&config.shopify);
//!
//! let page = client
//!     .search_products(&SearchParams::new("sunglasses"), &config.context)
//!     .await?;
//!
//! match client.create_customer_access_token(&email, &password).await? {
//!     Ok(grant) => println!("expires {}", grant.expires_at),
//!     Err(rejection) => println!("rejected: {rejection}"),
//! }
//! ```

mod storefront;
pub mod types;

pub use storefront::StorefrontClient;
pub use types::*;

#[cfg(test)]
pub(crate) use storefront::tests as test_support;

use thiserror::Error;

/// Errors that can occur when interacting with the Storefront API.
#[derive(Debug, Error)]
pub enum ShopifyError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GraphQL query returned errors.
    #[error("GraphQL errors: {}", format_graphql_errors(.0))]
    GraphQL(Vec<GraphQLError>),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by Shopify.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// User error from mutation (e.g., invalid input).
    #[error("User error: {0}")]
    UserError(String),
}

impl ShopifyError {
    /// Build a single-message GraphQL error.
    pub(crate) fn message(message: impl Into<String>) -> Self {
        Self::GraphQL(vec![GraphQLError {
            message: message.into(),
            locations: vec![],
            path: vec![],
        }])
    }

    /// Whether the failure originates on the Shopify side (as opposed to bad
    /// input or a missing resource) and is worth reporting.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        matches!(self, Self::Http(_) | Self::GraphQL(_) | Self::Parse(_))
    }
}

/// A GraphQL error returned by the Shopify API.
#[derive(Debug, Clone)]
pub struct GraphQLError {
    /// Error message.
    pub message: String,
    /// Source locations in the query.
    pub locations: Vec<GraphQLErrorLocation>,
    /// Path to the error in the response.
    pub path: Vec<serde_json::Value>,
}

/// Location in a GraphQL query where an error occurred.
#[derive(Debug, Clone)]
pub struct GraphQLErrorLocation {
    /// Line number (1-indexed).
    pub line: i64,
    /// Column number (1-indexed).
    pub column: i64,
}

fn format_graphql_errors(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "(no error details provided)".to_string();
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| {
            let mut parts = Vec::new();

            if !e.message.is_empty() {
                parts.push(e.message.clone());
            }

            if !e.path.is_empty() {
                let path_str = e
                    .path
                    .iter()
                    .map(|p| match p {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(".");
                parts.push(format!("path: {path_str}"));
            }

            if let Some(loc) = e.locations.first() {
                parts.push(format!("at line {}:{}", loc.line, loc.column));
            }

            if parts.is_empty() {
                format!("[error {}]: (no details)", i + 1)
            } else {
                parts.join(" ")
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shopify_error_display() {
        let err = ShopifyError::NotFound("product with handle 'sunnies'".to_string());
        assert_eq!(err.to_string(), "Not found: product with handle 'sunnies'");
    }

    #[test]
    fn test_graphql_error_formatting() {
        let errors = vec![
            GraphQLError {
                message: "Field 'priceV2' doesn't exist on type 'ProductVariant'".to_string(),
                locations: vec![],
                path: vec![],
            },
            GraphQLError {
                message: "Invalid ID".to_string(),
                locations: vec![],
                path: vec![],
            },
        ];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'priceV2' doesn't exist on type 'ProductVariant'; Invalid ID"
        );
    }

    #[test]
    fn test_graphql_error_empty_messages() {
        // Test with empty messages but with path info
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![GraphQLErrorLocation { line: 5, column: 10 }],
            path: vec![
                serde_json::Value::String("search".to_string()),
                serde_json::Value::Number(0.into()),
            ],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: path: search.0 at line 5:10"
        );
    }

    #[test]
    fn test_graphql_error_no_details() {
        let errors = vec![GraphQLError {
            message: String::new(),
            locations: vec![],
            path: vec![],
        }];
        let err = ShopifyError::GraphQL(errors);
        assert_eq!(err.to_string(), "GraphQL errors: [error 1]: (no details)");
    }

    #[test]
    fn test_graphql_error_empty_vec() {
        let err = ShopifyError::GraphQL(vec![]);
        assert_eq!(
            err.to_string(),
            "GraphQL errors: (no error details provided)"
        );
    }

    #[test]
    fn test_message_helper() {
        let err = ShopifyError::message("No data in response");
        assert_eq!(err.to_string(), "GraphQL errors: No data in response");
        assert!(err.is_server_side());
    }

    #[test]
    fn test_not_found_is_not_server_side() {
        assert!(!ShopifyError::NotFound("cart".to_string()).is_server_side());
        assert!(!ShopifyError::RateLimited(2).is_server_side());
    }

    #[test]
    fn test_rate_limited_error() {
        let err = ShopifyError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
    }
}
