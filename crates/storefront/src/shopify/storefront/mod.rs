//! Shopify Storefront API client implementation.
//!
//! Uses `graphql_client` request/response envelopes with `reqwest` 0.13 for
//! HTTP. Catalog reads are cached using `moka` (5-minute TTL).

mod cache;
mod cart;
mod conversions;
mod customer;

pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use rust_decimal::prelude::ToPrimitive;
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use pocket_shop_core::Price;

use crate::config::ShopifyStorefrontConfig;
use crate::shopify::types::{Product, SearchPage, SearchParams, ShopPolicies, StoreContext};
use crate::shopify::{GraphQLError, GraphQLErrorLocation, ShopifyError};

use cache::{CacheKey, CacheValue};
use conversions::{convert_money, convert_product, convert_search_page};
use queries::{
    HighestPrice, ProductByHandle, SearchProducts, ShopPolicies as ShopPoliciesQuery,
    highest_price, product_by_handle, search_products, shop_policies,
};

/// Header carrying the public Storefront API token.
const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

// =============================================================================
// StorefrontClient
// =============================================================================

/// Client for the Shopify Storefront API.
///
/// Provides type-safe access to products, search, customer tokens and carts.
/// Catalog reads are cached for 5 minutes.
#[derive(Clone)]
pub struct StorefrontClient {
    inner: Arc<StorefrontClientInner>,
}

struct StorefrontClientInner {
    client: reqwest::Client,
    endpoint: String,
    access_token: String,
    cache: Cache<CacheKey, CacheValue>,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// Create a new Storefront API client.
    #[must_use]
    pub fn new(config: &ShopifyStorefrontConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(StorefrontClientInner {
                client: reqwest::Client::new(),
                endpoint: config.endpoint(),
                access_token: config.storefront_token.expose_secret().to_string(),
                cache,
            }),
        }
    }

    /// The GraphQL endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, ShopifyError> {
        let request_body = Q::build_query(variables);

        let response = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header(STOREFRONT_TOKEN_HEADER, &self.inner.access_token)
            .header("Content-Type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(ShopifyError::RateLimited(retry_after));
        }

        // Read the body as text first so failures can be logged verbatim
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Storefront API returned non-success status"
            );
            return Err(ShopifyError::message(format!(
                "HTTP {status}: {}",
                truncate(&response_text, 200)
            )));
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %truncate(&response_text, 500),
                    "Failed to parse Storefront GraphQL response"
                );
                return Err(ShopifyError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(ShopifyError::GraphQL(
                errors.into_iter().map(convert_graphql_error).collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                body = %truncate(&response_text, 500),
                "Storefront GraphQL response has no data and no errors"
            );
            ShopifyError::message("No data in response")
        })
    }

    // =========================================================================
    // Catalog Methods (cached)
    // =========================================================================

    /// Highest variant price in the shop, used to bound the price filter.
    ///
    /// Returns `None` when the shop has no products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(country = %context.country, language = %context.language))]
    pub async fn highest_price(&self, context: &StoreContext) -> Result<Option<Price>, ShopifyError> {
        let cache_key = CacheKey::HighestPrice(context.clone());

        if let Some(CacheValue::HighestPrice(price)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for highest price");
            return Ok(price);
        }

        let variables = highest_price::Variables {
            country: context.country.clone(),
            language: context.language.clone(),
        };

        let data = self.execute::<HighestPrice>(variables).await?;

        let price = data
            .products
            .into_nodes()
            .next()
            .map(|product| convert_money(product.price_range.max_variant_price));

        self.inner
            .cache
            .insert(cache_key, CacheValue::HighestPrice(price.clone()))
            .await;

        Ok(price)
    }

    /// Full-text product search with cursor pagination. Never cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(
        skip(self, params),
        fields(query = %params.query, first = params.first, after = ?params.after)
    )]
    pub async fn search_products(
        &self,
        params: &SearchParams,
        context: &StoreContext,
    ) -> Result<SearchPage, ShopifyError> {
        let product_filters = params.price.map(|price| {
            vec![search_products::ProductFilter {
                price: search_products::PriceRangeFilter {
                    min: price.min.to_f64(),
                    max: price.max.to_f64(),
                },
            }]
        });

        let variables = search_products::Variables {
            query: params.query.clone(),
            first: params.first,
            after: params.after.clone(),
            sort_key: Some(search_sort_key(params.sort_key).to_string()),
            reverse: Some(params.reverse),
            product_filters,
            country: context.country.clone(),
            language: context.language.clone(),
        };

        let data = self.execute::<SearchProducts>(variables).await?;

        Ok(convert_search_page(data.search))
    }

    /// Get a product by its handle.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if no product has this handle, or an
    /// error if the API request fails.
    #[instrument(skip(self, context), fields(handle = %handle, language = %context.language))]
    pub async fn product_by_handle(
        &self,
        handle: &str,
        context: &StoreContext,
    ) -> Result<Product, ShopifyError> {
        let cache_key = CacheKey::Product {
            handle: handle.to_string(),
            context: context.clone(),
        };

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let variables = product_by_handle::Variables {
            handle: handle.to_string(),
            country: context.country.clone(),
            language: context.language.clone(),
        };

        let data = self.execute::<ProductByHandle>(variables).await?;

        let product_data = data
            .product
            .ok_or_else(|| ShopifyError::NotFound(format!("Product not found: {handle}")))?;

        let product = convert_product(product_data);

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Shop name and legal policy links.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn shop_policies(&self) -> Result<ShopPolicies, ShopifyError> {
        if let Some(CacheValue::ShopPolicies(policies)) =
            self.inner.cache.get(&CacheKey::ShopPolicies).await
        {
            debug!("Cache hit for shop policies");
            return Ok(policies);
        }

        let data = self
            .execute::<ShopPoliciesQuery>(shop_policies::Variables::default())
            .await?;

        let policies = ShopPolicies {
            shop_name: data.shop.name,
            terms_of_service_url: data.shop.terms_of_service.map(|p| p.url),
            privacy_policy_url: data.shop.privacy_policy.map(|p| p.url),
        };

        self.inner
            .cache
            .insert(
                CacheKey::ShopPolicies,
                CacheValue::ShopPolicies(policies.clone()),
            )
            .await;

        Ok(policies)
    }
}

// =============================================================================
// Helpers
// =============================================================================

const fn search_sort_key(key: crate::shopify::types::SearchSortKey) -> &'static str {
    match key {
        crate::shopify::types::SearchSortKey::Relevance => "RELEVANCE",
        crate::shopify::types::SearchSortKey::Price => "PRICE",
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

fn convert_graphql_error(e: graphql_client::Error) -> GraphQLError {
    GraphQLError {
        message: e.message,
        locations: e.locations.map_or_else(Vec::new, |locs| {
            locs.into_iter()
                .map(|l| GraphQLErrorLocation {
                    line: i64::from(l.line),
                    column: i64::from(l.column),
                })
                .collect()
        }),
        path: e.path.map_or_else(Vec::new, |p| {
            p.into_iter()
                .map(|fragment| match fragment {
                    graphql_client::PathFragment::Key(s) => serde_json::Value::String(s),
                    graphql_client::PathFragment::Index(i) => serde_json::Value::Number(i.into()),
                })
                .collect()
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use rust_decimal::Decimal;
    use secrecy::SecretString;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use pocket_shop_core::Language;

    use super::*;
    use crate::shopify::types::{PriceFilter, SearchSortKey};

    pub(crate) fn client_for(server: &MockServer) -> StorefrontClient {
        StorefrontClient::new(&ShopifyStorefrontConfig {
            store: "pocket-test.myshopify.com".to_string(),
            api_version: "2025-01".to_string(),
            storefront_token: SecretString::from("3f9a0c41d27be85c6a1f04d9e2b7c813"),
            endpoint_override: Some(format!("{}/api/2025-01/graphql.json", server.uri())),
        })
    }

    pub(crate) async fn mount_operation(server: &MockServer, operation: &str, data: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/api/2025-01/graphql.json"))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_highest_price_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header(STOREFRONT_TOKEN_HEADER, "3f9a0c41d27be85c6a1f04d9e2b7c813"))
            .and(body_partial_json(json!({
                "operationName": "HighestPrice",
                "variables": { "country": "US", "language": "EN" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "products": { "edges": [
                    { "node": { "priceRange": { "maxVariantPrice": { "amount": "249.0", "currencyCode": "USD" } } } }
                ] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let context = StoreContext::default();
        let first = client.highest_price(&context).await.unwrap().unwrap();
        let second = client.highest_price(&context).await.unwrap().unwrap();

        assert_eq!(first.amount, Decimal::new(249, 0));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_highest_price_empty_shop() {
        let server = MockServer::start().await;
        mount_operation(&server, "HighestPrice", json!({ "products": { "edges": [] } })).await;

        let client = client_for(&server);
        let price = client.highest_price(&StoreContext::default()).await.unwrap();
        assert!(price.is_none());
    }

    #[tokio::test]
    async fn test_search_sends_filters_and_sort() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "operationName": "SearchProducts",
                "variables": {
                    "query": "shirt",
                    "sortKey": "PRICE",
                    "reverse": true,
                    "after": "c9",
                    "productFilters": [{ "price": { "min": 10.0, "max": 50.0 } }]
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "search": {
                    "pageInfo": { "hasNextPage": false, "endCursor": null },
                    "edges": []
                } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let params = SearchParams {
            after: Some("c9".to_string()),
            sort_key: SearchSortKey::Price,
            reverse: true,
            price: Some(PriceFilter {
                min: Decimal::new(10, 0),
                max: Decimal::new(50, 0),
            }),
            ..SearchParams::new("shirt")
        };
        let page = client
            .search_products(&params, &StoreContext::default())
            .await
            .unwrap();
        assert!(page.products.is_empty());
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_product_by_handle_not_found() {
        let server = MockServer::start().await;
        mount_operation(&server, "ProductByHandle", json!({ "product": null })).await;

        let client = client_for(&server);
        let context = StoreContext::default().english();
        let err = client
            .product_by_handle("missing", &context)
            .await
            .unwrap_err();
        assert!(matches!(err, ShopifyError::NotFound(_)));
        assert_eq!(context.language, Language::english());
    }

    #[tokio::test]
    async fn test_shop_policies() {
        let server = MockServer::start().await;
        mount_operation(
            &server,
            "ShopPolicies",
            json!({ "shop": {
                "name": "Pocket",
                "termsOfService": { "url": "https://pocket.example/policies/terms-of-service" },
                "privacyPolicy": null
            } }),
        )
        .await;

        let policies = client_for(&server).shop_policies().await.unwrap();
        assert_eq!(policies.shop_name, "Pocket");
        assert!(policies.terms_of_service_url.is_some());
        assert!(policies.privacy_policy_url.is_none());
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .mount(&server)
            .await;

        let err = client_for(&server).shop_policies().await.unwrap_err();
        assert!(matches!(err, ShopifyError::RateLimited(7)));
    }

    #[tokio::test]
    async fn test_graphql_errors_are_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{
                    "message": "Field 'shop' is missing",
                    "locations": [{ "line": 2, "column": 3 }],
                    "path": ["shop"]
                }]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).shop_policies().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "GraphQL errors: Field 'shop' is missing path: shop at line 2:3"
        );
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server).shop_policies().await.unwrap_err();
        assert!(err.to_string().contains("HTTP 502 Bad Gateway: bad gateway"));
    }

    #[tokio::test]
    async fn test_missing_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&server)
            .await;

        let err = client_for(&server).shop_policies().await.unwrap_err();
        assert_eq!(err.to_string(), "GraphQL errors: No data in response");
    }
}
