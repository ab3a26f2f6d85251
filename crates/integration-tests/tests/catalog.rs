//! Catalog reads and the price filter against a mock Storefront API.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};
use wiremock::matchers::body_partial_json;
use wiremock::{Mock, ResponseTemplate};

use pocket_shop_integration_tests::TestContext;
use pocket_shop_storefront::screens::PriceFilter;
use pocket_shop_storefront::shopify::{SearchParams, SearchSortKey, ShopifyError};

fn product_node(id: u64, handle: &str, price: &str) -> Value {
    json!({
        "__typename": "Product",
        "id": format!("gid://shopify/Product/{id}"),
        "title": handle.replace('-', " "),
        "handle": handle,
        "productType": "Shirts",
        "availableForSale": true,
        "priceRange": {
            "minVariantPrice": { "amount": price, "currencyCode": "USD" },
            "maxVariantPrice": { "amount": price, "currencyCode": "USD" }
        },
        "images": { "edges": [] },
        "variants": { "edges": [{ "node": {
            "id": format!("gid://shopify/ProductVariant/{id}1"),
            "quantityAvailable": 4,
            "price": { "amount": price, "currencyCode": "USD" },
            "compareAtPrice": null
        } }] }
    })
}

#[tokio::test]
async fn test_search_paginates_with_price_filter() {
    let ctx = TestContext::new().await;
    ctx.mount(
        "HighestPrice",
        json!({ "products": { "edges": [{ "node": { "priceRange": {
            "maxVariantPrice": { "amount": "150.0", "currencyCode": "USD" }
        } } }] } }),
    )
    .await;
    Mock::given(body_partial_json(json!({
        "operationName": "SearchProducts",
        "variables": { "query": "shirt", "sortKey": "PRICE", "reverse": true }
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "search": {
        "pageInfo": { "hasNextPage": true, "endCursor": "c2" },
        "edges": [
            { "cursor": "c1", "node": product_node(1, "linen-shirt", "80.0") },
            { "cursor": "c2", "node": { "__typename": "Article" } }
        ]
    } } })))
    .up_to_n_times(1)
    .mount(&ctx.server)
    .await;
    Mock::given(body_partial_json(json!({
        "operationName": "SearchProducts",
        "variables": { "after": "c2" }
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "search": {
        "pageInfo": { "hasNextPage": false, "endCursor": "c3" },
        "edges": [{ "cursor": "c3", "node": product_node(2, "oxford-shirt", "60.0") }]
    } } })))
    .mount(&ctx.server)
    .await;

    let context = &ctx.app.config().context;
    let mut filter = PriceFilter::new();
    filter.load(ctx.app.storefront(), context).await;
    filter.set("50".parse().unwrap(), "500".parse().unwrap());

    let params = SearchParams {
        sort_key: SearchSortKey::Price,
        reverse: true,
        price: filter.as_search_filter(),
        ..SearchParams::new("shirt")
    };
    let first = ctx.app.storefront().search_products(&params, context).await.unwrap();
    assert_eq!(first.products.len(), 1);
    assert_eq!(first.products[0].handle, "linen-shirt");

    let next = params.next_page(&first).unwrap();
    let second = ctx.app.storefront().search_products(&next, context).await.unwrap();
    assert_eq!(second.products[0].handle, "oxford-shirt");
    assert!(params.next_page(&second).is_none());

    // The upper bound was clamped to the shop's highest price
    let requests = ctx.server.received_requests().await.unwrap();
    let search: Value = serde_json::from_slice(&requests.last().unwrap().body).unwrap();
    assert_eq!(
        search["variables"]["productFilters"][0]["price"]["max"],
        json!(150.0)
    );
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let ctx = TestContext::new().await;
    ctx.mount("ProductByHandle", json!({ "product": null })).await;

    let err = ctx
        .app
        .storefront()
        .product_by_handle("ghost", &ctx.app.config().context)
        .await
        .unwrap_err();
    assert!(matches!(err, ShopifyError::NotFound(_)));
}
