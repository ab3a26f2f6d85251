//! Product and search type conversion functions.

use pocket_shop_core::Price;

use crate::shopify::types::{
    Image, PriceRange, Product, ProductSummary, ProductVariant, SearchPage, SelectedOption,
    VariantSummary,
};

use super::super::queries::common::{ImageFields, MoneyV2};
use super::super::queries::{product_by_handle, search_products};

pub fn convert_money(money: MoneyV2) -> Price {
    Price::new(money.amount, money.currency_code)
}

pub fn convert_image(image: ImageFields) -> Image {
    Image {
        id: image.id,
        url: image.url,
        alt_text: image.alt_text,
    }
}

fn convert_price_range(range: search_products::PriceRange) -> PriceRange {
    PriceRange {
        min_variant_price: convert_money(range.min_variant_price),
        max_variant_price: convert_money(range.max_variant_price),
    }
}

// =============================================================================
// Search
// =============================================================================

fn convert_product_summary(product: search_products::ProductSummaryFields) -> ProductSummary {
    ProductSummary {
        id: product.id,
        title: product.title,
        handle: product.handle,
        product_type: product.product_type,
        available_for_sale: product.available_for_sale,
        price_range: convert_price_range(product.price_range),
        image: product.images.into_nodes().next().map(convert_image),
        first_variant: product.variants.into_nodes().next().map(|v| VariantSummary {
            id: v.id,
            price: convert_money(v.price),
            compare_at_price: v.compare_at_price.map(convert_money),
            quantity_available: v.quantity_available,
        }),
    }
}

/// Convert a search connection, dropping non-product results.
pub fn convert_search_page(connection: search_products::SearchConnection) -> SearchPage {
    let products = connection
        .edges
        .into_iter()
        .filter_map(|edge| match edge.node {
            search_products::SearchNode::Product(product) => {
                Some(convert_product_summary(*product))
            }
            search_products::SearchNode::Other => None,
        })
        .collect();

    SearchPage {
        products,
        has_next_page: connection.page_info.has_next_page,
        end_cursor: connection.page_info.end_cursor,
    }
}

// =============================================================================
// Product Detail
// =============================================================================

pub fn convert_product(product: product_by_handle::ProductFields) -> Product {
    Product {
        id: product.id,
        title: product.title,
        handle: product.handle,
        description: product.description,
        product_type: product.product_type,
        vendor: product.vendor,
        available_for_sale: product.available_for_sale,
        price_range: convert_price_range(product.price_range),
        images: product.images.into_nodes().map(convert_image).collect(),
        variants: product
            .variants
            .into_nodes()
            .map(|v| ProductVariant {
                id: v.id,
                title: v.title,
                available_for_sale: v.available_for_sale,
                quantity_available: v.quantity_available,
                price: convert_money(v.price),
                compare_at_price: v.compare_at_price.map(convert_money),
                selected_options: v
                    .selected_options
                    .into_iter()
                    .map(|o| SelectedOption {
                        name: o.name,
                        value: o.value,
                    })
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn search_json() -> serde_json::Value {
        serde_json::json!({
            "search": {
                "pageInfo": { "hasNextPage": true, "endCursor": "c2" },
                "edges": [
                    {
                        "cursor": "c1",
                        "node": {
                            "__typename": "Product",
                            "id": "gid://shopify/Product/1",
                            "title": "Linen Shirt",
                            "handle": "linen-shirt",
                            "productType": "Shirts",
                            "availableForSale": true,
                            "priceRange": {
                                "minVariantPrice": { "amount": "45.0", "currencyCode": "USD" },
                                "maxVariantPrice": { "amount": "60.0", "currencyCode": "USD" }
                            },
                            "images": { "edges": [
                                { "node": { "id": "gid://shopify/ProductImage/9", "url": "https://cdn.shopify.com/s/1.jpg", "altText": null } }
                            ] },
                            "variants": { "edges": [
                                { "node": {
                                    "id": "gid://shopify/ProductVariant/11",
                                    "quantityAvailable": 3,
                                    "price": { "amount": "45.0", "currencyCode": "USD" },
                                    "compareAtPrice": { "amount": "60.0", "currencyCode": "USD" }
                                } }
                            ] }
                        }
                    },
                    { "cursor": "c2", "node": { "__typename": "Article" } }
                ]
            }
        })
    }

    #[test]
    fn test_convert_search_page_keeps_products_only() {
        let data: search_products::ResponseData =
            serde_json::from_value(search_json()).unwrap();
        let page = convert_search_page(data.search);

        assert_eq!(page.products.len(), 1);
        assert!(page.has_next_page);
        assert_eq!(page.end_cursor.as_deref(), Some("c2"));

        let product = page.products.first().unwrap();
        assert_eq!(product.handle, "linen-shirt");
        assert_eq!(
            product.image.as_ref().unwrap().url,
            "https://cdn.shopify.com/s/1.jpg"
        );
        let variant = product.first_variant.as_ref().unwrap();
        assert_eq!(variant.quantity_available, Some(3));
        assert_eq!(variant.discount_percent(), Decimal::new(25, 0));
    }

    #[test]
    fn test_convert_money() {
        let money: MoneyV2 =
            serde_json::from_value(serde_json::json!({ "amount": "12.50", "currencyCode": "EUR" }))
                .unwrap();
        let price = convert_money(money);
        assert_eq!(price.amount, Decimal::new(1250, 2));
        assert_eq!(price.currency_code.as_str(), "EUR");
    }
}
