//! Catalog commands: search, highest-price, product.

use rust_decimal::Decimal;
use serde_json::json;

use pocket_shop_storefront::AppState;
use pocket_shop_storefront::error::{AppError, Result};
use pocket_shop_storefront::screens::PriceFilter;
use pocket_shop_storefront::shopify::{SearchParams, SearchSortKey};

/// Parsed `search` arguments.
pub struct SearchArgs {
    pub query: String,
    pub first: i64,
    pub after: Option<String>,
    pub sort_key: SearchSortKey,
    pub reverse: bool,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Search products. Price bounds are clamped the way the filter sheet does.
pub async fn search(app: &AppState, args: SearchArgs) -> Result<()> {
    let price = if args.min_price.is_some() || args.max_price.is_some() {
        let mut filter = PriceFilter::new();
        filter.load(app.storefront(), &app.config().context).await;
        let (lo, hi) = filter.range().unwrap_or((Decimal::ZERO, Decimal::MAX));
        filter.set(args.min_price.unwrap_or(lo), args.max_price.unwrap_or(hi));
        filter.as_search_filter()
    } else {
        None
    };

    let params = SearchParams {
        first: args.first,
        after: args.after,
        sort_key: args.sort_key,
        reverse: args.reverse,
        price,
        ..SearchParams::new(args.query)
    };

    let page = app
        .storefront()
        .search_products(&params, &app.config().context)
        .await?;
    super::print_json(&page)
}

/// Print the price filter bounds.
pub async fn highest_price(app: &AppState) -> Result<()> {
    let mut filter = PriceFilter::new();
    filter.load(app.storefront(), &app.config().context).await;

    if let Some(message) = filter.bounds().error() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    super::print_json(&json!({
        "bounds": filter.bounds().data(),
        "sliderStep": filter.slider_step(),
    }))
}

/// Print a product by handle.
pub async fn product(app: &AppState, handle: &str) -> Result<()> {
    let product = app
        .storefront()
        .product_by_handle(handle, &app.config().context)
        .await?;
    super::print_json(&product)
}
