//! Domain types for the Shopify Storefront API.
//!
//! These types provide a clean, ergonomic API separate from the raw response
//! structs each operation deserializes into.

use core::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use pocket_shop_core::{
    AddressId, CartId, CartLineId, CountryCode, CustomerId, Email, ImageId, Language, Price,
    ProductId, VariantId,
};

// =============================================================================
// Context
// =============================================================================

/// Country and language sent through `@inContext` for localized prices and
/// translated content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoreContext {
    /// Buyer country.
    pub country: CountryCode,
    /// Content language.
    pub language: Language,
}

impl StoreContext {
    /// The same country with the language pinned to English.
    #[must_use]
    pub fn english(&self) -> Self {
        Self {
            country: self.country.clone(),
            language: Language::english(),
        }
    }
}

// =============================================================================
// Image Types
// =============================================================================

/// Product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    /// Shopify image ID.
    pub id: Option<ImageId>,
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Price range for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Price,
    /// Maximum price among all variants.
    pub max_variant_price: Price,
}

/// First variant of a product, as shown on a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSummary {
    /// Variant ID (add this to a cart).
    pub id: VariantId,
    /// Current price.
    pub price: Price,
    /// Original price when the variant is marked down.
    pub compare_at_price: Option<Price>,
    /// Units in stock, when the storefront token may read inventory.
    pub quantity_available: Option<i64>,
}

impl VariantSummary {
    /// Percentage off the compare-at price (zero when not on sale).
    #[must_use]
    pub fn discount_percent(&self) -> Decimal {
        self.price
            .discount_percent_from(self.compare_at_price.as_ref())
    }
}

/// A product as listed in search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// Merchant-defined product type.
    pub product_type: String,
    /// Whether any variant can be purchased.
    pub available_for_sale: bool,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// First product image.
    pub image: Option<Image>,
    /// First variant.
    pub first_variant: Option<VariantSummary>,
}

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Size", "Color").
    pub name: String,
    /// Selected value (e.g., "Large", "Blue").
    pub value: String,
}

/// A purchasable product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title (e.g., "Large / Blue").
    pub title: String,
    /// Whether this variant can be purchased.
    pub available_for_sale: bool,
    /// Units in stock.
    pub quantity_available: Option<i64>,
    /// Current price.
    pub price: Price,
    /// Original price when marked down.
    pub compare_at_price: Option<Price>,
    /// Option values selecting this variant.
    pub selected_options: Vec<SelectedOption>,
}

/// Full product detail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// URL handle.
    pub handle: String,
    /// Plain-text description.
    pub description: String,
    /// Merchant-defined product type.
    pub product_type: String,
    /// Product vendor.
    pub vendor: String,
    /// Whether any variant can be purchased.
    pub available_for_sale: bool,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Product images.
    pub images: Vec<Image>,
    /// Product variants.
    pub variants: Vec<ProductVariant>,
}

// =============================================================================
// Search Types
// =============================================================================

/// Sort order for product search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchSortKey {
    /// Best match first.
    #[default]
    Relevance,
    /// Cheapest first (or most expensive with `reverse`).
    Price,
}

/// Inclusive price bounds applied to a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceFilter {
    /// Lower bound.
    pub min: Decimal,
    /// Upper bound.
    pub max: Decimal,
}

/// Parameters for [`StorefrontClient::search_products`](super::StorefrontClient::search_products).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Full-text query.
    pub query: String,
    /// Page size.
    pub first: i64,
    /// Cursor of the last item on the previous page.
    pub after: Option<String>,
    /// Sort order.
    pub sort_key: SearchSortKey,
    /// Reverse the sort order.
    pub reverse: bool,
    /// Optional price bounds.
    pub price: Option<PriceFilter>,
}

impl SearchParams {
    /// Default page size, matching the search screen's grid.
    pub const DEFAULT_PAGE_SIZE: i64 = 10;

    /// First page of results for a query, sorted by relevance.
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            first: Self::DEFAULT_PAGE_SIZE,
            after: None,
            sort_key: SearchSortKey::Relevance,
            reverse: false,
            price: None,
        }
    }

    /// Parameters for the page following `page`, or `None` on the last page.
    #[must_use]
    pub fn next_page(&self, page: &SearchPage) -> Option<Self> {
        if !page.has_next_page {
            return None;
        }
        let cursor = page.end_cursor.clone()?;
        Some(Self {
            after: Some(cursor),
            ..self.clone()
        })
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPage {
    /// Products on this page.
    pub products: Vec<ProductSummary>,
    /// Whether another page exists.
    pub has_next_page: bool,
    /// Cursor of the last item on this page.
    pub end_cursor: Option<String>,
}

// =============================================================================
// Shop Types
// =============================================================================

/// Legal policy links published by the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopPolicies {
    /// Shop name.
    pub shop_name: String,
    /// Terms of service page.
    pub terms_of_service_url: Option<String>,
    /// Privacy policy page.
    pub privacy_policy_url: Option<String>,
}

// =============================================================================
// Customer Types
// =============================================================================

/// Customer access token issued by `customerAccessTokenCreate`.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wrap a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// The raw token, for request variables and persistence.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// A successfully issued (or renewed) customer access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenGrant {
    /// Bearer token.
    pub access_token: AccessToken,
    /// When Shopify stops accepting the token.
    pub expires_at: DateTime<Utc>,
}

/// Why Shopify declined to issue a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionCode {
    /// Unknown email, wrong password, or a token that no longer resolves.
    Unidentified,
    /// The account exists but is disabled or not yet activated.
    Unverified,
    /// Too many attempts.
    Throttled,
    /// Any other `CustomerErrorCode`.
    Other(String),
}

impl RejectionCode {
    /// Map a `CustomerErrorCode` value.
    #[must_use]
    pub fn from_api(code: Option<&str>) -> Self {
        match code {
            None | Some("UNIDENTIFIED_CUSTOMER" | "TOKEN_INVALID") => Self::Unidentified,
            Some("CUSTOMER_DISABLED") => Self::Unverified,
            Some(code) if code.contains("THROTTLED") || code.contains("LIMIT_EXCEEDED") => {
                Self::Throttled
            }
            Some(code) => Self::Other(code.to_string()),
        }
    }
}

/// A token mutation that completed but issued no token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("credentials rejected ({code:?}): {}", .messages.join("; "))]
pub struct CredentialRejection {
    /// Classified reason.
    pub code: RejectionCode,
    /// Messages returned by Shopify, possibly empty.
    pub messages: Vec<String>,
}

/// Outcome of a token mutation that reached Shopify.
pub type TokenGrantResult = Result<TokenGrant, CredentialRejection>;

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingAddress {
    /// Address ID.
    pub id: AddressId,
    /// Street address.
    pub address1: Option<String>,
    /// Apartment, suite, etc.
    pub address2: Option<String>,
    /// City.
    pub city: Option<String>,
    /// Province or state.
    pub province: Option<String>,
    /// Postal code.
    pub zip: Option<String>,
    /// Country name.
    pub country: Option<String>,
    /// Phone number.
    pub phone: Option<String>,
}

/// The customer a token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Customer ID.
    pub id: CustomerId,
    /// Email address.
    pub email: Option<Email>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// Name as Shopify displays it (falls back to the email).
    pub display_name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Default shipping address.
    pub default_address: Option<MailingAddress>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Line to add to a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
    /// Variant to purchase.
    pub merchandise_id: VariantId,
    /// Quantity.
    pub quantity: i64,
}

/// Quantity change for an existing cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineUpdateInput {
    /// Line to change.
    pub id: CartLineId,
    /// New quantity (zero removes the line).
    pub quantity: i64,
}

/// Variant referenced by a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: VariantId,
    /// Variant title.
    pub title: String,
    /// Parent product title.
    pub product_title: String,
    /// Parent product handle.
    pub product_handle: String,
    /// Unit price.
    pub price: Price,
    /// Variant image.
    pub image: Option<Image>,
}

/// A line in a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Line ID.
    pub id: CartLineId,
    /// Quantity.
    pub quantity: i64,
    /// Line total.
    pub total: Price,
    /// What is being purchased.
    pub merchandise: CartMerchandise,
}

/// Cart totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCost {
    /// Total before taxes and shipping.
    pub subtotal: Price,
    /// Amount the buyer pays.
    pub total: Price,
}

/// A Shopify cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: CartId,
    /// Web checkout URL.
    pub checkout_url: String,
    /// Total quantity across lines.
    pub total_quantity: i64,
    /// Customer the cart is attached to, if any.
    pub customer_id: Option<CustomerId>,
    /// Totals.
    pub cost: CartCost,
    /// Lines.
    pub lines: Vec<CartLine>,
}
