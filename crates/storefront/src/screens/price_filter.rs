//! Price range filter for search results.

use rust_decimal::Decimal;
use serde::Serialize;

use pocket_shop_core::CurrencyCode;

use super::QueryState;
use crate::error::AppError;
use crate::shopify::{self, StoreContext, StorefrontClient};

/// Slider bounds: zero up to the most expensive variant in the shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBounds {
    pub min: Decimal,
    pub max: Decimal,
    /// `None` for an empty shop.
    pub currency: Option<CurrencyCode>,
}

/// Price filter sheet.
#[derive(Debug, Clone, Default)]
pub struct PriceFilter {
    bounds: QueryState<PriceBounds>,
    range: Option<(Decimal, Decimal)>,
}

impl PriceFilter {
    /// Number of slider positions across the bounds.
    const SLIDER_POSITIONS: u32 = 100;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load bounds from the shop's highest price.
    pub async fn load(&mut self, client: &StorefrontClient, context: &StoreContext) {
        self.bounds
            .refetch(|| async {
                let highest = client.highest_price(context).await?;
                Ok::<_, AppError>(PriceBounds {
                    min: Decimal::ZERO,
                    max: highest.as_ref().map_or(Decimal::ZERO, |p| p.amount),
                    currency: highest.map(|p| p.currency_code),
                })
            })
            .await;
        if let Some((min, max)) = self.range {
            self.set(min, max);
        }
    }

    #[must_use]
    pub const fn bounds(&self) -> &QueryState<PriceBounds> {
        &self.bounds
    }

    /// Slider increment: one unit for small ranges, otherwise a hundredth of
    /// the range rounded up to a whole unit.
    #[must_use]
    pub fn slider_step(&self) -> Decimal {
        let max = self.bounds.data().map_or(Decimal::ZERO, |b| b.max);
        let step = (max / Decimal::from(Self::SLIDER_POSITIONS)).ceil();
        step.max(Decimal::ONE)
    }

    /// Currently selected range, or the full bounds when nothing is set.
    #[must_use]
    pub fn range(&self) -> Option<(Decimal, Decimal)> {
        self.range
            .or_else(|| self.bounds.data().map(|b| (b.min, b.max)))
    }

    /// Whether a range narrower than the bounds is selected.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.range.is_some()
    }

    /// Select a range, clamped into the bounds. Reversed ends are swapped.
    pub fn set(&mut self, min: Decimal, max: Decimal) {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.range = Some(match self.bounds.data() {
            Some(b) => (lo.clamp(b.min, b.max), hi.clamp(b.min, b.max)),
            None => (lo.max(Decimal::ZERO), hi.max(Decimal::ZERO)),
        });
    }

    /// Back to the full bounds.
    pub const fn clear(&mut self) {
        self.range = None;
    }

    /// Price filter for a search, or `None` when nothing is selected.
    #[must_use]
    pub fn as_search_filter(&self) -> Option<shopify::PriceFilter> {
        self.range.map(|(min, max)| shopify::PriceFilter { min, max })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::MockServer;

    use super::*;
    use crate::shopify::test_support::{client_for, mount_operation};

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    async fn loaded(highest: Option<&str>) -> PriceFilter {
        let server = MockServer::start().await;
        let edges = highest.map_or_else(Vec::new, |amount| {
            vec![json!({ "node": { "priceRange": { "maxVariantPrice": {
                "amount": amount, "currencyCode": "USD"
            } } } })]
        });
        mount_operation(&server, "HighestPrice", json!({ "products": { "edges": edges } })).await;

        let mut filter = PriceFilter::new();
        filter
            .load(&client_for(&server), &StoreContext::default())
            .await;
        filter
    }

    #[tokio::test]
    async fn test_bounds_from_highest_price() {
        let filter = loaded(Some("480.00")).await;
        let bounds = filter.bounds().data().unwrap();
        assert_eq!(bounds.min, Decimal::ZERO);
        assert_eq!(bounds.max, dec("480.00"));
        assert_eq!(filter.slider_step(), dec("5"));
        assert_eq!(filter.range(), Some((Decimal::ZERO, dec("480.00"))));
        assert!(filter.as_search_filter().is_none());
    }

    #[tokio::test]
    async fn test_empty_shop_has_zero_bounds() {
        let filter = loaded(None).await;
        let bounds = filter.bounds().data().unwrap();
        assert_eq!(bounds.max, Decimal::ZERO);
        assert!(bounds.currency.is_none());
        assert_eq!(filter.slider_step(), Decimal::ONE);
    }

    #[tokio::test]
    async fn test_set_clamps_and_clear_resets() {
        let mut filter = loaded(Some("200")).await;

        filter.set(dec("350"), dec("-10"));
        assert_eq!(filter.range(), Some((Decimal::ZERO, dec("200"))));

        filter.set(dec("20"), dec("80"));
        let search = filter.as_search_filter().unwrap();
        assert_eq!((search.min, search.max), (dec("20"), dec("80")));

        filter.clear();
        assert!(!filter.is_active());
        assert_eq!(filter.range(), Some((Decimal::ZERO, dec("200"))));
    }
}
