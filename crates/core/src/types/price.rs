//! Type-safe price representation using decimal arithmetic.
//!
//! Shopify returns money as `{ amount: "19.99", currencyCode: "USD" }`; amounts
//! are parsed into [`Decimal`] so price filters and discount math never go
//! through floating point.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    /// The currency code is not three ASCII letters.
    #[error("invalid currency code: {0:?}")]
    InvalidCurrency(String),
}

/// ISO 4217 currency code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code; lowercase input is accepted.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not three ASCII letters.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        if s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(s.to_ascii_uppercase()))
        } else {
            Err(PriceError::InvalidCurrency(s.to_owned()))
        }
    }

    /// Returns the upper-case code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self("USD".to_owned())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = PriceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Build a price from the string pair returned by the Storefront API.
    ///
    /// # Errors
    ///
    /// Returns an error if either the amount or the currency code is malformed.
    pub fn from_api(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount =
            Decimal::from_str(amount).map_err(|_| PriceError::InvalidAmount(amount.to_owned()))?;
        Ok(Self::new(amount, CurrencyCode::parse(currency_code)?))
    }

    /// Percentage saved relative to a compare-at (original) price, rounded to
    /// two decimal places.
    ///
    /// Returns zero when there is no compare-at price, when currencies differ,
    /// or when the compare-at price is not above this price.
    #[must_use]
    pub fn discount_percent_from(&self, compare_at: Option<&Self>) -> Decimal {
        let Some(original) = compare_at else {
            return Decimal::ZERO;
        };
        if original.currency_code != self.currency_code
            || original.amount <= self.amount
            || original.amount.is_zero()
        {
            return Decimal::ZERO;
        }
        ((original.amount - self.amount) / original.amount * Decimal::ONE_HUNDRED).round_dp(2)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:.2}", self.currency_code, self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_api() {
        let price = Price::from_api("19.99", "usd").unwrap();
        assert_eq!(price.amount, Decimal::new(1999, 2));
        assert_eq!(price.currency_code.as_str(), "USD");
    }

    #[test]
    fn test_from_api_rejects_bad_input() {
        assert_eq!(
            Price::from_api("abc", "USD"),
            Err(PriceError::InvalidAmount("abc".to_owned()))
        );
        assert!(matches!(
            Price::from_api("1.00", "US"),
            Err(PriceError::InvalidCurrency(_))
        ));
    }

    #[test]
    fn test_discount_percent() {
        let sale = Price::from_api("75.00", "USD").unwrap();
        let original = Price::from_api("100.00", "USD").unwrap();
        assert_eq!(
            sale.discount_percent_from(Some(&original)),
            Decimal::new(25, 0)
        );
    }

    #[test]
    fn test_discount_percent_without_markdown() {
        let price = Price::from_api("100.00", "USD").unwrap();
        let cheaper = Price::from_api("80.00", "USD").unwrap();
        let other_currency = Price::from_api("150.00", "EUR").unwrap();

        assert_eq!(price.discount_percent_from(None), Decimal::ZERO);
        assert_eq!(price.discount_percent_from(Some(&cheaper)), Decimal::ZERO);
        assert_eq!(
            price.discount_percent_from(Some(&other_currency)),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_display() {
        let price = Price::from_api("5", "AED").unwrap();
        assert_eq!(price.to_string(), "AED 5.00");
    }
}
