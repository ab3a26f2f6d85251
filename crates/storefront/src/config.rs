//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPIFY_STORE` - Shopify store domain (e.g., your-store.myshopify.com)
//! - `SHOPIFY_STOREFRONT_TOKEN` - Storefront API public access token
//!
//! ## Optional
//! - `SHOPIFY_API_VERSION` - API version (default: 2025-01)
//! - `SHOPIFY_STOREFRONT_ENDPOINT` - Full GraphQL endpoint URL, overriding the
//!   one derived from the store domain (used against staging proxies and mocks)
//! - `POCKET_SHOP_DATABASE_URL` - Device-local `SQLite` database
//!   (default: `sqlite://pocket-shop.db?mode=rwc`)
//! - `POCKET_SHOP_COUNTRY` - `@inContext` country (default: US)
//! - `POCKET_SHOP_LANGUAGE` - `@inContext` language (default: EN)
//! - `POCKET_SHOP_RENEWAL_WINDOW_DAYS` - Days before expiry in which the
//!   customer token is renewed on start (default: 7)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Sentry error sample rate (default: 1.0)

use std::collections::HashMap;

use chrono::Duration;
use secrecy::SecretString;
use thiserror::Error;

use pocket_shop_core::{CountryCode, Language};

use crate::shopify::StoreContext;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;
const DEFAULT_API_VERSION: &str = "2025-01";
const DEFAULT_DATABASE_URL: &str = "sqlite://pocket-shop.db?mode=rwc";
const DEFAULT_RENEWAL_WINDOW_DAYS: i64 = 7;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Shopify Storefront API configuration
    pub shopify: ShopifyStorefrontConfig,
    /// `SQLite` URL for the device-local key-value store
    pub database_url: String,
    /// Default `@inContext` country and language
    pub context: StoreContext,
    /// Trailing window before token expiry in which renewal is attempted
    pub renewal_window: Duration,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
}

/// Shopify Storefront API configuration.
///
/// Implements `Debug` manually to redact the access token.
#[derive(Clone)]
pub struct ShopifyStorefrontConfig {
    /// Shopify store domain (e.g., your-store.myshopify.com)
    pub store: String,
    /// Shopify API version (e.g., 2025-01)
    pub api_version: String,
    /// Storefront API public access token
    pub storefront_token: SecretString,
    /// Explicit endpoint overriding the one derived from `store`
    pub endpoint_override: Option<String>,
}

impl std::fmt::Debug for ShopifyStorefrontConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyStorefrontConfig")
            .field("store", &self.store)
            .field("api_version", &self.api_version)
            .field("storefront_token", &"[REDACTED]")
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

impl ShopifyStorefrontConfig {
    /// GraphQL endpoint for this store and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        self.endpoint_override.clone().unwrap_or_else(|| {
            format!(
                "https://{}/api/{}/graphql.json",
                self.store, self.api_version
            )
        })
    }

    fn from_vars(vars: &Vars<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            store: vars.required("SHOPIFY_STORE")?,
            api_version: vars.or_default("SHOPIFY_API_VERSION", DEFAULT_API_VERSION),
            storefront_token: vars.validated_secret("SHOPIFY_STOREFRONT_TOKEN")?,
            endpoint_override: vars.optional("SHOPIFY_STOREFRONT_ENDPOINT"),
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the access token fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(lookup);
        let shopify = ShopifyStorefrontConfig::from_vars(&vars)?;
        let database_url = vars.or_default("POCKET_SHOP_DATABASE_URL", DEFAULT_DATABASE_URL);

        let country = CountryCode::parse(&vars.or_default("POCKET_SHOP_COUNTRY", "US"))
            .map_err(|e| ConfigError::InvalidEnvVar("POCKET_SHOP_COUNTRY".to_string(), e.to_string()))?;
        let language = Language::parse(&vars.or_default("POCKET_SHOP_LANGUAGE", "EN"))
            .map_err(|e| {
                ConfigError::InvalidEnvVar("POCKET_SHOP_LANGUAGE".to_string(), e.to_string())
            })?;

        let renewal_window_days =
            vars.parse_or_default("POCKET_SHOP_RENEWAL_WINDOW_DAYS", DEFAULT_RENEWAL_WINDOW_DAYS)?;
        let renewal_window = Duration::try_days(renewal_window_days)
            .filter(|window| *window >= Duration::zero())
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "POCKET_SHOP_RENEWAL_WINDOW_DAYS".to_string(),
                    format!("{renewal_window_days} is not a valid number of days"),
                )
            })?;

        let sentry_sample_rate = vars.parse_or_default("SENTRY_SAMPLE_RATE", 1.0_f32)?;
        if !(0.0..=1.0).contains(&sentry_sample_rate) {
            return Err(ConfigError::InvalidEnvVar(
                "SENTRY_SAMPLE_RATE".to_string(),
                "must be between 0.0 and 1.0".to_string(),
            ));
        }

        Ok(Self {
            shopify,
            database_url,
            context: StoreContext { country, language },
            renewal_window,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source, the process environment outside tests.
struct Vars<'a>(&'a dyn Fn(&str) -> Option<String>);

impl Vars<'_> {
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.trim().is_empty())
    }

    fn or_default(&self, key: &str, default: &str) -> String {
        (self.0)(key).unwrap_or_else(|| default.to_string())
    }

    fn parse_or_default<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string())),
            None => Ok(default),
        }
    }

    /// Load a secret and reject placeholders or low-entropy values.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(value.trim(), key)?;
        Ok(SecretString::from(value.trim().to_string()))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Storefront tokens are 32 hex chars, which sit comfortably above 3 bits/char
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Copy the token from the Shopify admin."
            ),
        ));
    }

    Ok(())
}
