//! Application state shared across screens.

use std::sync::Arc;

use crate::cart::ShoppingCart;
use crate::config::StorefrontConfig;
use crate::error::Result;
use crate::session::{RenewalPolicy, Session, SystemClock};
use crate::shopify::StorefrontClient;
use crate::store::{CartStore, KeyValueStore, SqliteStore, TokenStore};

/// Everything built once at startup.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone, Debug)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

#[derive(Debug)]
struct AppStateInner {
    config: StorefrontConfig,
    storefront: StorefrontClient,
    session: Arc<Session>,
    cart: Arc<ShoppingCart>,
}

impl AppState {
    /// Open the on-device store at `config.database_url` and wire up the app.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn connect(config: StorefrontConfig) -> Result<Self> {
        let store = SqliteStore::connect(&config.database_url).await?;
        Ok(Self::with_store(config, Arc::new(store)))
    }

    /// Wire up the app over an existing slot store.
    #[must_use]
    pub fn with_store(config: StorefrontConfig, kv: Arc<dyn KeyValueStore>) -> Self {
        let storefront = StorefrontClient::new(&config.shopify);
        let session = Arc::new(Session::new(
            Arc::new(storefront.clone()),
            TokenStore::new(kv.clone()),
            Arc::new(SystemClock),
            RenewalPolicy::new(config.renewal_window),
        ));
        let cart = Arc::new(ShoppingCart::new(storefront.clone(), CartStore::new(kv)));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                storefront,
                session,
                cart,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the Shopify Storefront API client.
    #[must_use]
    pub fn storefront(&self) -> &StorefrontClient {
        &self.inner.storefront
    }

    /// The customer session.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        &self.inner.session
    }

    /// The customer's cart.
    #[must_use]
    pub fn cart(&self) -> &Arc<ShoppingCart> {
        &self.inner.cart
    }
}
