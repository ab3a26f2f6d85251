//! Device-local key-value persistence.
//!
//! Stores local data only (Shopify is source of truth for everything else):
//!
//! ## Slots
//!
//! - `authToken` - Customer access token and its expiry ([`TokenStore`])
//! - `cartId` - Shopify cart ID for the current device ([`CartStore`])
//!
//! Slot values are JSON strings; there is no schema versioning of their
//! contents.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and embedded with
//! `sqlx::migrate!`. [`SqliteStore::connect`] runs them on open; the CLI also
//! exposes them:
//! ```bash
//! pocket-shop migrate
//! ```

mod cart;
mod memory;
mod sqlite;
mod token;

pub use cart::{CART_ID_SLOT, CartStore};
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, run_migrations};
pub use token::{AUTH_TOKEN_SLOT, StoredToken, TokenStore};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur in the device-local store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Embedded migrations failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A slot value could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A named-slot string store.
///
/// `save` upserts and `remove` is idempotent.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a slot.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a slot, replacing any previous value.
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a slot if present.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
