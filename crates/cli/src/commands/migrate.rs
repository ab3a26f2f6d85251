//! Device-local store migrations.
//!
//! # Usage
//!
//! ```bash
//! pocket-shop migrate
//! ```
//!
//! # Environment Variables
//!
//! - `POCKET_SHOP_DATABASE_URL` - `SQLite` URL (default `sqlite://pocket-shop.db?mode=rwc`)
//!
//! # Migration Files
//!
//! `crates/storefront/migrations/`, embedded into the binary.

use pocket_shop_storefront::config::StorefrontConfig;
use pocket_shop_storefront::error::Result;
use pocket_shop_storefront::store::{SqliteStore, run_migrations};

/// Open the store and apply pending migrations.
pub async fn run(config: &StorefrontConfig) -> Result<()> {
    tracing::info!("Opening device-local store...");
    let store = SqliteStore::connect(&config.database_url).await?;

    tracing::info!("Running migrations...");
    run_migrations(store.pool()).await?;

    tracing::info!("Migrations complete");
    super::print_json(&serde_json::json!({ "migrated": true }))
}
