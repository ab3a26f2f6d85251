//! `SQLite`-backed slot store, the on-device implementation.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::instrument;

use super::{KeyValueStore, StoreError};

/// Slot store over a `SQLite` `kv` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `database_url` and apply
    /// embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the connection cannot be established,
    /// or `StoreError::Migration` if migrations fail.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await?;
        Self::from_pool(pool).await
    }

    /// Private in-memory database, for tests and ephemeral sessions.
    ///
    /// # Errors
    ///
    /// Returns an error if `SQLite` cannot be opened or migrated.
    pub async fn in_memory() -> Result<Self, StoreError> {
        // A single connection keeps every query on the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Self::from_pool(pool).await
    }

    /// Wrap an existing pool, applying embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Migration` if migrations fail.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        run_migrations(&pool).await?;
        Ok(Self { pool })
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Apply the embedded migrations to `pool`.
///
/// # Errors
///
/// Returns `StoreError::Migration` if a migration fails or the applied set
/// diverges from the embedded one.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    #[instrument(skip(self))]
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv WHERE key = ?1")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    #[instrument(skip(self, value))]
    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r"
            INSERT INTO kv (key, value) VALUES (?1, ?2)
            ON CONFLICT (key) DO UPDATE SET
                value = excluded.value,
                updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
            ",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_get_remove() {
        let store = SqliteStore::in_memory().await.unwrap();

        assert_eq!(store.get("authToken").await.unwrap(), None);

        store.save("authToken", "{\"a\":1}").await.unwrap();
        assert_eq!(
            store.get("authToken").await.unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.save("authToken", "{\"a\":2}").await.unwrap();
        assert_eq!(
            store.get("authToken").await.unwrap().as_deref(),
            Some("{\"a\":2}")
        );

        store.remove("authToken").await.unwrap();
        store.remove("authToken").await.unwrap();
        assert_eq!(store.get("authToken").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_slots_are_independent() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.save("authToken", "t").await.unwrap();
        store.save("cartId", "c").await.unwrap();
        store.remove("authToken").await.unwrap();
        assert_eq!(store.get("cartId").await.unwrap().as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        run_migrations(store.pool()).await.unwrap();
    }
}
