//! Persisted customer access token.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::shopify::{AccessToken, TokenGrant};

use super::{KeyValueStore, StoreError};

/// Slot holding the persisted token.
pub const AUTH_TOKEN_SLOT: &str = "authToken";

/// The persisted token record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    /// Bearer token.
    pub access_token: AccessToken,
    /// Expiry as reported by Shopify.
    pub expires_at: DateTime<Utc>,
}

impl From<TokenGrant> for StoredToken {
    fn from(grant: TokenGrant) -> Self {
        Self {
            access_token: grant.access_token,
            expires_at: grant.expires_at,
        }
    }
}

/// On-disk JSON shape of the slot.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenRecord {
    access_token: String,
    expires_at: DateTime<Utc>,
}

/// Typed access to the `authToken` slot.
#[derive(Clone)]
pub struct TokenStore {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Create a token store over a slot store.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the persisted token.
    ///
    /// A slot that does not decode (empty string, truncated JSON, an older
    /// shape) is treated as absent and removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Result<Option<StoredToken>, StoreError> {
        let Some(raw) = self.kv.get(AUTH_TOKEN_SLOT).await? else {
            return Ok(None);
        };

        match serde_json::from_str::<TokenRecord>(&raw) {
            Ok(record) if !record.access_token.is_empty() => Ok(Some(StoredToken {
                access_token: AccessToken::new(record.access_token),
                expires_at: record.expires_at,
            })),
            Ok(_) => {
                warn!("Persisted token is empty, removing");
                self.kv.remove(AUTH_TOKEN_SLOT).await?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Persisted token does not decode, removing");
                self.kv.remove(AUTH_TOKEN_SLOT).await?;
                Ok(None)
            }
        }
    }

    /// Persist a token, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be encoded or stored.
    #[instrument(skip(self, token), fields(expires_at = %token.expires_at))]
    pub async fn save(&self, token: &StoredToken) -> Result<(), StoreError> {
        let record = TokenRecord {
            access_token: token.access_token.expose().to_string(),
            expires_at: token.expires_at,
        };
        let raw = serde_json::to_string(&record)?;
        self.kv.save(AUTH_TOKEN_SLOT, &raw).await
    }

    /// Remove the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    #[instrument(skip(self))]
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove(AUTH_TOKEN_SLOT).await
    }
}
