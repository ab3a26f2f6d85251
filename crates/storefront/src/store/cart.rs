//! Persisted cart ID.

use std::sync::Arc;

use pocket_shop_core::CartId;

use super::{KeyValueStore, StoreError};

/// Slot holding the device's cart ID.
pub const CART_ID_SLOT: &str = "cartId";

/// Typed access to the `cartId` slot.
#[derive(Clone)]
pub struct CartStore {
    kv: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

impl CartStore {
    /// Create a cart store over a slot store.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the persisted cart ID. An unparseable value is dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub async fn load_cart_id(&self) -> Result<Option<CartId>, StoreError> {
        let Some(raw) = self.kv.get(CART_ID_SLOT).await? else {
            return Ok(None);
        };
        if let Ok(id) = CartId::parse(&raw) {
            Ok(Some(id))
        } else {
            tracing::warn!("Persisted cart id is not a cart gid, removing");
            self.kv.remove(CART_ID_SLOT).await?;
            Ok(None)
        }
    }

    /// Persist the cart ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub async fn save_cart_id(&self, id: &CartId) -> Result<(), StoreError> {
        self.kv.save(CART_ID_SLOT, id.as_str()).await
    }

    /// Forget the cart ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store fails.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.kv.remove(CART_ID_SLOT).await
    }
}
