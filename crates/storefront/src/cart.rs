//! Local shopping cart.
//!
//! Shopify owns the cart; the device only keeps its id (in the `cartId` slot)
//! and the last cart returned by the API. Operations are serialized so two
//! screens adding at once never create two carts.

use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use pocket_shop_core::{CartId, CartLineId, VariantId};

use crate::error::{AppError, Result};
use crate::shopify::{
    AccessToken, Cart, CartLineInput, CartLineUpdateInput, ShopifyError, StorefrontClient,
};
use crate::store::CartStore;

/// The customer's cart.
#[derive(Debug)]
pub struct ShoppingCart {
    client: StorefrontClient,
    store: CartStore,
    current: Mutex<Option<Cart>>,
}

impl ShoppingCart {
    /// Create a cart handle. Nothing is fetched until first use.
    #[must_use]
    pub fn new(client: StorefrontClient, store: CartStore) -> Self {
        Self {
            client,
            store,
            current: Mutex::new(None),
        }
    }

    /// Last cart returned by the API.
    pub async fn current(&self) -> Option<Cart> {
        self.current.lock().await.clone()
    }

    /// Load the persisted cart, or create one if there is none or it has
    /// expired.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request or the cart id slot fails.
    #[instrument(skip(self, buyer), fields(signed_in = buyer.is_some()))]
    pub async fn ensure(&self, buyer: Option<&AccessToken>) -> Result<Cart> {
        let mut current = self.current.lock().await;
        self.ensure_locked(&mut current, buyer).await
    }

    async fn ensure_locked(
        &self,
        current: &mut Option<Cart>,
        buyer: Option<&AccessToken>,
    ) -> Result<Cart> {
        if let Some(cart) = current.as_ref() {
            return Ok(cart.clone());
        }

        if let Some(id) = self.store.load_cart_id().await? {
            match self.client.get_cart(&id).await {
                Ok(cart) => {
                    *current = Some(cart.clone());
                    return Ok(cart);
                }
                Err(ShopifyError::NotFound(_)) => {
                    info!(cart_id = %id, "Persisted cart expired, creating a new one");
                    self.store.clear().await?;
                }
                Err(e) => return Err(e.into()),
            }
        }

        let cart = self.client.create_cart(Vec::new(), buyer).await?;
        self.store.save_cart_id(&cart.id).await?;
        *current = Some(cart.clone());
        Ok(cart)
    }

    /// Add `quantity` of a variant.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a non-positive quantity, or an error
    /// if the API request fails.
    #[instrument(skip(self), fields(variant_id = %variant_id))]
    pub async fn add(&self, variant_id: VariantId, quantity: i64) -> Result<Cart> {
        if quantity <= 0 {
            return Err(AppError::BadRequest("Quantity must be at least 1".to_string()));
        }

        let mut current = self.current.lock().await;
        let id = self.ensure_locked(&mut current, None).await?.id;
        let lines = vec![CartLineInput {
            merchandise_id: variant_id,
            quantity,
        }];
        let cart = self.client.add_cart_lines(&id, lines).await?;
        *current = Some(cart.clone());
        Ok(cart)
    }

    /// Change a line's quantity. Zero removes the line.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` for a negative quantity, or an error if
    /// the API request fails.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn set_quantity(&self, line_id: CartLineId, quantity: i64) -> Result<Cart> {
        if quantity < 0 {
            return Err(AppError::BadRequest("Quantity cannot be negative".to_string()));
        }

        let mut current = self.current.lock().await;
        let id = self.ensure_locked(&mut current, None).await?.id;
        let lines = vec![CartLineUpdateInput {
            id: line_id,
            quantity,
        }];
        let cart = self.client.update_cart_lines(&id, lines).await?;
        *current = Some(cart.clone());
        Ok(cart)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(line_id = %line_id))]
    pub async fn remove(&self, line_id: CartLineId) -> Result<Cart> {
        let mut current = self.current.lock().await;
        let id = self.ensure_locked(&mut current, None).await?.id;
        let cart = self.client.remove_cart_lines(&id, vec![line_id]).await?;
        *current = Some(cart.clone());
        Ok(cart)
    }

    /// Attach the cart to a signed-in customer.
    ///
    /// Returns `None` without calling the API when there is no cart yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request or the cart id slot fails.
    #[instrument(skip(self, token))]
    pub async fn attach_customer(&self, token: &AccessToken) -> Result<Option<Cart>> {
        let mut current = self.current.lock().await;
        let id: Option<CartId> = match current.as_ref() {
            Some(cart) => Some(cart.id.clone()),
            None => self.store.load_cart_id().await?,
        };
        let Some(id) = id else {
            return Ok(None);
        };

        let cart = self.client.update_cart_buyer_identity(&id, token).await?;
        *current = Some(cart.clone());
        Ok(Some(cart))
    }

    /// Forget the cart (on logout). The next operation starts a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart id slot cannot be cleared; the local copy
    /// is dropped regardless.
    #[instrument(skip(self))]
    pub async fn reset(&self) -> Result<()> {
        let mut current = self.current.lock().await;
        *current = None;
        if let Err(e) = self.store.clear().await {
            warn!(error = %e, "Failed to clear persisted cart id");
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::shopify::test_support::{client_for, mount_operation};
    use crate::store::MemoryStore;

    fn cart_json(id: &str, quantity: i64) -> serde_json::Value {
        json!({
            "id": id,
            "checkoutUrl": "https://pocket.example/cart/c/c1",
            "totalQuantity": quantity,
            "buyerIdentity": { "customer": null },
            "cost": {
                "subtotalAmount": { "amount": "0.0", "currencyCode": "USD" },
                "totalAmount": { "amount": "0.0", "currencyCode": "USD" }
            },
            "lines": { "edges": [] }
        })
    }

    fn shopping_cart(server: &MockServer) -> (ShoppingCart, CartStore) {
        let store = CartStore::new(Arc::new(MemoryStore::new()));
        (ShoppingCart::new(client_for(server), store.clone()), store)
    }

    #[tokio::test]
    async fn test_add_creates_cart_once_and_persists_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "operationName": "CreateCart" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "cartCreate": {
                    "cart": cart_json("gid://shopify/Cart/c1", 0),
                    "userErrors": []
                } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        mount_operation(
            &server,
            "AddToCart",
            json!({ "cartLinesAdd": {
                "cart": cart_json("gid://shopify/Cart/c1", 2),
                "userErrors": []
            } }),
        )
        .await;

        let (cart, store) = shopping_cart(&server);
        let variant = VariantId::from_api("gid://shopify/ProductVariant/11");
        cart.add(variant.clone(), 1).await.unwrap();
        let updated = cart.add(variant, 1).await.unwrap();

        assert_eq!(updated.total_quantity, 2);
        assert_eq!(
            store.load_cart_id().await.unwrap().unwrap().as_str(),
            "gid://shopify/Cart/c1"
        );
    }

    #[tokio::test]
    async fn test_expired_cart_is_replaced() {
        let server = MockServer::start().await;
        mount_operation(&server, "GetCart", json!({ "cart": null })).await;
        mount_operation(
            &server,
            "CreateCart",
            json!({ "cartCreate": {
                "cart": cart_json("gid://shopify/Cart/new", 0),
                "userErrors": []
            } }),
        )
        .await;

        let (cart, store) = shopping_cart(&server);
        store
            .save_cart_id(&CartId::from_api("gid://shopify/Cart/old"))
            .await
            .unwrap();

        let ensured = cart.ensure(None).await.unwrap();
        assert_eq!(ensured.id.as_str(), "gid://shopify/Cart/new");
        assert_eq!(
            store.load_cart_id().await.unwrap().unwrap().as_str(),
            "gid://shopify/Cart/new"
        );
    }

    #[tokio::test]
    async fn test_non_positive_quantity_rejected() {
        let server = MockServer::start().await;
        let (cart, _) = shopping_cart(&server);

        let err = cart
            .add(VariantId::from_api("gid://shopify/ProductVariant/11"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = cart
            .set_quantity(CartLineId::from_api("gid://shopify/CartLine/1"), -1)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_attach_without_cart_is_noop() {
        let server = MockServer::start().await;
        let (cart, _) = shopping_cart(&server);

        let attached = cart.attach_customer(&AccessToken::new("tok")).await.unwrap();
        assert!(attached.is_none());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_forgets_cart() {
        let server = MockServer::start().await;
        let (cart, store) = shopping_cart(&server);
        store
            .save_cart_id(&CartId::from_api("gid://shopify/Cart/c1"))
            .await
            .unwrap();

        cart.reset().await.unwrap();

        assert!(cart.current().await.is_none());
        assert!(store.load_cart_id().await.unwrap().is_none());
    }
}
