//! Cart methods (not cached - mutable state).

use tracing::instrument;

use pocket_shop_core::{CartId, CartLineId};

use crate::shopify::ShopifyError;
use crate::shopify::types::{AccessToken, Cart, CartLineInput, CartLineUpdateInput};

use super::StorefrontClient;
use super::conversions::{convert_cart, convert_cart_payload};
use super::queries::{
    AddToCart, CreateCart, GetCart, RemoveFromCart, UpdateCartBuyerIdentity, UpdateCartLines,
    add_to_cart, create_cart, get_cart, remove_from_cart, update_cart_buyer_identity,
    update_cart_lines,
};

impl StorefrontClient {
    /// Create a new cart, optionally attached to a signed-in customer.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart creation fails or user errors are returned.
    #[instrument(skip(self, lines, buyer), fields(line_count = lines.len(), signed_in = buyer.is_some()))]
    pub async fn create_cart(
        &self,
        lines: Vec<CartLineInput>,
        buyer: Option<&AccessToken>,
    ) -> Result<Cart, ShopifyError> {
        let variables = create_cart::Variables {
            input: create_cart::CartInput {
                lines,
                buyer_identity: buyer.map(|token| create_cart::BuyerIdentityInput {
                    customer_access_token: token.expose().to_string(),
                }),
            },
        };

        let data = self.execute::<CreateCart>(variables).await?;

        convert_cart_payload(data.cart_create, "create cart")
    }

    /// Get an existing cart.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the cart no longer exists (carts
    /// expire after checkout or inactivity), or an error if the API request fails.
    #[instrument(skip(self), fields(cart_id = %cart_id))]
    pub async fn get_cart(&self, cart_id: &CartId) -> Result<Cart, ShopifyError> {
        let variables = get_cart::Variables {
            cart_id: cart_id.clone(),
        };

        let data = self.execute::<GetCart>(variables).await?;

        data.cart
            .map(convert_cart)
            .ok_or_else(|| ShopifyError::NotFound(format!("Cart not found: {cart_id}")))
    }

    /// Add lines to a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn add_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = add_to_cart::Variables {
            cart_id: cart_id.clone(),
            lines,
        };

        let data = self.execute::<AddToCart>(variables).await?;

        convert_cart_payload(data.cart_lines_add, "add to cart")
    }

    /// Update cart line quantities.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, lines), fields(cart_id = %cart_id))]
    pub async fn update_cart_lines(
        &self,
        cart_id: &CartId,
        lines: Vec<CartLineUpdateInput>,
    ) -> Result<Cart, ShopifyError> {
        let variables = update_cart_lines::Variables {
            cart_id: cart_id.clone(),
            lines,
        };

        let data = self.execute::<UpdateCartLines>(variables).await?;

        convert_cart_payload(data.cart_lines_update, "update cart")
    }

    /// Remove lines from a cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart update fails or user errors are returned.
    #[instrument(skip(self, line_ids), fields(cart_id = %cart_id))]
    pub async fn remove_cart_lines(
        &self,
        cart_id: &CartId,
        line_ids: Vec<CartLineId>,
    ) -> Result<Cart, ShopifyError> {
        let variables = remove_from_cart::Variables {
            cart_id: cart_id.clone(),
            line_ids,
        };

        let data = self.execute::<RemoveFromCart>(variables).await?;

        convert_cart_payload(data.cart_lines_remove, "remove from cart")
    }

    /// Attach a cart to the customer owning `token`.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails or user errors are returned.
    #[instrument(skip(self, token), fields(cart_id = %cart_id))]
    pub async fn update_cart_buyer_identity(
        &self,
        cart_id: &CartId,
        token: &AccessToken,
    ) -> Result<Cart, ShopifyError> {
        let variables = update_cart_buyer_identity::Variables {
            cart_id: cart_id.clone(),
            buyer_identity: update_cart_buyer_identity::BuyerIdentityInput {
                customer_access_token: token.expose().to_string(),
            },
        };

        let data = self.execute::<UpdateCartBuyerIdentity>(variables).await?;

        convert_cart_payload(data.cart_buyer_identity_update, "update buyer identity")
    }
}
