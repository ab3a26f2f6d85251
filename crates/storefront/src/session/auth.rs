//! The customer-token API the session drives.

use async_trait::async_trait;

use pocket_shop_core::Email;

use crate::shopify::{AccessToken, Customer, ShopifyError, StorefrontClient, TokenGrantResult};

/// Customer token operations, implemented by [`StorefrontClient`] and by
/// in-process fakes in tests.
#[async_trait]
pub trait CustomerAuth: Send + Sync {
    /// `customerAccessTokenCreate`.
    async fn create_token(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<TokenGrantResult, ShopifyError>;

    /// `customerAccessTokenRenew`.
    async fn renew_token(&self, token: &AccessToken) -> Result<TokenGrantResult, ShopifyError>;

    /// `customerAccessTokenDelete`.
    async fn delete_token(&self, token: &AccessToken) -> Result<(), ShopifyError>;

    /// `customer(customerAccessToken:)`.
    async fn customer(&self, token: &AccessToken) -> Result<Customer, ShopifyError>;
}

#[async_trait]
impl CustomerAuth for StorefrontClient {
    async fn create_token(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<TokenGrantResult, ShopifyError> {
        self.create_customer_access_token(email, password).await
    }

    async fn renew_token(&self, token: &AccessToken) -> Result<TokenGrantResult, ShopifyError> {
        self.renew_customer_access_token(token).await
    }

    async fn delete_token(&self, token: &AccessToken) -> Result<(), ShopifyError> {
        self.delete_customer_access_token(token).await
    }

    async fn customer(&self, token: &AccessToken) -> Result<Customer, ShopifyError> {
        Self::customer(self, token).await
    }
}
