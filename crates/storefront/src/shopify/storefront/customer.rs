//! Customer access token and customer methods.
//!
//! Token mutations report rejections as data (`customerUserErrors`), not as
//! GraphQL errors, so they return a nested [`TokenGrantResult`]: the outer
//! `Result` is transport, the inner one is Shopify's verdict.

use tracing::{debug, instrument, warn};

use pocket_shop_core::Email;

use crate::shopify::ShopifyError;
use crate::shopify::types::{AccessToken, Customer, TokenGrantResult};

use super::StorefrontClient;
use super::conversions::{convert_customer, convert_token_payload};
use super::queries::common::join_user_errors;
use super::queries::{
    CustomerAccessTokenCreate, CustomerAccessTokenDelete, CustomerAccessTokenRenew, GetCustomer,
    customer_access_token_create, customer_access_token_delete, customer_access_token_renew,
};

impl StorefrontClient {
    /// Exchange email and password for a customer access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. Wrong credentials are not an
    /// error: they come back as `Ok(Err(CredentialRejection))`.
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn create_customer_access_token(
        &self,
        email: &Email,
        password: &str,
    ) -> Result<TokenGrantResult, ShopifyError> {
        let variables = customer_access_token_create::Variables {
            input: customer_access_token_create::CustomerAccessTokenCreateInput {
                email: email.as_str().to_string(),
                password: password.to_string(),
            },
        };

        let data = self.execute::<CustomerAccessTokenCreate>(variables).await?;

        let (token, errors) = data
            .customer_access_token_create
            .map(|p| (p.customer_access_token, p.customer_user_errors))
            .unwrap_or_default();

        let result = convert_token_payload(
            token,
            errors.into_iter().map(|e| (e.code, e.message)),
        );
        if let Err(rejection) = &result {
            debug!(code = ?rejection.code, "Customer access token rejected");
        }
        Ok(result)
    }

    /// Renew a customer access token before it expires.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. A token Shopify refuses to
    /// renew comes back as `Ok(Err(CredentialRejection))`.
    #[instrument(skip(self, token))]
    pub async fn renew_customer_access_token(
        &self,
        token: &AccessToken,
    ) -> Result<TokenGrantResult, ShopifyError> {
        let variables = customer_access_token_renew::Variables {
            customer_access_token: token.expose().to_string(),
        };

        let data = self.execute::<CustomerAccessTokenRenew>(variables).await?;

        let (token, errors) = data
            .customer_access_token_renew
            .map(|p| (p.customer_access_token, p.user_errors))
            .unwrap_or_default();

        Ok(convert_token_payload(
            token,
            errors.into_iter().map(|e| (None, e.message)),
        ))
    }

    /// Deactivate a customer access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or Shopify reports user errors.
    #[instrument(skip(self, token))]
    pub async fn delete_customer_access_token(
        &self,
        token: &AccessToken,
    ) -> Result<(), ShopifyError> {
        let variables = customer_access_token_delete::Variables {
            customer_access_token: token.expose().to_string(),
        };

        let data = self.execute::<CustomerAccessTokenDelete>(variables).await?;

        let Some(payload) = data.customer_access_token_delete else {
            return Err(ShopifyError::message("Failed to delete customer access token"));
        };

        if !payload.user_errors.is_empty() {
            return Err(ShopifyError::UserError(join_user_errors(
                &payload.user_errors,
            )));
        }

        if payload.deleted_access_token.is_none() {
            warn!("Token delete returned no deleted token");
        }

        Ok(())
    }

    /// Fetch the customer a token belongs to. Never cached.
    ///
    /// # Errors
    ///
    /// Returns `ShopifyError::NotFound` if the token resolves no customer, or
    /// an error if the API request fails.
    #[instrument(skip(self, token))]
    pub async fn customer(&self, token: &AccessToken) -> Result<Customer, ShopifyError> {
        let variables = customer_access_token_renew::Variables {
            customer_access_token: token.expose().to_string(),
        };

        let data = self.execute::<GetCustomer>(variables).await?;

        data.customer
            .map(convert_customer)
            .ok_or_else(|| ShopifyError::NotFound("Customer for access token".to_string()))
    }
}
