//! Signed-in profile tab.

use std::sync::Arc;

use tracing::{instrument, warn};
use url::Url;

use crate::cart::ShoppingCart;
use crate::error::{AppError, Result};
use crate::navigation::{
    CustomerRouteParams, Navigator, Route, WebViewKind, WebViewParams,
};
use crate::session::Session;
use crate::shopify::{Customer, ShopPolicies, StorefrontClient};

/// Profile tab: customer details, account menu, legal links and logout.
#[derive(Debug)]
pub struct ProfileScreen {
    session: Arc<Session>,
    cart: Arc<ShoppingCart>,
    client: StorefrontClient,
    customer: super::QueryState<Customer>,
    policies: super::QueryState<ShopPolicies>,
}

impl ProfileScreen {
    #[must_use]
    pub const fn new(
        session: Arc<Session>,
        cart: Arc<ShoppingCart>,
        client: StorefrontClient,
    ) -> Self {
        Self {
            session,
            cart,
            client,
            customer: super::QueryState::Loading,
            policies: super::QueryState::Loading,
        }
    }

    /// Fetch the customer for the current token and the shop's policy links.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        let token = self.session.token();
        let client = &self.client;
        self.customer
            .refetch(|| async move {
                let token = token.ok_or_else(|| AppError::Unauthorized("profile".to_string()))?;
                Ok::<_, AppError>(client.customer(&token).await?)
            })
            .await;
        self.policies.refetch(|| client.shop_policies()).await;
    }

    /// Same as [`ProfileScreen::load`]; bound to the retry button.
    pub async fn refetch(&mut self) {
        self.load().await;
    }

    #[must_use]
    pub const fn customer(&self) -> &super::QueryState<Customer> {
        &self.customer
    }

    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.customer.data().map(|c| c.display_name.as_str())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.customer
            .data()
            .and_then(|c| c.email.as_ref())
            .map(pocket_shop_core::Email::as_str)
    }

    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when signed out.
    pub fn edit_profile(&self, nav: &mut impl Navigator) -> Result<()> {
        nav.navigate(Route::EditProfile(self.customer_params()?));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when signed out.
    pub fn manage_addresses(&self, nav: &mut impl Navigator) -> Result<()> {
        nav.navigate(Route::AddressManagement(self.customer_params()?));
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AppError::Unauthorized` when signed out.
    pub fn order_history(&self, nav: &mut impl Navigator) -> Result<()> {
        nav.navigate(Route::OrderHistory(self.customer_params()?));
        Ok(())
    }

    /// Open the terms of service.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the shop publishes no terms or the
    /// policies have not loaded.
    pub fn terms(&self, nav: &mut impl Navigator) -> Result<()> {
        let url = self
            .policies
            .data()
            .and_then(|p| p.terms_of_service_url.as_deref());
        Self::open_web_view(nav, url, WebViewKind::Terms)
    }

    /// Open the privacy policy.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if the shop publishes no privacy policy
    /// or the policies have not loaded.
    pub fn privacy(&self, nav: &mut impl Navigator) -> Result<()> {
        let url = self
            .policies
            .data()
            .and_then(|p| p.privacy_policy_url.as_deref());
        Self::open_web_view(nav, url, WebViewKind::Policy)
    }

    /// Forget the cart, sign out, and go back to the home tab.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted token could not be removed. The
    /// session is signed out in memory regardless.
    #[instrument(skip(self, nav))]
    pub async fn logout(&mut self, nav: &mut impl Navigator) -> Result<()> {
        if let Err(e) = self.cart.reset().await {
            warn!(error = %e, "Failed to reset cart on logout");
        }
        let result = self.session.logout().await;
        self.customer = super::QueryState::Loading;
        nav.navigate(Route::HomeTab);
        result.map_err(AppError::from)
    }

    fn customer_params(&self) -> Result<CustomerRouteParams> {
        let customer_access_token = self
            .session
            .token()
            .ok_or_else(|| AppError::Unauthorized("account".to_string()))?;
        Ok(CustomerRouteParams {
            customer_access_token,
        })
    }

    fn open_web_view(nav: &mut impl Navigator, url: Option<&str>, kind: WebViewKind) -> Result<()> {
        let url = url.ok_or_else(|| AppError::BadRequest("This page is unavailable".to_string()))?;
        let web_url = Url::parse(url)
            .map_err(|e| AppError::Internal(format!("Invalid policy URL {url}: {e}")))?;
        nav.navigate(Route::WebView(WebViewParams { web_url, kind }));
        Ok(())
    }
}
