//! Email and password sign-in.

use std::sync::Arc;

use tracing::warn;

use pocket_shop_core::Email;

use crate::cart::ShoppingCart;
use crate::error::AppError;
use crate::navigation::{NavigationReset, Navigator, Route};
use crate::session::{LoginOutcome, Session};

use super::MessageSheet;

/// Message shown when Shopify does not issue a token.
pub const LOGIN_FAILED_MESSAGE: &str = "Your email or password might be wrong!";

/// Login form.
pub struct LoginScreen {
    session: Arc<Session>,
    cart: Arc<ShoppingCart>,
    pub email: String,
    pub password: String,
    error: Option<MessageSheet>,
    is_error_modal_visible: bool,
    is_loading: bool,
}

impl std::fmt::Debug for LoginScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginScreen")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("error", &self.error)
            .field("is_loading", &self.is_loading)
            .finish_non_exhaustive()
    }
}

impl LoginScreen {
    #[must_use]
    pub const fn new(session: Arc<Session>, cart: Arc<ShoppingCart>) -> Self {
        Self {
            session,
            cart,
            email: String::new(),
            password: String::new(),
            error: None,
            is_error_modal_visible: false,
            is_loading: false,
        }
    }

    /// Bottom sheet describing the last failure.
    #[must_use]
    pub const fn error(&self) -> Option<&MessageSheet> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|sheet| sheet.message.as_str())
    }

    #[must_use]
    pub const fn is_error_modal_visible(&self) -> bool {
        self.is_error_modal_visible
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Open or close the error modal.
    pub const fn toggle_error_modal(&mut self) {
        self.is_error_modal_visible = !self.is_error_modal_visible;
    }

    /// Submit the form. Returns whether the customer is now signed in.
    ///
    /// On success the persisted cart is attached to the customer and the app
    /// resets to the profile tab. On failure the error modal opens.
    pub async fn submit(&mut self, nav: &mut impl Navigator) -> bool {
        let Ok(email) = Email::parse(&self.email) else {
            self.fail(LOGIN_FAILED_MESSAGE.to_string());
            return false;
        };

        self.is_loading = true;
        let outcome = self.session.login(&email, &self.password).await;
        self.is_loading = false;

        match outcome {
            Ok(LoginOutcome::LoggedIn { .. }) => {
                self.error = None;
                self.password.clear();
                if let Some(token) = self.session.token()
                    && let Err(e) = self.cart.attach_customer(&token).await
                {
                    warn!(error = %e, "Failed to attach cart to customer");
                }
                nav.reset(NavigationReset::home(Route::ProfileTab));
                true
            }
            Ok(LoginOutcome::Rejected(_)) => {
                self.fail(LOGIN_FAILED_MESSAGE.to_string());
                false
            }
            Err(e) => {
                self.fail(AppError::from(e).report());
                false
            }
        }
    }

    pub fn forgot_password(&self, nav: &mut impl Navigator) {
        nav.navigate(Route::ForgotPassword);
    }

    fn fail(&mut self, message: String) {
        self.error = Some(MessageSheet::error(message));
        if !self.is_error_modal_visible {
            self.toggle_error_modal();
        }
    }
}
