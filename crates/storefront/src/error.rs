//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before a message is shown to the user. Screen view-models and the
//! CLI surface failures through [`AppError::report`].

use thiserror::Error;

use pocket_shop_core::EmailError;

use crate::config::ConfigError;
use crate::session::SessionError;
use crate::shopify::ShopifyError;
use crate::store::StoreError;

/// Application-level error type for the storefront client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Device-local storage failed.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Shopify API operation failed.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// Session operation failed.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Email address did not parse.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The action requires a signed-in customer.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad input from the user.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error should be reported to Sentry.
    #[must_use]
    pub fn is_server_side(&self) -> bool {
        match self {
            Self::Config(_) | Self::Store(_) | Self::Internal(_) => true,
            Self::Shopify(err) => err.is_server_side(),
            Self::Session(err) => err.is_server_side(),
            Self::InvalidEmail(_) | Self::Unauthorized(_) | Self::BadRequest(_) => false,
        }
    }

    /// Capture server-side errors to Sentry and return the message to show
    /// the user.
    #[must_use]
    pub fn report(&self) -> String {
        if self.is_server_side() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        }
        self.user_message()
    }

    /// Message safe to show the user; internal details are not exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Config(_) | Self::Store(_) | Self::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Shopify(ShopifyError::RateLimited(secs)) => {
                format!("Too many requests. Try again in {secs} seconds.")
            }
            Self::Shopify(ShopifyError::NotFound(_)) => "Not found".to_string(),
            Self::Shopify(ShopifyError::UserError(msg)) => msg.clone(),
            Self::Shopify(_) | Self::Session(_) => "The shop is unavailable right now".to_string(),
            Self::InvalidEmail(_) => "Invalid email address".to_string(),
            Self::Unauthorized(_) => "Please log in first".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a customer ID.
///
/// Call this after successful login to associate errors with customers.
pub fn set_sentry_user(customer_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(customer_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the customer.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for session transitions and user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("session", "Token renewed", Some(&[("outcome", "renewed")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    add_breadcrumb_with_level(sentry::Level::Info, category, message, data);
}

/// Add a breadcrumb at an explicit level (e.g. `Warning` for a failed renewal).
pub fn add_breadcrumb_with_level(
    level: sentry::Level,
    category: &str,
    message: &str,
    data: Option<&[(&str, &str)]>,
) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
