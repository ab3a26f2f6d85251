//! Headless screen view-models.
//!
//! Each screen holds the state the UI renders and exposes the actions the UI
//! binds to buttons. Data-driven screens render by [`QueryState`]: a spinner
//! while loading, an error with a retry while failed, content when ready.

mod lock;
mod login;
mod price_filter;
mod profile;

pub use lock::LockScreen;
pub use login::{LOGIN_FAILED_MESSAGE, LoginScreen};
pub use price_filter::{PriceBounds, PriceFilter};
pub use profile::ProfileScreen;

use std::future::Future;

use crate::error::AppError;

/// Loading state of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryState<T> {
    Loading,
    /// User-facing error message.
    Failed(String),
    Ready(T),
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> QueryState<T> {
    /// Build from a query result. Server-side errors are reported to Sentry.
    pub fn from_result<E: Into<AppError>>(result: Result<T, E>) -> Self {
        match result {
            Ok(data) => Self::Ready(data),
            Err(e) => Self::Failed(e.into().report()),
        }
    }

    /// Run `fetch` again, passing through `Loading`.
    pub async fn refetch<F, Fut, E>(&mut self, fetch: F)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Into<AppError>,
    {
        *self = Self::Loading;
        *self = Self::from_result(fetch().await);
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The data, once ready.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    /// The error message, if failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}

/// Bottom-sheet message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSheet {
    pub is_error: bool,
    pub message: String,
    /// Button label i18n key.
    pub button_text: String,
}

impl MessageSheet {
    /// Default button label key.
    pub const CLOSE: &'static str = "ModalBottomSheetMessage.Close";

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            is_error: false,
            message: message.into(),
            button_text: Self::CLOSE.to_string(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::info(message)
        }
    }

    /// Replace the button label key.
    #[must_use]
    pub fn with_button_text(mut self, key: impl Into<String>) -> Self {
        self.button_text = key.into();
        self
    }
}
