//! Typed navigation routes.
//!
//! # Route Structure
//!
//! ```text
//! Home                       - Tab container (initial route)
//!   HomeTab                  - Product feed
//!   WishlistTab              - Saved products
//!   ProfileTab               - ProfileScreen, or LockScreen when signed out
//! Auth { initial }           - Login / Register stack
//! ForgotPassword             - Password reset request
//!
//! # Account (token carried as params)
//! EditProfile                - Name, email, phone
//! AddressManagement          - Saved addresses
//! OrderHistory               - Past orders
//!
//! # Content
//! WebView { web_url, kind }  - Terms of service / privacy policy
//! ProductDetails { handle }  - Product page
//! SearchResults { query }    - Search listing
//! ```
//!
//! The UI layer maps each [`Route`] to a screen. View-models only ever talk
//! to a [`Navigator`].

mod tabs;

pub use tabs::{TabScreen, TabSpec, initial_tab, tabs};

use serde::Serialize;
use url::Url;

use crate::shopify::AccessToken;

/// Which screen the auth stack opens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthScreen {
    Login,
    Register,
}

/// Parameters for [`Route::Auth`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthEntry {
    pub initial: AuthScreen,
}

/// Parameters for account screens that query on behalf of the customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRouteParams {
    pub customer_access_token: AccessToken,
}

/// Which legal page a web view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WebViewKind {
    Terms,
    Policy,
}

/// Parameters for [`Route::WebView`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebViewParams {
    pub web_url: Url,
    pub kind: WebViewKind,
}

/// Every destination in the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    HomeTab,
    WishlistTab,
    ProfileTab,
    Auth(AuthEntry),
    ForgotPassword,
    EditProfile(CustomerRouteParams),
    AddressManagement(CustomerRouteParams),
    OrderHistory(CustomerRouteParams),
    WebView(WebViewParams),
    ProductDetails { handle: String },
    SearchResults { query: String },
}

impl Route {
    /// Stable route name, as registered with the UI layer.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::HomeTab => "HomeTab",
            Self::WishlistTab => "WishlistTab",
            Self::ProfileTab => "ProfileTab",
            Self::Auth(_) => "Auth",
            Self::ForgotPassword => "ForgotPassword",
            Self::EditProfile(_) => "EditProfile",
            Self::AddressManagement(_) => "AddressManagement",
            Self::OrderHistory(_) => "OrderHistory",
            Self::WebView(_) => "WebView",
            Self::ProductDetails { .. } => "ProductDetails",
            Self::SearchResults { .. } => "SearchResults",
        }
    }
}

/// Replace the whole history with `root`, optionally focusing a nested tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationReset {
    pub root: Route,
    pub focus: Option<Route>,
}

impl NavigationReset {
    /// Reset to the tab container focused on `tab`.
    #[must_use]
    pub const fn home(tab: Route) -> Self {
        Self {
            root: Route::Home,
            focus: Some(tab),
        }
    }
}

/// What view-models use to move between screens.
pub trait Navigator {
    /// Push a route.
    fn navigate(&mut self, route: Route);

    /// Replace the history.
    fn reset(&mut self, reset: NavigationReset);
}

/// In-memory navigator: a history stack plus the last reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationStack {
    history: Vec<Route>,
    last_reset: Option<NavigationReset>,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self {
            history: vec![Route::Home, initial_tab()],
            last_reset: None,
        }
    }
}

impl NavigationStack {
    /// Stack at the initial route.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Topmost route.
    #[must_use]
    pub fn current(&self) -> Option<&Route> {
        self.history.last()
    }

    /// Full history, oldest first.
    #[must_use]
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// The most recent reset, if any.
    #[must_use]
    pub const fn last_reset(&self) -> Option<&NavigationReset> {
        self.last_reset.as_ref()
    }

    /// Pop the topmost route. The root is never popped.
    pub fn back(&mut self) -> Option<Route> {
        if self.history.len() > 1 {
            self.history.pop()
        } else {
            None
        }
    }
}

impl Navigator for NavigationStack {
    fn navigate(&mut self, route: Route) {
        tracing::debug!(route = route.name(), "Navigate");
        self.history.push(route);
    }

    fn reset(&mut self, reset: NavigationReset) {
        tracing::debug!(
            root = reset.root.name(),
            focus = reset.focus.as_ref().map(Route::name),
            "Navigation reset"
        );
        self.history.clear();
        self.history.push(reset.root.clone());
        if let Some(focus) = &reset.focus {
            self.history.push(focus.clone());
        }
        self.last_reset = Some(reset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_starts_on_home_tab() {
        let stack = NavigationStack::new();
        assert_eq!(stack.current(), Some(&Route::HomeTab));
        assert!(stack.last_reset().is_none());
    }

    #[test]
    fn test_navigate_and_back() {
        let mut stack = NavigationStack::new();
        stack.navigate(Route::ProductDetails {
            handle: "linen-shirt".to_string(),
        });
        assert_eq!(stack.current().map(Route::name), Some("ProductDetails"));

        assert!(stack.back().is_some());
        assert!(stack.back().is_some());
        assert_eq!(stack.back(), None);
        assert_eq!(stack.current(), Some(&Route::Home));
    }

    #[test]
    fn test_reset_replaces_history() {
        let mut stack = NavigationStack::new();
        stack.navigate(Route::Auth(AuthEntry {
            initial: AuthScreen::Login,
        }));
        stack.reset(NavigationReset::home(Route::ProfileTab));

        assert_eq!(stack.history(), &[Route::Home, Route::ProfileTab]);
        assert_eq!(
            stack.last_reset(),
            Some(&NavigationReset::home(Route::ProfileTab))
        );
    }
}
