//! Bottom tab configuration.

use serde::Serialize;

use pocket_shop_core::TextDirection;

use super::Route;
use crate::session::AuthState;

/// Screen a tab renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TabScreen {
    Home,
    Wishlist,
    Profile,
    Lock,
}

/// One bottom tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabSpec {
    /// Route the tab is registered under.
    #[serde(skip)]
    pub route: Route,
    /// Route name, for display and logging.
    pub name: &'static str,
    /// Header title i18n key.
    pub title: &'static str,
    /// Tab bar label i18n key.
    pub label: &'static str,
    /// Screen rendered in the tab.
    pub screen: TabScreen,
    /// Whether the tab bar is shown while this tab is focused.
    pub tab_bar_visible: bool,
}

impl TabSpec {
    fn new(
        route: Route,
        (title, label): (&'static str, &'static str),
        screen: TabScreen,
        tab_bar_visible: bool,
    ) -> Self {
        Self {
            name: route.name(),
            route,
            title,
            label,
            screen,
            tab_bar_visible,
        }
    }
}

/// Route focused when the tab container first mounts.
#[must_use]
pub const fn initial_tab() -> Route {
    Route::HomeTab
}

/// Tabs for the current auth state and writing direction.
///
/// Right-to-left layouts list the tabs in reverse so Home stays nearest the
/// reading start.
#[must_use]
pub fn tabs(auth: &AuthState, direction: TextDirection) -> Vec<TabSpec> {
    let signed_in = auth.is_authenticated();
    let profile_screen = if signed_in {
        TabScreen::Profile
    } else {
        TabScreen::Lock
    };

    let mut tabs = vec![
        TabSpec::new(
            Route::HomeTab,
            ("TabNavigator.Home", "TabNavigator.Home"),
            TabScreen::Home,
            true,
        ),
        TabSpec::new(
            Route::WishlistTab,
            ("TabNavigator.Wishlist", "TabNavigator.Wishlist"),
            TabScreen::Wishlist,
            true,
        ),
        TabSpec::new(
            Route::ProfileTab,
            ("TabNavigator.Profile", "TabNavigator.My Profile"),
            profile_screen,
            signed_in,
        ),
    ];

    if direction == TextDirection::Rtl {
        tabs.reverse();
    }
    tabs
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::shopify::AccessToken;

    fn signed_in() -> AuthState {
        AuthState::Authenticated {
            token: AccessToken::new("tok"),
            expires_at: Utc::now(),
            user: None,
        }
    }

    #[test]
    fn test_ltr_order() {
        let names: Vec<_> = tabs(&signed_in(), TextDirection::Ltr)
            .iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["HomeTab", "WishlistTab", "ProfileTab"]);
    }

    #[test]
    fn test_rtl_reverses_order() {
        let names: Vec<_> = tabs(&signed_in(), TextDirection::Rtl)
            .iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(
            names,
            ["TabNavigator.My Profile", "TabNavigator.Wishlist", "TabNavigator.Home"]
        );
    }

    #[test]
    fn test_profile_title_differs_from_label() {
        for auth in [signed_in(), AuthState::Unauthenticated] {
            let all = tabs(&auth, TextDirection::Ltr);
            let profile = all.last().unwrap();
            assert_eq!(profile.title, "TabNavigator.Profile");
            assert_eq!(profile.label, "TabNavigator.My Profile");
        }
    }

    #[test]
    fn test_profile_tab_depends_on_auth() {
        let tabs_in = tabs(&signed_in(), TextDirection::Ltr);
        let profile = tabs_in.last().unwrap();
        assert_eq!(profile.screen, TabScreen::Profile);
        assert!(profile.tab_bar_visible);

        let tabs_out = tabs(&AuthState::Unauthenticated, TextDirection::Ltr);
        let lock = tabs_out.last().unwrap();
        assert_eq!(lock.screen, TabScreen::Lock);
        assert!(!lock.tab_bar_visible);
        assert!(tabs_out.first().unwrap().tab_bar_visible);
    }

    #[test]
    fn test_initial_tab() {
        assert_eq!(initial_tab(), Route::HomeTab);
    }
}
