//! Shown in the profile tab while signed out.

use crate::navigation::{AuthEntry, AuthScreen, Navigator, Route};

/// Prompt to register or sign in.
#[derive(Debug, Clone, Copy, Default)]
pub struct LockScreen;

impl LockScreen {
    pub fn register(self, nav: &mut impl Navigator) {
        nav.navigate(Route::Auth(AuthEntry {
            initial: AuthScreen::Register,
        }));
    }

    pub fn log_in(self, nav: &mut impl Navigator) {
        nav.navigate(Route::Auth(AuthEntry {
            initial: AuthScreen::Login,
        }));
    }
}
