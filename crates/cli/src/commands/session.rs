//! Session commands: login, logout, whoami, restore, tabs.

use std::io::BufRead;

use serde_json::json;

use pocket_shop_core::{Email, TextDirection};
use pocket_shop_storefront::AppState;
use pocket_shop_storefront::error::{AppError, Result};
use pocket_shop_storefront::navigation::{NavigationStack, tabs as tab_specs};
use pocket_shop_storefront::screens::LoginScreen;
use pocket_shop_storefront::session::{AuthState, RestoreOutcome};

const PASSWORD_ENV: &str = "POCKET_SHOP_PASSWORD";

/// Password from `POCKET_SHOP_PASSWORD`, or one line from stdin.
fn read_password() -> Result<String> {
    if let Ok(password) = std::env::var(PASSWORD_ENV)
        && !password.is_empty()
    {
        return Ok(password);
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| AppError::Internal(format!("Failed to read password: {e}")))?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(AppError::BadRequest(format!(
            "No password given (set {PASSWORD_ENV} or pipe it on stdin)"
        )));
    }
    Ok(password)
}

/// Sign in through the login screen, exactly as the app does.
pub async fn login(app: &AppState, email: &str) -> Result<()> {
    // Fails fast on a malformed address before prompting
    Email::parse(email)?;

    let mut screen = LoginScreen::new(app.session().clone(), app.cart().clone());
    screen.email = email.to_string();
    screen.password = read_password()?;

    let mut nav = NavigationStack::new();
    if !screen.submit(&mut nav).await {
        let message = screen.error_message().unwrap_or_default().to_string();
        return Err(AppError::Unauthorized(message));
    }

    let state = app.session().state();
    super::print_json(&json!({
        "loggedIn": true,
        "customer": state.user(),
        "route": nav.current().map(|r| r.name()),
    }))
}

/// Sign out: forget the cart, then end the session.
pub async fn logout(app: &AppState) -> Result<()> {
    app.session().restore().await?;
    let was_signed_in = app.session().is_authenticated();

    app.cart().reset().await?;
    app.session().logout().await?;

    super::print_json(&json!({ "loggedOut": was_signed_in }))
}

/// Show the signed-in customer.
pub async fn whoami(app: &AppState) -> Result<()> {
    app.session().restore().await?;
    let Some(token) = app.session().token() else {
        return Err(AppError::Unauthorized("whoami".to_string()));
    };

    let customer = app.storefront().customer(&token).await?;
    super::print_json(&customer)
}

/// Restore the persisted session and report what happened to the token.
pub async fn restore(app: &AppState) -> Result<()> {
    let outcome = app.session().restore().await?;

    let (label, reason) = match &outcome {
        RestoreOutcome::NoToken => ("noToken", None),
        RestoreOutcome::Kept => ("kept", None),
        RestoreOutcome::Discarded => ("discarded", None),
        RestoreOutcome::Renewed => ("renewed", None),
        RestoreOutcome::RenewalFailed(failure) => ("renewalFailed", Some(failure.to_string())),
    };

    let expires_at = match app.session().state() {
        AuthState::Authenticated { expires_at, .. } => Some(expires_at),
        AuthState::Unauthenticated => None,
    };

    super::print_json(&json!({
        "outcome": label,
        "reason": reason,
        "authenticated": app.session().is_authenticated(),
        "expiresAt": expires_at,
    }))
}

/// Print the bottom tabs for the current session.
pub async fn tabs(app: &AppState, rtl: bool) -> Result<()> {
    app.session().restore().await?;

    let direction = if rtl {
        TextDirection::Rtl
    } else {
        app.config().context.language.direction()
    };

    super::print_json(&tab_specs(&app.session().state(), direction))
}
