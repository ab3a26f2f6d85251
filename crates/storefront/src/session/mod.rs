//! Customer session: the single writer of authentication state.
//!
//! A [`Session`] is built once at startup and shared as `Arc<Session>`.
//! Screens observe it through [`Session::subscribe`] and change it only
//! through its transition methods (`restore`, `login`, `logout`, `renew`).
//!
//! # Lifecycle
//!
//! ```text
//!                  login / restore(keep)
//!  Unauthenticated ───────────────────────▶ Authenticated ◀──┐
//!        ▲                                     │             │ renew done
//!        │ logout / restore(discard)           │ renew       │ (or failed)
//!        └─────────────────────────────────────┴──▶ Renewing ┘
//! ```
//!
//! Every login, restore and logout bumps a generation counter. A renewal
//! remembers the generation it started under and its result is dropped if
//! the counter moved or the session no longer holds the token it renewed.
//! While renewing, the old token stays in place and usable.

mod auth;
mod clock;
mod policy;

pub use auth::CustomerAuth;
pub use clock::{Clock, ManualClock, SystemClock};
pub use policy::{RenewalDecision, RenewalPolicy};

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, instrument, warn};

use pocket_shop_core::Email;

use crate::error::{add_breadcrumb, add_breadcrumb_with_level, clear_sentry_user, set_sentry_user};
use crate::shopify::{AccessToken, CredentialRejection, Customer, ShopifyError};
use crate::store::{StoreError, StoredToken, TokenStore};

/// Errors from session transitions.
///
/// Credential rejections and renewal failures are outcomes, not errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The token API could not be reached or answered with an error.
    #[error("Shopify error: {0}")]
    Shopify(#[from] ShopifyError),

    /// The persisted token could not be read or written.
    #[error("Token storage error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Whether this error should be reported to Sentry.
    #[must_use]
    pub const fn is_server_side(&self) -> bool {
        match self {
            Self::Shopify(err) => err.is_server_side(),
            Self::Store(_) => true,
        }
    }
}

/// Authentication state as observed by screens.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    /// No token.
    #[default]
    Unauthenticated,
    /// A token is held and considered valid.
    Authenticated {
        /// Bearer token.
        token: AccessToken,
        /// Expiry as reported by Shopify.
        expires_at: DateTime<Utc>,
        /// The customer, once fetched.
        user: Option<Customer>,
    },
}

impl AuthState {
    /// Whether a token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    /// The held token.
    #[must_use]
    pub const fn token(&self) -> Option<&AccessToken> {
        match self {
            Self::Authenticated { token, .. } => Some(token),
            Self::Unauthenticated => None,
        }
    }

    /// Expiry of the held token.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Authenticated { expires_at, .. } => Some(*expires_at),
            Self::Unauthenticated => None,
        }
    }

    /// The fetched customer.
    #[must_use]
    pub const fn user(&self) -> Option<&Customer> {
        match self {
            Self::Authenticated { user, .. } => user.as_ref(),
            Self::Unauthenticated => None,
        }
    }
}

/// Lifecycle phase, including the renewal in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No token.
    Unauthenticated,
    /// Token held, nothing in flight.
    Authenticated,
    /// Token held, a renewal is in flight.
    Renewing,
}

/// Why a renewal did not produce a new token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenewalFailure {
    /// Shopify refused to renew the token.
    Rejected(CredentialRejection),
    /// The request failed before Shopify could decide.
    Unavailable(String),
}

impl fmt::Display for RenewalFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected(rejection) => write!(f, "renewal rejected: {rejection}"),
            Self::Unavailable(reason) => write!(f, "renewal unavailable: {reason}"),
        }
    }
}

/// Result of [`Session::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Nothing persisted.
    NoToken,
    /// Token kept as-is (or the session was already authenticated).
    Kept,
    /// Token had expired and was removed.
    Discarded,
    /// Token was inside the renewal window and has been replaced.
    Renewed,
    /// Token was inside the renewal window but renewal failed; the old token
    /// stays in use until it expires.
    RenewalFailed(RenewalFailure),
}

/// Result of [`Session::login`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Signed in. `user` is `None` if fetching the customer failed.
    LoggedIn {
        /// The signed-in customer.
        user: Option<Customer>,
    },
    /// Shopify declined the credentials; nothing was stored.
    Rejected(CredentialRejection),
}

/// Result of [`Session::renew`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenewOutcome {
    /// No token to renew.
    NotAuthenticated,
    /// Another renewal is in flight.
    AlreadyRenewing,
    /// The token was replaced.
    Renewed {
        /// New expiry.
        expires_at: DateTime<Utc>,
    },
    /// The old token was kept.
    Failed(RenewalFailure),
    /// A login or logout happened while renewing; the result was dropped.
    Superseded,
}

struct Lifecycle {
    status: SessionStatus,
    generation: u64,
}

/// The customer session.
pub struct Session {
    auth: Arc<dyn CustomerAuth>,
    tokens: TokenStore,
    clock: Arc<dyn Clock>,
    policy: RenewalPolicy,
    lifecycle: Mutex<Lifecycle>,
    state: watch::Sender<AuthState>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("policy", &self.policy)
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create an unauthenticated session. Call [`Session::restore`] next.
    #[must_use]
    pub fn new(
        auth: Arc<dyn CustomerAuth>,
        tokens: TokenStore,
        clock: Arc<dyn Clock>,
        policy: RenewalPolicy,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::Unauthenticated);
        Self {
            auth,
            tokens,
            clock,
            policy,
            lifecycle: Mutex::new(Lifecycle {
                status: SessionStatus::Unauthenticated,
                generation: 0,
            }),
            state,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// The held token.
    #[must_use]
    pub fn token(&self) -> Option<AccessToken> {
        self.state.borrow().token().cloned()
    }

    /// Whether a token is held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    /// Lifecycle phase, including whether a renewal is in flight.
    pub async fn status(&self) -> SessionStatus {
        self.lifecycle.lock().await.status
    }

    /// Observe state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Load the persisted token on app start and apply the renewal policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the token store fails. Renewal failures are
    /// reported as [`RestoreOutcome::RenewalFailed`].
    #[instrument(skip(self))]
    pub async fn restore(&self) -> Result<RestoreOutcome, SessionError> {
        let decision = {
            let mut lifecycle = self.lifecycle.lock().await;
            if lifecycle.status != SessionStatus::Unauthenticated {
                debug!("Session already authenticated, nothing to restore");
                return Ok(RestoreOutcome::Kept);
            }

            let Some(stored) = self.tokens.load().await? else {
                return Ok(RestoreOutcome::NoToken);
            };

            let decision = self.policy.decide(stored.expires_at, self.clock.now());
            if decision == RenewalDecision::Discard {
                self.tokens.clear().await?;
                info!(expires_at = %stored.expires_at, "Persisted token expired, discarded");
                add_breadcrumb("session", "Expired token discarded", None);
                return Ok(RestoreOutcome::Discarded);
            }

            lifecycle.generation += 1;
            lifecycle.status = SessionStatus::Authenticated;
            self.state.send_replace(AuthState::Authenticated {
                token: stored.access_token,
                expires_at: stored.expires_at,
                user: None,
            });
            decision
        };

        add_breadcrumb("session", "Session restored", None);
        self.refresh_user().await;

        if decision == RenewalDecision::Keep {
            return Ok(RestoreOutcome::Kept);
        }

        Ok(match self.renew().await? {
            RenewOutcome::Renewed { .. } => RestoreOutcome::Renewed,
            RenewOutcome::Failed(failure) => RestoreOutcome::RenewalFailed(failure),
            RenewOutcome::NotAuthenticated
            | RenewOutcome::AlreadyRenewing
            | RenewOutcome::Superseded => RestoreOutcome::Kept,
        })
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request or persisting the token fails.
    /// Wrong credentials are [`LoginOutcome::Rejected`].
    #[instrument(skip(self, email, password), fields(email = %email))]
    pub async fn login(&self, email: &Email, password: &str) -> Result<LoginOutcome, SessionError> {
        let grant = match self.auth.create_token(email, password).await? {
            Ok(grant) => grant,
            Err(rejection) => {
                info!(code = ?rejection.code, "Login rejected");
                add_breadcrumb("session", "Login rejected", None);
                return Ok(LoginOutcome::Rejected(rejection));
            }
        };

        {
            let mut lifecycle = self.lifecycle.lock().await;
            let stored = StoredToken::from(grant);
            self.tokens.save(&stored).await?;
            lifecycle.generation += 1;
            lifecycle.status = SessionStatus::Authenticated;
            self.state.send_replace(AuthState::Authenticated {
                token: stored.access_token,
                expires_at: stored.expires_at,
                user: None,
            });
        }

        info!("Logged in");
        add_breadcrumb("session", "Logged in", None);
        let user = self.refresh_user().await;
        Ok(LoginOutcome::LoggedIn { user })
    }

    /// Sign out.
    ///
    /// Clears the in-memory and persisted token first, then deactivates the
    /// token remotely on a best-effort basis. Any renewal in flight is dropped
    /// when it completes.
    ///
    /// # Errors
    ///
    /// Returns an error only if removing the persisted token fails; the
    /// in-memory state is cleared regardless.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), SessionError> {
        let (previous, cleared) = {
            let mut lifecycle = self.lifecycle.lock().await;
            lifecycle.generation += 1;
            lifecycle.status = SessionStatus::Unauthenticated;
            let previous = self.state.send_replace(AuthState::Unauthenticated);
            (previous, self.tokens.clear().await)
        };

        clear_sentry_user();
        add_breadcrumb("session", "Logged out", None);
        info!("Logged out");

        if let Some(token) = previous.token()
            && let Err(e) = self.auth.delete_token(token).await
        {
            warn!(error = %e, "Failed to deactivate token remotely");
        }

        cleared.map_err(SessionError::from)
    }

    /// Renew the held token.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the renewed token fails.
    #[instrument(skip(self))]
    pub async fn renew(&self) -> Result<RenewOutcome, SessionError> {
        let (token, generation) = {
            let mut lifecycle = self.lifecycle.lock().await;
            match lifecycle.status {
                SessionStatus::Unauthenticated => return Ok(RenewOutcome::NotAuthenticated),
                SessionStatus::Renewing => return Ok(RenewOutcome::AlreadyRenewing),
                SessionStatus::Authenticated => {}
            }
            let Some(token) = self.token() else {
                return Ok(RenewOutcome::NotAuthenticated);
            };
            lifecycle.status = SessionStatus::Renewing;
            (token, lifecycle.generation)
        };

        debug!("Renewing customer access token");
        let result = self.auth.renew_token(&token).await;

        let mut lifecycle = self.lifecycle.lock().await;
        if lifecycle.generation != generation || self.token().as_ref() != Some(&token) {
            debug!("Session changed while renewing, dropping result");
            return Ok(RenewOutcome::Superseded);
        }
        lifecycle.status = SessionStatus::Authenticated;

        let failure = match result {
            Ok(Ok(grant)) => {
                let stored = StoredToken::from(grant);
                self.tokens.save(&stored).await?;
                self.state.send_modify(|state| {
                    if let AuthState::Authenticated {
                        token, expires_at, ..
                    } = state
                    {
                        *token = stored.access_token.clone();
                        *expires_at = stored.expires_at;
                    }
                });
                info!(expires_at = %stored.expires_at, "Token renewed");
                add_breadcrumb("session", "Token renewed", None);
                return Ok(RenewOutcome::Renewed {
                    expires_at: stored.expires_at,
                });
            }
            Ok(Err(rejection)) => RenewalFailure::Rejected(rejection),
            Err(e) => RenewalFailure::Unavailable(e.to_string()),
        };

        let reason = failure.to_string();
        warn!(reason = %reason, "Token renewal failed, keeping current token");
        add_breadcrumb_with_level(
            sentry::Level::Warning,
            "session",
            "Token renewal failed",
            Some(&[("reason", reason.as_str())]),
        );
        Ok(RenewOutcome::Failed(failure))
    }

    /// Fetch the customer for the held token and publish it.
    ///
    /// Best effort: failures are logged and `None` is returned.
    pub async fn refresh_user(&self) -> Option<Customer> {
        let (token, generation) = {
            let lifecycle = self.lifecycle.lock().await;
            (self.token()?, lifecycle.generation)
        };

        let customer = match self.auth.customer(&token).await {
            Ok(customer) => customer,
            Err(e) => {
                warn!(error = %e, "Failed to fetch customer");
                return None;
            }
        };

        let lifecycle = self.lifecycle.lock().await;
        if lifecycle.generation == generation {
            set_sentry_user(&customer.id, customer.email.as_ref().map(Email::as_str));
            self.state.send_modify(|state| {
                if let AuthState::Authenticated { user, .. } = state {
                    *user = Some(customer.clone());
                }
            });
        }
        Some(customer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use tokio::sync::Notify;

    use pocket_shop_core::CustomerId;

    use super::*;
    use crate::shopify::{RejectionCode, TokenGrant, TokenGrantResult};
    use crate::store::{KeyValueStore, MemoryStore};

    /// In-process stand-in for the Storefront token API.
    #[derive(Default)]
    pub(crate) struct FakeAuth {
        pub create: StdMutex<Option<TokenGrantResult>>,
        pub renew: StdMutex<Option<Result<TokenGrantResult, String>>>,
        pub renew_gate: Option<Arc<Notify>>,
        pub renew_calls: AtomicUsize,
        pub delete_calls: AtomicUsize,
        pub customer_calls: AtomicUsize,
    }

    pub(crate) fn grant(token: &str, expires_at: DateTime<Utc>) -> TokenGrant {
        TokenGrant {
            access_token: AccessToken::new(token),
            expires_at,
        }
    }

    pub(crate) fn customer() -> Customer {
        Customer {
            id: CustomerId::from_api("gid://shopify/Customer/5"),
            email: Some(Email::parse("ada@pocket.example").unwrap()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            display_name: "Ada Lovelace".to_string(),
            phone: None,
            default_address: None,
        }
    }

    #[async_trait]
    impl CustomerAuth for FakeAuth {
        async fn create_token(
            &self,
            _email: &Email,
            _password: &str,
        ) -> Result<TokenGrantResult, ShopifyError> {
            Ok(self.create.lock().unwrap().clone().unwrap_or_else(|| {
                Err(CredentialRejection {
                    code: RejectionCode::Unidentified,
                    messages: vec![],
                })
            }))
        }

        async fn renew_token(
            &self,
            _token: &AccessToken,
        ) -> Result<TokenGrantResult, ShopifyError> {
            self.renew_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.renew_gate {
                gate.notified().await;
            }
            match self.renew.lock().unwrap().clone() {
                Some(Ok(result)) => Ok(result),
                Some(Err(message)) => Err(ShopifyError::message(message)),
                None => Err(ShopifyError::message("no renewal scripted")),
            }
        }

        async fn delete_token(&self, _token: &AccessToken) -> Result<(), ShopifyError> {
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn customer(&self, _token: &AccessToken) -> Result<Customer, ShopifyError> {
            self.customer_calls.fetch_add(1, Ordering::SeqCst);
            Ok(customer())
        }
    }

    pub(crate) fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    struct Harness {
        auth: Arc<FakeAuth>,
        tokens: TokenStore,
        session: Arc<Session>,
    }

    fn harness(auth: FakeAuth) -> Harness {
        let auth = Arc::new(auth);
        let tokens = TokenStore::new(Arc::new(MemoryStore::new()));
        let session = Arc::new(Session::new(
            auth.clone(),
            tokens.clone(),
            Arc::new(ManualClock::new(now())),
            RenewalPolicy::default(),
        ));
        Harness {
            auth,
            tokens,
            session,
        }
    }

    async fn persist(tokens: &TokenStore, token: &str, expires_at: DateTime<Utc>) {
        tokens
            .save(&StoredToken::from(grant(token, expires_at)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_restore_without_token() {
        let h = harness(FakeAuth::default());
        assert_eq!(h.session.restore().await.unwrap(), RestoreOutcome::NoToken);
        assert!(!h.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_restore_keeps_token_beyond_window() {
        let h = harness(FakeAuth::default());
        persist(&h.tokens, "old", now() + Duration::days(20)).await;

        assert_eq!(h.session.restore().await.unwrap(), RestoreOutcome::Kept);
        assert_eq!(h.auth.renew_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.session.token().unwrap().expose(), "old");
        assert_eq!(h.session.state().user(), Some(&customer()));
    }

    #[tokio::test]
    async fn test_restore_discards_expired_token() {
        let h = harness(FakeAuth::default());
        persist(&h.tokens, "old", now() - Duration::minutes(1)).await;

        assert_eq!(h.session.restore().await.unwrap(), RestoreOutcome::Discarded);
        assert!(!h.session.is_authenticated());
        assert!(h.tokens.load().await.unwrap().is_none());
        assert_eq!(h.auth.renew_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restore_renews_inside_window() {
        let auth = FakeAuth {
            renew: StdMutex::new(Some(Ok(Ok(grant("new", now() + Duration::days(30)))))),
            ..FakeAuth::default()
        };
        let h = harness(auth);
        persist(&h.tokens, "old", now() + Duration::days(3)).await;

        assert_eq!(h.session.restore().await.unwrap(), RestoreOutcome::Renewed);
        assert_eq!(h.auth.renew_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.session.token().unwrap().expose(), "new");
        assert_eq!(
            h.tokens.load().await.unwrap().unwrap().access_token.expose(),
            "new"
        );
        assert_eq!(h.session.status().await, SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_old_token_usable_while_renewing() {
        let gate = Arc::new(Notify::new());
        let auth = FakeAuth {
            renew: StdMutex::new(Some(Ok(Ok(grant("new", now() + Duration::days(30)))))),
            renew_gate: Some(gate.clone()),
            ..FakeAuth::default()
        };
        let h = harness(auth);
        persist(&h.tokens, "old", now() + Duration::days(3)).await;

        let session = h.session.clone();
        let restore = tokio::spawn(async move { session.restore().await });

        while h.session.status().await != SessionStatus::Renewing {
            tokio::task::yield_now().await;
        }
        assert_eq!(h.session.token().unwrap().expose(), "old");
        assert_eq!(h.session.renew().await.unwrap(), RenewOutcome::AlreadyRenewing);

        gate.notify_one();
        assert_eq!(restore.await.unwrap().unwrap(), RestoreOutcome::Renewed);
        assert_eq!(h.auth.renew_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.session.token().unwrap().expose(), "new");
    }

    #[tokio::test]
    async fn test_renewal_failure_keeps_old_token() {
        let auth = FakeAuth {
            renew: StdMutex::new(Some(Err("connection reset".to_string()))),
            ..FakeAuth::default()
        };
        let h = harness(auth);
        persist(&h.tokens, "old", now() + Duration::days(3)).await;

        let outcome = h.session.restore().await.unwrap();
        assert!(matches!(
            outcome,
            RestoreOutcome::RenewalFailed(RenewalFailure::Unavailable(_))
        ));
        assert_eq!(h.session.token().unwrap().expose(), "old");
        assert_eq!(
            h.tokens.load().await.unwrap().unwrap().access_token.expose(),
            "old"
        );
        assert_eq!(h.session.status().await, SessionStatus::Authenticated);
    }

    /// Slot store whose writes start failing once `fail_saves` is set.
    #[derive(Default)]
    struct FailingSaves {
        inner: MemoryStore,
        fail_saves: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl KeyValueStore for FailingSaves {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.get(key).await
        }

        async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_saves.load(Ordering::SeqCst) {
                return Err(StoreError::Database(sqlx::Error::PoolClosed));
            }
            self.inner.save(key, value).await
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_renewal_not_published_when_persist_fails() {
        let kv = Arc::new(FailingSaves::default());
        let tokens = TokenStore::new(kv.clone());
        let auth = Arc::new(FakeAuth {
            renew: StdMutex::new(Some(Ok(Ok(grant("new", now() + Duration::days(30)))))),
            ..FakeAuth::default()
        });
        let session = Session::new(
            auth.clone(),
            tokens.clone(),
            Arc::new(ManualClock::new(now())),
            RenewalPolicy::default(),
        );
        persist(&tokens, "old", now() + Duration::days(3)).await;
        kv.fail_saves.store(true, Ordering::SeqCst);

        assert!(session.restore().await.is_err());

        // Memory and device agree on the old token
        assert_eq!(session.token().unwrap().expose(), "old");
        let persisted = tokens.load().await.unwrap().unwrap();
        assert_eq!(persisted.access_token.expose(), "old");
        assert_eq!(persisted.expires_at, now() + Duration::days(3));
        assert_eq!(session.state().expires_at(), Some(now() + Duration::days(3)));
        assert_eq!(session.status().await, SessionStatus::Authenticated);
        assert_eq!(auth.renew_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_renewal_rejection_is_reported() {
        let auth = FakeAuth {
            renew: StdMutex::new(Some(Ok(Err(CredentialRejection {
                code: RejectionCode::Unidentified,
                messages: vec!["Access token does not exist".to_string()],
            })))),
            ..FakeAuth::default()
        };
        let h = harness(auth);
        persist(&h.tokens, "old", now() + Duration::days(1)).await;

        let outcome = h.session.restore().await.unwrap();
        assert!(matches!(
            outcome,
            RestoreOutcome::RenewalFailed(RenewalFailure::Rejected(_))
        ));
    }

    #[tokio::test]
    async fn test_logout_during_renewal_drops_result() {
        let gate = Arc::new(Notify::new());
        let auth = FakeAuth {
            renew: StdMutex::new(Some(Ok(Ok(grant("new", now() + Duration::days(30)))))),
            renew_gate: Some(gate.clone()),
            ..FakeAuth::default()
        };
        let h = harness(auth);
        persist(&h.tokens, "old", now() + Duration::days(3)).await;

        let session = h.session.clone();
        let restore = tokio::spawn(async move { session.restore().await });
        while h.session.status().await != SessionStatus::Renewing {
            tokio::task::yield_now().await;
        }

        h.session.logout().await.unwrap();
        gate.notify_one();

        assert_eq!(restore.await.unwrap().unwrap(), RestoreOutcome::Kept);
        assert!(!h.session.is_authenticated());
        assert!(h.tokens.load().await.unwrap().is_none());
        assert_eq!(h.session.status().await, SessionStatus::Unauthenticated);
    }

    #[tokio::test]
    async fn test_logout_clears_both_copies_and_never_renews() {
        let auth = FakeAuth {
            create: StdMutex::new(Some(Ok(grant("tok", now() + Duration::days(2))))),
            ..FakeAuth::default()
        };
        let h = harness(auth);
        let email = Email::parse("ada@pocket.example").unwrap();
        h.session.login(&email, "hunter22").await.unwrap();

        h.session.logout().await.unwrap();

        assert!(!h.session.is_authenticated());
        assert!(h.tokens.load().await.unwrap().is_none());
        assert_eq!(h.auth.delete_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.session.renew().await.unwrap(), RenewOutcome::NotAuthenticated);
        assert_eq!(h.auth.renew_calls.load(Ordering::SeqCst), 0);

        // Logging out again is harmless and skips the remote call
        h.session.logout().await.unwrap();
        assert_eq!(h.auth.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_login_persists_and_publishes() {
        let auth = FakeAuth {
            create: StdMutex::new(Some(Ok(grant("tok", now() + Duration::days(14))))),
            ..FakeAuth::default()
        };
        let h = harness(auth);
        let mut rx = h.session.subscribe();
        let email = Email::parse("ada@pocket.example").unwrap();

        let outcome = h.session.login(&email, "hunter22").await.unwrap();

        assert_eq!(outcome, LoginOutcome::LoggedIn { user: Some(customer()) });
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_authenticated());
        assert_eq!(
            h.tokens.load().await.unwrap().unwrap().access_token.expose(),
            "tok"
        );
    }

    #[tokio::test]
    async fn test_login_rejected_stores_nothing() {
        let h = harness(FakeAuth::default());
        let email = Email::parse("ada@pocket.example").unwrap();

        let outcome = h.session.login(&email, "wrong").await.unwrap();

        assert!(matches!(outcome, LoginOutcome::Rejected(_)));
        assert!(!h.session.is_authenticated());
        assert!(h.tokens.load().await.unwrap().is_none());
    }
}
