//! When a persisted token is kept, renewed, or discarded.

use chrono::{DateTime, Duration, Utc};

/// What to do with a token on app start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenewalDecision {
    /// Expiry is further away than the renewal window.
    Keep,
    /// Expiry is within the window (inclusive) and not yet past.
    Renew,
    /// The token has expired.
    Discard,
}

/// Fixed trailing window before expiry in which a token is renewed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenewalPolicy {
    window: Duration,
}

impl RenewalPolicy {
    /// Default window of seven days.
    pub const DEFAULT_WINDOW_DAYS: i64 = 7;

    /// Policy with a custom window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self { window }
    }

    /// The renewal window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Classify a token expiring at `expires_at` as seen at `now`.
    #[must_use]
    pub fn decide(&self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> RenewalDecision {
        if now > expires_at {
            RenewalDecision::Discard
        } else if expires_at - now <= self.window {
            RenewalDecision::Renew
        } else {
            RenewalDecision::Keep
        }
    }
}

impl Default for RenewalPolicy {
    fn default() -> Self {
        Self::new(Duration::days(Self::DEFAULT_WINDOW_DAYS))
    }
}
