//! Session lifetimes handed back to the session manager.

use std::time::Duration;

use chrono::{DateTime, Utc};

/// When a session expires, as far as the store knows.
///
/// An unset lifetime tells the session manager to apply its own default
/// expiration policy. A set lifetime carries a concrete instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Lifetime {
    expires_at: Option<DateTime<Utc>>,
}

impl Lifetime {
    /// A lifetime that defers to the session manager's default.
    pub fn unset() -> Self {
        Self::default()
    }

    /// A lifetime ending at `expires_at`.
    pub fn at(expires_at: DateTime<Utc>) -> Self {
        Self {
            expires_at: Some(expires_at),
        }
    }

    /// A lifetime ending `remaining` from now.
    pub fn from_now(remaining: Duration) -> Self {
        let expires_at = chrono::Duration::from_std(remaining)
            .ok()
            .and_then(|d| Utc::now().checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self::at(expires_at)
    }

    pub fn is_unset(&self) -> bool {
        self.expires_at.is_none()
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Time left before expiration.
    ///
    /// `None` for an unset lifetime, zero once the instant has passed.
    pub fn duration_until_expiration(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| (at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }

    /// Whether a set lifetime has already run out. Unset never expires.
    pub fn has_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }
}

impl From<DateTime<Utc>> for Lifetime {
    fn from(expires_at: DateTime<Utc>) -> Self {
        Self::at(expires_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset() {
        let lifetime = Lifetime::unset();
        assert!(lifetime.is_unset());
        assert_eq!(lifetime.expires_at(), None);
        assert_eq!(lifetime.duration_until_expiration(), None);
        assert!(!lifetime.has_expired());
    }

    #[test]
    fn test_from_now() {
        let lifetime = Lifetime::from_now(Duration::from_secs(60));
        assert!(!lifetime.is_unset());
        assert!(!lifetime.has_expired());

        let remaining = lifetime.duration_until_expiration().unwrap();
        assert!(remaining <= Duration::from_secs(60));
        assert!(remaining > Duration::from_secs(58));
    }

    #[test]
    fn test_past_lifetime() {
        let lifetime = Lifetime::at(Utc::now() - chrono::Duration::seconds(5));
        assert!(lifetime.has_expired());
        assert_eq!(lifetime.duration_until_expiration(), Some(Duration::ZERO));
    }

    #[test]
    fn test_huge_duration_saturates() {
        let lifetime = Lifetime::from_now(Duration::from_secs(u64::MAX));
        assert_eq!(lifetime.expires_at(), Some(DateTime::<Utc>::MAX_UTC));
    }
}
