//! Backend trait for TTL-aware byte storage.
//!
//! This module defines the `TtlBackend` trait that lets the session bridge
//! run against different stores (Redis, in-memory, etc.) interchangeably.
//!
//! # Example
//!
//! ```ignore
//! use sesh_backend::{Expiry, MemoryBackend, TtlBackend};
//!
//! let backend = MemoryBackend::new();
//! backend.set("sid", b"payload", Expiry::In(Duration::from_secs(60)))?;
//! assert!(backend.exists("sid")?);
//! ```

use std::time::Duration;

use crate::error::Result;

/// Expiration instruction attached to a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiry {
    /// Keep whatever expiration the entry already has.
    ///
    /// Writing a new entry with `Keep` creates it without an expiration.
    Keep,
    /// Expire after the given duration, rounded up to whole seconds.
    In(Duration),
}

impl Expiry {
    /// Build from a second count where 0 means "leave the TTL alone".
    pub fn from_secs(secs: u64) -> Self {
        if secs == 0 {
            Expiry::Keep
        } else {
            Expiry::In(Duration::from_secs(secs))
        }
    }

    /// Whole seconds to send to the store, or `None` for [`Expiry::Keep`].
    ///
    /// Durations are rounded up and never below one second, so a short but
    /// positive lifetime never turns into "no expiration".
    pub fn as_secs(&self) -> Option<u64> {
        match self {
            Expiry::Keep => None,
            Expiry::In(d) => Some(ceil_secs(*d)),
        }
    }
}

/// Expiration state of an entry as reported by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlStatus {
    /// No entry under this id.
    Missing,
    /// The entry exists and never expires.
    Persistent,
    /// The entry exists and expires after the given time.
    Expires(Duration),
}

impl TtlStatus {
    pub fn exists(&self) -> bool {
        !matches!(self, TtlStatus::Missing)
    }

    /// Remaining time to live, if the entry has one.
    pub fn remaining(&self) -> Option<Duration> {
        match self {
            TtlStatus::Expires(d) => Some(*d),
            _ => None,
        }
    }
}

/// Trait for TTL-aware byte stores.
///
/// One implementation instance is shared by all sessions, so every method
/// takes `&self`. Calls block until the store answers.
///
/// Absent entries are never errors: `get` returns `Ok(None)`, `delete`
/// returns `Ok(false)` and `ttl` returns [`TtlStatus::Missing`].
pub trait TtlBackend: Send + Sync {
    /// Check that the store answers.
    fn ping(&self) -> Result<bool>;

    /// Fetch the raw bytes stored under `id`.
    fn get(&self, id: &str) -> Result<Option<Vec<u8>>>;

    /// Store `payload` under `id`, replacing any previous value.
    fn set(&self, id: &str, payload: &[u8], expiry: Expiry) -> Result<()>;

    /// Check whether `id` exists.
    fn exists(&self, id: &str) -> Result<bool>;

    /// Remove `id`. Returns true if an entry was removed.
    fn delete(&self, id: &str) -> Result<bool>;

    /// Report the expiration state of `id`.
    fn ttl(&self, id: &str) -> Result<TtlStatus>;

    /// Reset the expiration of `id` without touching its payload.
    ///
    /// Returns false if there is no entry to update.
    fn update_ttl(&self, id: &str, ttl: Duration) -> Result<bool>;

    /// Release the underlying connection.
    ///
    /// Idempotent. Calls made after closing fail with
    /// [`BackendError::Closed`](crate::BackendError::Closed).
    fn close(&self) -> Result<()>;
}

/// Longest expiration sent to a store, about one hundred years.
///
/// Longer durations are clamped to this. Redis rejects expirations whose
/// millisecond deadline does not fit in an `i64`.
pub const MAX_TTL_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// Round a duration up to whole seconds, between one and [`MAX_TTL_SECS`].
pub(crate) fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs().saturating_add(u64::from(d.subsec_nanos() > 0));
    secs.clamp(1, MAX_TTL_SECS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_from_secs() {
        assert_eq!(Expiry::from_secs(0), Expiry::Keep);
        assert_eq!(Expiry::from_secs(30), Expiry::In(Duration::from_secs(30)));
    }

    #[test]
    fn test_expiry_rounds_up() {
        assert_eq!(Expiry::Keep.as_secs(), None);
        assert_eq!(Expiry::In(Duration::from_secs(5)).as_secs(), Some(5));
        assert_eq!(Expiry::In(Duration::from_millis(5_001)).as_secs(), Some(6));
        assert_eq!(Expiry::In(Duration::from_millis(10)).as_secs(), Some(1));
        assert_eq!(Expiry::In(Duration::ZERO).as_secs(), Some(1));
    }

    #[test]
    fn test_expiry_clamps_huge_durations() {
        assert_eq!(Expiry::In(Duration::MAX).as_secs(), Some(MAX_TTL_SECS));
        assert_eq!(
            Expiry::In(Duration::from_secs(u64::MAX)).as_secs(),
            Some(MAX_TTL_SECS)
        );
        assert_eq!(
            Expiry::In(Duration::from_secs(MAX_TTL_SECS)).as_secs(),
            Some(MAX_TTL_SECS)
        );
    }

    #[test]
    fn test_ttl_status() {
        assert!(!TtlStatus::Missing.exists());
        assert!(TtlStatus::Persistent.exists());
        assert_eq!(TtlStatus::Persistent.remaining(), None);
        assert_eq!(
            TtlStatus::Expires(Duration::from_secs(3)).remaining(),
            Some(Duration::from_secs(3))
        );
    }
}
