//! Session bridge between per-session values and a TTL-aware store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sesh_backend::{Expiry, RedisBackend, TtlBackend, TtlStatus};
use sesh_config::{DecodePolicy, SeshConfig};
use sesh_store::{Value, ValueStore};
use tracing::{debug, trace, warn};

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::lifetime::Lifetime;

/// Per-session key/value operations backed by a [`TtlBackend`].
///
/// Each session is stored as one snapshot of a [`ValueStore`] under its
/// session id. Every operation:
/// 1. loads the snapshot (a missing entry is an empty store),
/// 2. applies its change to a fresh in-memory store,
/// 3. for writes, serializes the whole store and writes it back.
///
/// Backend failures during load and persist are logged and absorbed: reads
/// see an empty session and a failed write is dropped. There is no retry.
///
/// Call [`close`](Self::close) when done. Dropping an unclosed bridge closes
/// the backend too, but logs that it had to.
pub struct SessionBridge<B: TtlBackend = RedisBackend> {
    backend: B,
    config: BridgeConfig,
    closed: AtomicBool,
}

impl SessionBridge<RedisBackend> {
    /// Connect to Redis using loaded configuration.
    pub fn from_config(config: &SeshConfig) -> Result<Self> {
        let backend = RedisBackend::connect(&config.redis())
            .map_err(|e| Error::Unreachable(e.to_string()))?;
        Self::connect(backend, BridgeConfig::from(&config.session()))
    }
}

impl<B: TtlBackend> SessionBridge<B> {
    /// Create a bridge over `backend`, checking that it answers a ping.
    ///
    /// On failure the backend is closed and no bridge is returned.
    pub fn connect(backend: B, config: BridgeConfig) -> Result<Self> {
        let reason = match backend.ping() {
            Ok(true) => None,
            Ok(false) => Some("ping was not answered with PONG".to_string()),
            Err(e) => Some(e.to_string()),
        };
        if let Some(reason) = reason {
            debug!(error = %reason, "Session backend ping failed");
            let _ = backend.close();
            return Err(Error::Unreachable(reason));
        }

        Ok(Self {
            backend,
            config,
            closed: AtomicBool::new(false),
        })
    }

    /// Get the bridge configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Get the underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Read the session's lifetime from the store.
    ///
    /// If the session has no entry yet, one is created with an empty payload
    /// expiring after `default_expires`, and an unset lifetime is returned so
    /// the session manager applies its own policy. An entry without an
    /// expiration also yields an unset lifetime.
    pub fn acquire(&self, sid: &str, default_expires: Duration) -> Lifetime {
        match self.backend.ttl(sid) {
            Ok(TtlStatus::Missing) => {
                let expiry = if default_expires.is_zero() {
                    Expiry::Keep
                } else {
                    Expiry::In(default_expires)
                };
                debug!(session_id = %sid, ?expiry, "Creating session entry");
                if let Err(e) = self.backend.set(sid, &[], expiry) {
                    warn!(session_id = %sid, error = %e, "Failed to create session entry");
                }
                Lifetime::unset()
            }
            Ok(TtlStatus::Persistent) => Lifetime::unset(),
            Ok(TtlStatus::Expires(remaining)) => Lifetime::from_now(remaining),
            Err(e) => {
                // Don't create an entry here: it might exist and would be
                // overwritten with an empty payload.
                warn!(session_id = %sid, error = %e, "Failed to read session TTL");
                Lifetime::unset()
            }
        }
    }

    /// [`acquire`](Self::acquire) with the configured default expiration.
    pub fn acquire_default(&self, sid: &str) -> Lifetime {
        self.acquire(sid, self.config.default_expires)
    }

    /// Reset the session's expiration without touching its values.
    pub fn on_update_expiration(&self, sid: &str, new_expires: Duration) -> Result<()> {
        let updated = self.backend.update_ttl(sid, new_expires)?;
        if !updated {
            debug!(session_id = %sid, "No session entry to refresh");
        }
        Ok(())
    }

    /// Set a value, persisting the session with the time left in `lifetime`.
    ///
    /// An unset or already elapsed lifetime leaves the entry's current
    /// expiration in place.
    pub fn set(
        &self,
        sid: &str,
        lifetime: &Lifetime,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<()> {
        let store = self.load(sid)?;
        store.set(key, value);
        self.persist(sid, &store, expiry_for(lifetime))
    }

    /// Get a value. Missing sessions and keys yield `None`.
    pub fn get(&self, sid: &str, key: &str) -> Result<Option<Value>> {
        Ok(self.load(sid)?.get(key))
    }

    /// Call `f` for every value in the session, in no particular order.
    pub fn visit<F>(&self, sid: &str, f: F) -> Result<()>
    where
        F: FnMut(&str, &Value),
    {
        self.load(sid)?.visit(f);
        Ok(())
    }

    /// Number of values in the session.
    pub fn len(&self, sid: &str) -> Result<usize> {
        Ok(self.load(sid)?.len())
    }

    /// Whether the session holds no values.
    pub fn is_empty(&self, sid: &str) -> Result<bool> {
        Ok(self.len(sid)? == 0)
    }

    /// Remove a value. Returns false, without writing, if it was not set.
    pub fn delete(&self, sid: &str, key: &str) -> Result<bool> {
        let store = self.load(sid)?;
        if !store.delete(key) {
            return Ok(false);
        }
        self.persist(sid, &store, Expiry::Keep)?;
        Ok(true)
    }

    /// Remove every value but keep the session entry.
    pub fn clear(&self, sid: &str) -> Result<()> {
        let store = self.load(sid)?;
        if store.is_empty() {
            return Ok(());
        }
        store.flush();
        self.persist(sid, &store, Expiry::Keep)
    }

    /// Destroy the session: clear its values and delete its entry.
    ///
    /// A snapshot that fails to clear is still deleted. Releasing a session
    /// with no entry succeeds.
    pub fn release(&self, sid: &str) -> Result<()> {
        if let Err(e) = self.clear(sid) {
            debug!(session_id = %sid, error = %e, "Clear before release failed");
        }
        let existed = self.backend.delete(sid)?;
        debug!(session_id = %sid, existed, "Released session");
        Ok(())
    }

    /// Close the backend connection. Idempotent.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        self.backend.close()?;
        Ok(())
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Fetch and decode the session's snapshot.
    fn load(&self, sid: &str) -> Result<ValueStore> {
        let store = ValueStore::new();

        let bytes = match self.backend.get(sid) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                trace!(session_id = %sid, "Session not in store");
                return Ok(store);
            }
            Err(e) => {
                warn!(session_id = %sid, error = %e, "Failed to load session, using empty store");
                return Ok(store);
            }
        };

        if let Err(e) = store.deserialize(&bytes) {
            match self.config.decode_policy {
                DecodePolicy::Lenient => {
                    warn!(
                        session_id = %sid,
                        error = %e,
                        bytes = bytes.len(),
                        "Discarding undecodable session snapshot"
                    );
                }
                DecodePolicy::Strict => return Err(e.into()),
            }
        }

        debug!(session_id = %sid, entries = store.len(), "Session loaded");
        Ok(store)
    }

    /// Serialize the store and write it back.
    fn persist(&self, sid: &str, store: &ValueStore, expiry: Expiry) -> Result<()> {
        let bytes = store.serialize()?;
        match self.backend.set(sid, &bytes, expiry) {
            Ok(()) => debug!(
                session_id = %sid,
                entries = store.len(),
                ?expiry,
                "Session persisted"
            ),
            Err(e) => warn!(
                session_id = %sid,
                error = %e,
                "Failed to persist session, change is lost"
            ),
        }
        Ok(())
    }
}

impl<B: TtlBackend> Drop for SessionBridge<B> {
    fn drop(&mut self) {
        if !self.closed.load(Ordering::SeqCst) {
            debug!("SessionBridge dropped without close(), closing backend");
            let _ = self.backend.close();
        }
    }
}

/// Expiration to persist with for a caller-supplied lifetime.
fn expiry_for(lifetime: &Lifetime) -> Expiry {
    match lifetime.duration_until_expiration() {
        Some(remaining) if !remaining.is_zero() => Expiry::In(remaining),
        _ => Expiry::Keep,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sesh_backend::{BackendError, MemoryBackend};

    fn bridge() -> SessionBridge<MemoryBackend> {
        SessionBridge::connect(MemoryBackend::new(), BridgeConfig::default()).unwrap()
    }

    #[test]
    fn test_connect_fails_when_unreachable() {
        let backend = MemoryBackend::new();
        backend.set_available(false);

        let result = SessionBridge::connect(backend, BridgeConfig::default());
        assert!(matches!(result, Err(Error::Unreachable(_))));
    }

    #[test]
    fn test_expiry_for_lifetime() {
        assert_eq!(expiry_for(&Lifetime::unset()), Expiry::Keep);

        let past = Lifetime::at(chrono::Utc::now() - chrono::Duration::seconds(1));
        assert_eq!(expiry_for(&past), Expiry::Keep);

        let future = Lifetime::from_now(Duration::from_secs(120));
        match expiry_for(&future) {
            Expiry::In(d) => assert!(d > Duration::from_secs(118)),
            other => panic!("expected Expiry::In, got {:?}", other),
        }
    }

    #[test]
    fn test_load_failure_degrades_to_empty() {
        let bridge = bridge();
        bridge.set("sid", &Lifetime::unset(), "k", "v").unwrap();

        bridge.backend().set_available(false);
        assert_eq!(bridge.get("sid", "k").unwrap(), None);
        assert_eq!(bridge.len("sid").unwrap(), 0);

        bridge.backend().set_available(true);
        assert_eq!(bridge.get("sid", "k").unwrap(), Some(Value::from("v")));
    }

    #[test]
    fn test_persist_failure_is_absorbed() {
        let bridge = bridge();
        bridge.backend().set_available(false);

        bridge.set("sid", &Lifetime::unset(), "k", "v").unwrap();

        bridge.backend().set_available(true);
        assert_eq!(bridge.get("sid", "k").unwrap(), None);
    }

    #[test]
    fn test_update_expiration_surfaces_backend_error() {
        let bridge = bridge();
        bridge.backend().set_available(false);

        let err = bridge
            .on_update_expiration("sid", Duration::from_secs(10))
            .unwrap_err();
        assert!(matches!(err, Error::Backend(BackendError::Unavailable(_))));
    }

    #[test]
    fn test_release_surfaces_delete_failure() {
        let bridge = bridge();
        bridge.set("sid", &Lifetime::unset(), "k", "v").unwrap();

        bridge.backend().set_available(false);
        let err = bridge.release("sid").unwrap_err();
        assert!(matches!(err, Error::Backend(BackendError::Unavailable(_))));

        bridge.backend().set_available(true);
        assert_eq!(bridge.get("sid", "k").unwrap(), Some(Value::from("v")));
        bridge.release("sid").unwrap();
        assert!(!bridge.backend().exists("sid").unwrap());
    }

    #[test]
    fn test_close_is_idempotent() {
        let bridge = bridge();
        bridge.close().unwrap();
        bridge.close().unwrap();
        assert!(bridge.is_closed());
        assert!(bridge.backend().is_closed());

        // Closed backend behaves like an unreachable one for reads.
        assert_eq!(bridge.get("sid", "k").unwrap(), None);
    }
}
