//! In-process TTL backend.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crate::backend::{Expiry, TtlBackend, TtlStatus, ceil_secs};
use crate::error::{BackendError, Result};

#[derive(Debug, Clone)]
struct Entry {
    payload: Vec<u8>,
    deadline: Option<Instant>,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        self.deadline.is_some_and(|d| d <= now)
    }
}

/// In-memory backend with real expiration.
///
/// Expired entries are purged lazily when touched. Behaves like the Redis
/// backend for every [`TtlBackend`] call, including `Expiry::Keep` keeping
/// an existing deadline. It also records the expiry of the most recent
/// write per id so tests can assert what a caller asked for.
#[derive(Debug)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, Entry>>,
    last_expiry: Mutex<HashMap<String, Expiry>>,
    available: AtomicBool,
    closed: AtomicBool,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            last_expiry: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            closed: AtomicBool::new(false),
        }
    }
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate the store going away (or coming back).
    ///
    /// While unavailable every call fails with
    /// [`BackendError::Unavailable`] and `ping` returns an error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Expiry passed to the most recent `set` for `id`.
    pub fn last_expiry(&self, id: &str) -> Option<Expiry> {
        self.last_expiry.lock().get(id).copied()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .values()
            .filter(|e| !e.is_expired(now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BackendError::Closed);
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(BackendError::Unavailable("memory backend offline".to_string()));
        }
        Ok(())
    }

    /// Run `f` on the entry map after purging `id` if it has expired.
    fn with_entries<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut HashMap<String, Entry>) -> T,
    ) -> T {
        let mut entries = self.entries.lock();
        let now = Instant::now();
        if entries.get(id).is_some_and(|e| e.is_expired(now)) {
            trace!(id = %id, "Purging expired entry");
            entries.remove(id);
        }
        f(&mut entries)
    }

    /// Run `f` on the live entry for `id`, purging it first if expired.
    fn with_live<T>(&self, id: &str, f: impl FnOnce(Option<&mut Entry>) -> T) -> T {
        self.with_entries(id, |entries| f(entries.get_mut(id)))
    }
}

/// Deadline `ttl` from now. `None` (never expires) if the clock can't
/// represent it.
fn deadline_after(ttl: Duration) -> Option<Instant> {
    Instant::now().checked_add(Duration::from_secs(ceil_secs(ttl)))
}

impl TtlBackend for MemoryBackend {
    fn ping(&self) -> Result<bool> {
        self.check()?;
        Ok(true)
    }

    fn get(&self, id: &str) -> Result<Option<Vec<u8>>> {
        self.check()?;
        Ok(self.with_live(id, |entry| entry.map(|e| e.payload.clone())))
    }

    fn set(&self, id: &str, payload: &[u8], expiry: Expiry) -> Result<()> {
        self.check()?;
        self.with_entries(id, |entries| {
            let deadline = match expiry {
                Expiry::Keep => entries.get(id).and_then(|e| e.deadline),
                Expiry::In(d) => deadline_after(d),
            };
            entries.insert(
                id.to_string(),
                Entry {
                    payload: payload.to_vec(),
                    deadline,
                },
            );
        });
        self.last_expiry.lock().insert(id.to_string(), expiry);
        Ok(())
    }

    fn exists(&self, id: &str) -> Result<bool> {
        self.check()?;
        Ok(self.with_live(id, |entry| entry.is_some()))
    }

    fn delete(&self, id: &str) -> Result<bool> {
        self.check()?;
        Ok(self.with_entries(id, |entries| entries.remove(id).is_some()))
    }

    fn ttl(&self, id: &str) -> Result<TtlStatus> {
        self.check()?;
        let now = Instant::now();
        Ok(self.with_live(id, |entry| match entry {
            None => TtlStatus::Missing,
            Some(Entry { deadline: None, .. }) => TtlStatus::Persistent,
            Some(Entry {
                deadline: Some(deadline),
                ..
            }) => TtlStatus::Expires(deadline.saturating_duration_since(now)),
        }))
    }

    fn update_ttl(&self, id: &str, ttl: Duration) -> Result<bool> {
        self.check()?;
        let deadline = deadline_after(ttl);
        Ok(self.with_live(id, |entry| match entry {
            Some(e) => {
                e.deadline = deadline;
                true
            }
            None => false,
        }))
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
