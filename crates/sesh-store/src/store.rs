//! Concurrency-safe keyed value container.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::trace;

use crate::codec;
use crate::error::Result;
use crate::value::Value;

/// Keyed session values protected by a reader/writer lock.
///
/// Reads (`get`, `len`, `visit`, `serialize`) share the lock; every write
/// (`set`, `delete`, `flush`, `deserialize`) takes it exclusively, so a
/// reader never observes a half-applied write.
///
/// A store is a transient projection of one snapshot. It is not meant to be
/// cached between session operations.
#[derive(Debug, Default)]
pub struct ValueStore {
    values: RwLock<HashMap<String, Value>>,
}

impl ValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store hydrated from snapshot bytes.
    pub fn from_snapshot(bytes: &[u8]) -> Result<Self> {
        let store = Self::new();
        store.deserialize(bytes)?;
        Ok(store)
    }

    /// Insert or overwrite a value. Returns the previous value, if any.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.write().insert(key.into(), value.into())
    }

    /// Get a copy of the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.read().get(key).cloned()
    }

    /// Check whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.values.read().contains_key(key)
    }

    /// Remove `key`. Returns false if it was not present.
    pub fn delete(&self, key: &str) -> bool {
        self.values.write().remove(key).is_some()
    }

    /// Remove every value.
    pub fn flush(&self) {
        self.values.write().clear();
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }

    /// Snapshot of the current keys, in no particular order.
    pub fn keys(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }

    /// Call `f` for every entry, in no particular order.
    ///
    /// The shared lock is held for the whole iteration; `f` must not write
    /// back into the same store.
    pub fn visit<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Value),
    {
        let values = self.values.read();
        for (key, value) in values.iter() {
            f(key, value);
        }
    }

    /// Encode the current contents as snapshot bytes.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let values = self.values.read();
        let bytes = codec::encode(&values)?;
        trace!(entries = values.len(), bytes = bytes.len(), "Serialized value store");
        Ok(bytes)
    }

    /// Replace the current contents with the mapping encoded in `bytes`.
    ///
    /// On error the store is left unchanged.
    pub fn deserialize(&self, bytes: &[u8]) -> Result<()> {
        let decoded = codec::decode(bytes)?;
        let mut values = self.values.write();
        *values = decoded;
        trace!(entries = values.len(), "Deserialized value store");
        Ok(())
    }

    /// Consume the store and return its map.
    pub fn into_inner(self) -> HashMap<String, Value> {
        self.values.into_inner()
    }
}
