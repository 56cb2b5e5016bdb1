//! In-memory session values with a binary snapshot format.
//!
//! This crate provides the container that a session bridge hydrates from,
//! and flushes back to, an external TTL store:
//! - [`Value`], a closed set of storable types
//! - [`ValueStore`], a keyed map behind a reader/writer lock
//! - a deterministic snapshot codec ([`encode`] / [`decode`])
//!
//! # Example
//!
//! ```rust
//! use sesh_store::{Value, ValueStore};
//!
//! let store = ValueStore::new();
//! store.set("user_id", 42);
//! store.set("name", "alice");
//!
//! let bytes = store.serialize().unwrap();
//! let restored = ValueStore::from_snapshot(&bytes).unwrap();
//! assert_eq!(restored.get("user_id"), Some(Value::Int(42)));
//! ```

mod codec;
mod error;
mod store;
mod value;

pub use codec::{FORMAT_VERSION, MAGIC, MAX_DEPTH, decode, encode};
pub use error::{Error, Result};
pub use store::ValueStore;
pub use value::Value;
