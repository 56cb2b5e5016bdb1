//! Session values stored in a TTL-aware key/value server.
//!
//! This crate provides the database side of a session manager:
//! - [`SessionBridge`] loads a session's snapshot, applies one operation
//!   and writes the snapshot back with the right expiration
//! - [`Lifetime`] tells the session manager when a session expires, or that
//!   it should apply its own default
//! - [`BridgeConfig`] selects the default expiration and how corrupt
//!   snapshots are handled
//!
//! Every call works on a fresh [`ValueStore`](sesh_store::ValueStore); nothing
//! is cached between calls. Two concurrent writes to the same session race
//! and the last one wins.
//!
//! # Example
//!
//! ```rust,ignore
//! use sesh_session::{BridgeConfig, Lifetime, SessionBridge};
//! use sesh_backend::MemoryBackend;
//!
//! let bridge = SessionBridge::connect(MemoryBackend::new(), BridgeConfig::default())?;
//! let lifetime = bridge.acquire("sid-1", Duration::from_secs(1800));
//! bridge.set("sid-1", &lifetime, "user_id", 42)?;
//! assert_eq!(bridge.get("sid-1", "user_id")?, Some(Value::Int(42)));
//! bridge.close()?;
//! ```

mod bridge;
mod config;
mod error;
mod lifetime;

pub use bridge::SessionBridge;
pub use config::BridgeConfig;
pub use error::{Error, Result};
pub use lifetime::Lifetime;

pub use sesh_backend::{Expiry, MemoryBackend, RedisBackend, TtlBackend, TtlStatus};
pub use sesh_config::DecodePolicy;
pub use sesh_store::{Value, ValueStore};
