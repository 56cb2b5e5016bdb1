//! TTL-aware byte store backends for sesh.
//!
//! The session bridge never talks to Redis directly. It goes through the
//! [`TtlBackend`] trait, which exposes the handful of primitives it needs:
//! get/set/delete/exists on raw bytes plus TTL inspection and refresh.
//!
//! Two implementations are provided:
//! - [`RedisBackend`], a blocking Redis client over one shared connection
//! - [`MemoryBackend`], an in-process map with real expiration, for tests
//!   and for embedding without a server

mod backend;
mod error;
mod memory;
mod redis_backend;

pub use backend::{Expiry, MAX_TTL_SECS, TtlBackend, TtlStatus};
pub use error::{BackendError, Result};
pub use memory::MemoryBackend;
pub use redis_backend::RedisBackend;
