//! Error types for session bridge operations.

/// Error type for session bridge operations.
///
/// Missing sessions and missing keys are not errors. Backend failures while
/// loading or persisting are logged and absorbed; only construction,
/// expiration refresh, encoding, and (under a strict decode policy) decoding
/// surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend did not answer a ping at construction time.
    #[error("Backend unreachable: {0}")]
    Unreachable(String),

    /// Error from the TTL backend.
    #[error("Backend error: {0}")]
    Backend(#[from] sesh_backend::BackendError),

    /// A snapshot could not be encoded or decoded.
    #[error("Snapshot error: {0}")]
    Store(#[from] sesh_store::Error),
}

/// Result type for session bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
