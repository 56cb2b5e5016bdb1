//! Error types for value store operations.

/// Error type for value store operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value cannot be represented in the snapshot format.
    #[error("Encode error: {0}")]
    Encode(String),

    /// Snapshot bytes are malformed, truncated or of an unknown format.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for value store operations.
pub type Result<T> = std::result::Result<T, Error>;
