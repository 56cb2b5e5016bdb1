//! Error types for backend operations.

/// Error type for backend operations.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Error reported by the Redis client (I/O, protocol, server error).
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// The backend connection was closed.
    #[error("Backend connection is closed")]
    Closed,

    /// The backend cannot currently be reached.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Connection settings cannot be used.
    #[error("Invalid backend configuration: {0}")]
    InvalidConfig(String),

    /// The server replied with something the client does not understand.
    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),
}

/// Result type for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
