//! Error types for the embedding boundary

/// Result type for embedding operations.
///
/// This is a convenience type alias that uses [`EmbedError`] as the error
/// type. Used throughout the crate for operations that can fail.
pub type Result<T> = std::result::Result<T, EmbedError>;

/// Error type for all embedding-provider failures.
///
/// Callers must never proceed with a mismatched chunk/vector count, so
/// every failure mode a provider can hit is surfaced as a distinct
/// variant rather than a short or reordered result. [`EmbedError::Timeout`]
/// and [`EmbedError::Unavailable`] are retryable: an enclosing agent can
/// back off and try again, everything else indicates a bug or a
/// configuration problem.
#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    /// The provider configuration is unusable (missing key, bad URL, ...)
    #[error("Invalid provider configuration: {message}")]
    InvalidConfig { message: String },

    /// The provider did not answer within the configured deadline
    #[error("Embedding request timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// The provider rejected or failed the request (rate limit, 5xx, network)
    #[error("Embedding provider unavailable: {message}")]
    Unavailable { message: String },

    /// The provider answered with a different number of vectors than texts sent
    #[error("Embedding batch mismatch: sent {sent} texts, received {received} vectors")]
    BatchMismatch { sent: usize, received: usize },

    /// Vectors within one response disagree on their dimension
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The provider returned a body this crate could not decode
    #[error("Malformed provider response: {message}")]
    MalformedResponse { message: String },
}

impl EmbedError {
    /// Create an invalid configuration error with a custom message.
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an unavailable error with a custom message.
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Whether retrying the same request later could reasonably succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Unavailable { .. })
    }
}
