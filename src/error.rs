use thiserror::Error;

/// The error type for booking rate limiter construction.
///
/// A running limiter never errors: every request either proceeds or is
/// denied, and denial is a designed outcome carried by
/// [`Decision`](crate::Decision), not an error. The only failure mode is a
/// nonsensical policy, rejected when the limiter is built.
#[derive(Debug, Error)]
pub enum RateLimitError {
    #[error("invalid rate limit configuration: {0}")]
    InvalidConfig(String),
}

impl RateLimitError {
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}

/// Result type alias for fallible limiter construction.
pub type Result<T> = std::result::Result<T, RateLimitError>;
