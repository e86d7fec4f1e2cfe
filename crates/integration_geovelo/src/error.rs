//! Geovelo error types

use thiserror::Error;

/// Errors that can occur while computing bike routes
#[derive(Debug, Error)]
pub enum GeoveloError {
    /// Connection to the Geovelo service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to the Geovelo service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse a Geovelo response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl GeoveloError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}
