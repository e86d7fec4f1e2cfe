//! Domain error types

use thiserror::Error;

/// Errors raised by domain-level validation and codecs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Latitude or longitude out of range
    #[error("Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180")]
    InvalidCoordinates,

    /// Timestamp not in the `YYYYMMDDTHHMMSS` wire format
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Polyline string could not be decoded
    #[error("Invalid polyline: {0}")]
    InvalidPolyline(String),
}
