//! Geocoding port
//!
//! Resolves free-text addresses to coordinates. Only consulted when an
//! inbound request names a place instead of giving lat/lon directly.

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the geocoding provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve a free-text address to its best-match coordinates
    async fn geocode(&self, address: &str) -> Result<GeoLocation, ApplicationError>;
}
