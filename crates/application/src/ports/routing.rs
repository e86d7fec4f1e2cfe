//! Routing provider ports
//!
//! One port per provider family. Each adapter translates the shared query
//! into exactly one provider HTTP call and normalizes the response into the
//! common `Journey` shape, so planners never see raw provider JSON.
//!
//! The bike and car providers return at most one journey; the public-transit
//! provider may return several ranked alternatives. All three share the same
//! list-of-journeys contract.

use async_trait::async_trait;
use domain::{GeoLocation, Journey, RoutingDateTime};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// A routing request shared by every provider port
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingQuery {
    /// Trip origin
    pub origin: GeoLocation,
    /// Trip destination
    pub destination: GeoLocation,
    /// Requested departure time
    pub departure: RoutingDateTime,
}

impl RoutingQuery {
    /// Create a new routing query
    #[must_use]
    pub const fn new(
        origin: GeoLocation,
        destination: GeoLocation,
        departure: RoutingDateTime,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
        }
    }
}

/// Port for the bike-routing provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait BikeRoutingPort: Send + Sync {
    /// Compute bike journeys for the query (zero or one in practice)
    async fn route(&self, query: &RoutingQuery) -> Result<Vec<Journey>, ApplicationError>;
}

/// Port for the car-routing provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CarRoutingPort: Send + Sync {
    /// Compute car journeys for the query (zero or one in practice)
    async fn route(&self, query: &RoutingQuery) -> Result<Vec<Journey>, ApplicationError>;
}

/// Port for the public-transit provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TransitRoutingPort: Send + Sync {
    /// Compute transit journeys for the query, ranked by the provider
    async fn route(&self, query: &RoutingQuery) -> Result<Vec<Journey>, ApplicationError>;
}
