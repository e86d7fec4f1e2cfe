//! Ports - Interfaces implemented by infrastructure adapters

mod geocoding;
mod routing;

pub use geocoding::GeocodingPort;
pub use routing::{BikeRoutingPort, CarRoutingPort, RoutingQuery, TransitRoutingPort};

#[cfg(test)]
pub use geocoding::MockGeocodingPort;
#[cfg(test)]
pub use routing::{MockBikeRoutingPort, MockCarRoutingPort, MockTransitRoutingPort};
