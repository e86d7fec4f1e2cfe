//! Value objects - Immutable domain primitives

mod geo_location;
mod routing_datetime;

pub use geo_location::GeoLocation;
pub use routing_datetime::RoutingDateTime;
