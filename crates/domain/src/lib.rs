//! Domain layer - Core types for multimodal journey planning
//!
//! Pure types and algorithms with no I/O: geographic value objects, journey
//! entities, the parking-facility model, and the polyline geometry codec.

pub mod entities;
pub mod errors;
pub mod polyline;
pub mod value_objects;

pub use entities::{GiftMarker, Journey, ParkKind, ParkingFacility, PathSegment};
pub use errors::DomainError;
pub use value_objects::{GeoLocation, RoutingDateTime};
