//! Domain entities

mod journey;
mod parking;

pub use journey::{GiftMarker, Journey, PathSegment};
pub use parking::{ParkKind, ParkingFacility};
