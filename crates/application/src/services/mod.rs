//! Planning services

mod gifts;
mod intermodal;
mod journey_planner;
mod parking_index;

pub use gifts::place_gifts;
pub use intermodal::IntermodalPlanner;
pub use journey_planner::{EncodedPath, JourneyPlanner, RankedJourney};
pub use parking_index::{ParkingIndex, SearchBand};
