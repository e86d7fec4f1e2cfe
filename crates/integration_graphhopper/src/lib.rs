//! GraphHopper car routing integration
//!
//! Computes car itineraries through the GraphHopper routing API and
//! normalizes them into domain journeys. GraphHopper reports durations
//! rather than absolute times, so leg times are anchored to the wall clock
//! at request time, and CO2 is derived from the reported distance.

pub mod client;
pub mod config;
pub mod error;

pub use client::{CarRouteClient, GraphHopperHttpClient};
pub use config::GraphHopperConfig;
pub use error::GraphHopperError;
