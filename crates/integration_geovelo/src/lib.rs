//! Geovelo bike routing integration
//!
//! Computes bike itineraries through the Geovelo computed-routes API and
//! normalizes them into domain journeys. Bike legs always carry zero CO2.

pub mod client;
pub mod config;
pub mod error;

pub use client::{BikeRouteClient, GeoveloHttpClient};
pub use config::GeoveloConfig;
pub use error::GeoveloError;
