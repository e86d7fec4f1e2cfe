//! Navitia public transit integration
//!
//! Queries the Navitia journeys API and normalizes its sections into domain
//! journeys, keeping only public-transport and street-network sections.
//! Also hosts the Nominatim geocoding client used to resolve free-text
//! addresses into coordinates.

pub mod client;
pub mod config;
pub mod error;
pub mod geocoding;

pub use client::{NavitiaHttpClient, TransitRouteClient};
pub use config::NavitiaConfig;
pub use error::NavitiaError;
pub use geocoding::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
