//! Port adapters
//!
//! Implement the application's routing and geocoding ports on top of the
//! integration clients, mapping each provider's error type onto
//! `ApplicationError`.

mod geocoding_adapter;
mod geovelo_adapter;
mod graphhopper_adapter;
mod navitia_adapter;

pub use geocoding_adapter::GeocodingAdapter;
pub use geovelo_adapter::GeoveloAdapter;
pub use graphhopper_adapter::GraphHopperAdapter;
pub use navitia_adapter::NavitiaAdapter;
