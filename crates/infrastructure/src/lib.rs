//! Infrastructure layer
//!
//! Hosts everything that touches the outside world: application
//! configuration, the parking facility CSV loader, and the adapters that
//! implement the application's routing and geocoding ports on top of the
//! integration clients.

pub mod adapters;
pub mod config;
pub mod parking;

pub use config::AppConfig;
