//! Parking facility data loading

mod csv_loader;

pub use csv_loader::{ParkingDataError, load_facilities, load_index};
