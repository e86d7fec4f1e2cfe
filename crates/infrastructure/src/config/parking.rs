//! Parking data file configuration.

use serde::{Deserialize, Serialize};

/// Paths to the parking facility CSV exports loaded at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingConfig {
    /// Bike parking export (Île-de-France Mobilités open data)
    #[serde(default = "default_bike_csv_path")]
    pub bike_csv_path: String,

    /// Park-and-ride car parking export
    #[serde(default = "default_car_csv_path")]
    pub car_csv_path: String,
}

fn default_bike_csv_path() -> String {
    "data/stationnement_velo_en_ile_de_france.csv".to_string()
}

fn default_car_csv_path() -> String {
    "data/parking_relais_idf.csv".to_string()
}

impl Default for ParkingConfig {
    fn default() -> Self {
        Self {
            bike_csv_path: default_bike_csv_path(),
            car_csv_path: default_car_csv_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parking_config() {
        let config = ParkingConfig::default();
        assert!(config.bike_csv_path.ends_with(".csv"));
        assert!(config.car_csv_path.ends_with(".csv"));
        assert_ne!(config.bike_csv_path, config.car_csv_path);
    }
}
