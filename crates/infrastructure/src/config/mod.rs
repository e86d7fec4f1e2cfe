//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `parking`: parking facility CSV paths
//!
//! Provider settings reuse the config structs shipped by the integration
//! crates, so defaults stay next to the clients that interpret them.

mod parking;
mod server;

use integration_geovelo::GeoveloConfig;
use integration_graphhopper::GraphHopperConfig;
use integration_navitia::{NavitiaConfig, NominatimConfig};
use serde::{Deserialize, Serialize};

pub use parking::ParkingConfig;
pub use server::ServerConfig;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Parking data files
    #[serde(default)]
    pub parking: ParkingConfig,

    /// Geovelo bike routing
    #[serde(default)]
    pub geovelo: GeoveloConfig,

    /// GraphHopper car routing
    #[serde(default)]
    pub graphhopper: GraphHopperConfig,

    /// Navitia public transit
    #[serde(default)]
    pub navitia: NavitiaConfig,

    /// Nominatim geocoding
    #[serde(default)]
    pub geocoding: NominatimConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and environment
    /// variables prefixed with `VERDIROUTE_`
    ///
    /// Sections are addressed with a double underscore so multi-word keys
    /// stay intact, e.g. `VERDIROUTE_SERVER__PORT` or
    /// `VERDIROUTE_PARKING__BIKE_CSV_PATH`.
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be read or a value fails to
    /// deserialize.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Start with defaults
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            // Load from file if exists
            .add_source(config::File::with_name("config").required(false))
            // Override with environment variables
            .add_source(Self::environment_source());

        let config = builder.build()?;
        config.try_deserialize()
    }

    fn environment_source() -> config::Environment {
        config::Environment::with_prefix("VERDIROUTE")
            .separator("__")
            .try_parsing(true)
    }

    /// Validate provider configurations
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, naming the offending section.
    pub fn validate(&self) -> Result<(), String> {
        self.geovelo
            .validate()
            .map_err(|e| format!("geovelo: {e}"))?;
        self.graphhopper
            .validate()
            .map_err(|e| format!("graphhopper: {e}"))?;
        self.navitia
            .validate()
            .map_err(|e| format!("navitia: {e}"))?;
        Ok(())
    }
}
