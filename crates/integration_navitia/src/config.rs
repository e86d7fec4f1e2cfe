//! Navitia service configuration

use serde::{Deserialize, Serialize};

/// Maximum distance of a journey that is nothing but walking, meters
const fn default_max_walking_only_meters() -> f64 {
    1_000.0
}

/// Configuration for the Navitia journeys API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavitiaConfig {
    /// Base URL for the Navitia API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `apikey` header
    #[serde(default)]
    pub api_key: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Journeys consisting of a single walking section longer than this
    /// are dropped
    #[serde(default = "default_max_walking_only_meters")]
    pub max_walking_only_meters: f64,
}

fn default_base_url() -> String {
    "https://prim.iledefrance-mobilites.fr/marketplace".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for NavitiaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
            max_walking_only_meters: default_max_walking_only_meters(),
        }
    }
}

impl NavitiaConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: "test-key".to_string(),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url must not be empty".to_string());
        }

        if self.api_key.is_empty() {
            return Err("api_key must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.max_walking_only_meters < 0.0 {
            return Err("max_walking_only_meters must not be negative".to_string());
        }

        Ok(())
    }
}
