//! GraphHopper service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the GraphHopper routing API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphHopperConfig {
    /// Base URL for the GraphHopper API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `key` query parameter
    #[serde(default)]
    pub api_key: String,

    /// Routing profile
    #[serde(default = "default_profile")]
    pub profile: String,

    /// Locale for instruction text
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://graphhopper.com/api/1".to_string()
}

fn default_profile() -> String {
    "car".to_string()
}

fn default_locale() -> String {
    "fr".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for GraphHopperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            profile: default_profile(),
            locale: default_locale(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GraphHopperConfig {
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

        if self.profile.is_empty() {
            return Err("profile must not be empty".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
