//! Geovelo service configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Geovelo computed-routes API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeoveloConfig {
    /// Base URL for the Geovelo API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key sent as the `apikey` header
    #[serde(default)]
    pub api_key: String,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://prim.iledefrance-mobilites.fr/marketplace".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for GeoveloConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GeoveloConfig {
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

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeoveloConfig::default();
        assert_eq!(
            config.base_url,
            "https://prim.iledefrance-mobilites.fr/marketplace"
        );
        assert_eq!(config.timeout_secs, 10);
        assert!(config.api_key.is_empty());
    }

    #[test]
    fn test_validation_requires_api_key() {
        let config = GeoveloConfig::default();
        assert!(config.validate().is_err());
        assert!(GeoveloConfig::for_testing().validate().is_ok());
    }

    #[test]
    fn test_validation_zero_timeout() {
        let config = GeoveloConfig {
            timeout_secs: 0,
            ..GeoveloConfig::for_testing()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let config = GeoveloConfig::for_testing();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: GeoveloConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.base_url, config.base_url);
        assert_eq!(deserialized.api_key, config.api_key);
    }
}
