//! Traffic service configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// Configuration for the Google Routes client
#[allow(clippy::struct_excessive_bools)] // Route modifiers map 1:1 onto API flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficConfig {
    /// Base URL for the Routes API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Routes API key, sent as `X-Goog-Api-Key`
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Ask the API for alternative routes
    #[serde(default = "default_true")]
    pub compute_alternatives: bool,

    #[serde(default)]
    pub avoid_tolls: bool,

    #[serde(default)]
    pub avoid_highways: bool,

    #[serde(default)]
    pub avoid_ferries: bool,

    /// BCP-47 language for localized values
    #[serde(default = "default_language_code")]
    pub language_code: String,
}

fn default_base_url() -> String {
    "https://routes.googleapis.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_true() -> bool {
    true
}

fn default_language_code() -> String {
    "en-US".to_string()
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            compute_alternatives: true,
            avoid_tolls: false,
            avoid_highways: false,
            avoid_ferries: false,
            language_code: default_language_code(),
        }
    }
}

impl TrafficConfig {
    /// Whether a non-blank API key is present
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key
            .as_ref()
            .is_some_and(|k| !k.expose_secret().trim().is_empty())
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

        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }
}
