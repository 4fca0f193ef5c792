//! Google integration configuration

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// OAuth client credentials, refresh tokens and API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleConfig {
    /// OAuth client ID of the installed-app client
    #[serde(default)]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing)]
    pub client_secret: Option<SecretString>,

    /// Refresh token used for Gmail
    #[serde(default, skip_serializing)]
    pub gmail_refresh_token: Option<SecretString>,

    /// Refresh token used for Calendar; usually the same grant as Gmail
    #[serde(default, skip_serializing)]
    pub calendar_refresh_token: Option<SecretString>,

    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_gmail_base_url")]
    pub gmail_base_url: String,

    #[serde(default = "default_calendar_base_url")]
    pub calendar_base_url: String,

    /// Calendar to read (default: primary)
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,

    /// How far ahead to list events, in days (default: 7)
    #[serde(default = "default_calendar_window_days")]
    pub calendar_window_days: u32,

    /// Request timeout in seconds (default: 10)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_auth_url() -> String {
    "https://accounts.google.com/o/oauth2/v2/auth".to_string()
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_gmail_base_url() -> String {
    "https://gmail.googleapis.com/gmail/v1".to_string()
}

fn default_calendar_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

const fn default_calendar_window_days() -> u32 {
    7
}

const fn default_timeout_secs() -> u64 {
    10
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            client_secret: None,
            gmail_refresh_token: None,
            calendar_refresh_token: None,
            auth_url: default_auth_url(),
            token_url: default_token_url(),
            gmail_base_url: default_gmail_base_url(),
            calendar_base_url: default_calendar_base_url(),
            calendar_id: default_calendar_id(),
            calendar_window_days: default_calendar_window_days(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn present(value: Option<&SecretString>) -> bool {
    value.is_some_and(|v| !v.expose_secret().trim().is_empty())
}

impl GoogleConfig {
    /// Client ID and secret are both set
    #[must_use]
    pub fn has_client(&self) -> bool {
        self.client_id.as_deref().is_some_and(|id| !id.trim().is_empty())
            && present(self.client_secret.as_ref())
    }

    /// Gmail needs the client pair plus its refresh token
    #[must_use]
    pub fn gmail_configured(&self) -> bool {
        self.has_client() && present(self.gmail_refresh_token.as_ref())
    }

    /// Calendar is considered configured once its refresh token is present
    #[must_use]
    pub fn calendar_configured(&self) -> bool {
        present(self.calendar_refresh_token.as_ref())
    }
}
