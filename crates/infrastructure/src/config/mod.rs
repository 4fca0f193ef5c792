//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `digest`: default location, fetch limits, timeouts and commute routes
//! - `google_tokens`: fallback to the token files written by the OAuth bootstrap
//!
//! Source client settings reuse each integration crate's own config type.
//!
//! Values are layered: built-in defaults, then an optional `config.toml`,
//! then `DIGEST__SECTION__KEY` environment variables, then the flat legacy
//! variables (`ANTHROPIC_API_KEY`, `NEWS_API_KEY`, `DEFAULT_LOCATION`, ...).

mod digest;
mod google_tokens;
mod server;

use std::path::{Path, PathBuf};

use ai_core::InferenceConfig;
use integration_google::GoogleConfig;
use integration_news::NewsConfig;
use integration_todoist::TodoistConfig;
use integration_traffic::TrafficConfig;
use integration_weather::WeatherConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use digest::{CommuteRoute, DigestAppConfig, UNNAMED_ROUTE};
pub use google_tokens::{TOKEN_FILE_CANDIDATES, apply_google_token_files, google_credentials_missing};
pub use server::ServerConfig;

use crate::telemetry::TelemetryConfig;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Anthropic Messages API settings
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Gmail and Google Calendar
    #[serde(default)]
    pub google: GoogleConfig,

    #[serde(default)]
    pub news: NewsConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub traffic: TrafficConfig,

    #[serde(default)]
    pub todoist: TodoistConfig,

    #[serde(default)]
    pub digest: DigestAppConfig,

    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Token file the Google credentials were completed from
    #[serde(skip)]
    pub google_token_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from the working directory and the process environment
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from(Path::new("."), |key| std::env::var(key).ok())
    }

    /// Load configuration rooted at `root`, reading legacy variables through `lookup`
    ///
    /// `root` is where `config.toml` and the Google token files are looked up.
    pub fn load_from<F>(root: &Path, lookup: F) -> Result<Self, config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config_name = root.join("config");
        let builder = config::Config::builder()
            .add_source(config::File::with_name(&config_name.to_string_lossy()).required(false))
            // e.g. DIGEST__SERVER__PORT=9000
            .add_source(
                config::Environment::with_prefix("DIGEST")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .try_parsing(true),
            );

        let mut app: Self = builder.build()?.try_deserialize()?;
        app.apply_env_overrides(lookup)?;
        app.google_token_file = apply_google_token_files(&mut app.google, root);
        app.fill_calendar_token();

        Ok(app)
    }

    /// Overlay the flat variable names used by existing `.env` files
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), config::ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let secret = |key: &str| get(key).map(SecretString::from);

        if let Some(key) = secret("ANTHROPIC_API_KEY") {
            self.inference.api_key = Some(key);
        }
        if let Some(id) = get("GMAIL_CLIENT_ID") {
            self.google.client_id = Some(id);
        }
        if let Some(client_secret) = secret("GMAIL_CLIENT_SECRET") {
            self.google.client_secret = Some(client_secret);
        }
        if let Some(token) = secret("GMAIL_REFRESH_TOKEN") {
            self.google.gmail_refresh_token = Some(token);
        }
        if let Some(token) = secret("GOOGLE_CALENDAR_CREDENTIALS") {
            self.google.calendar_refresh_token = Some(token);
        }
        if let Some(key) = secret("NEWS_API_KEY") {
            self.news.api_key = Some(key);
        }
        if let Some(key) = secret("WEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        // The generic Google key only fills in when no Routes key is set
        if let Some(key) = secret("TRAFFIC_API_KEY") {
            self.traffic.api_key = Some(key);
        } else if let Some(key) = secret("GOOGLE_API_KEY").filter(|_| !self.traffic.has_api_key()) {
            self.traffic.api_key = Some(key);
        }
        if let Some(key) = secret("TODOIST_API_KEY") {
            self.todoist.api_key = Some(key);
        }
        if let Some(location) = get("DEFAULT_LOCATION") {
            self.digest.default_location = location;
        }
        if let Some(raw) = get("MAX_EMAILS_TO_FETCH") {
            self.digest.max_emails = parse_number("MAX_EMAILS_TO_FETCH", &raw)?;
        }
        if let Some(raw) = get("MAX_NEWS_ARTICLES") {
            self.digest.max_news = parse_number("MAX_NEWS_ARTICLES", &raw)?;
        }
        if let Some(raw) = get("ALLOWED_ORIGINS") {
            self.server.allowed_origins = parse_origins(&raw);
        }
        if let Some(raw) = get("DEBUG") {
            self.server.debug = parse_flag(&raw);
        }

        debug!("Applied legacy environment overrides");
        Ok(())
    }

    /// The calendar shares the Gmail refresh token unless given its own,
    /// whether the Gmail token came from a file or the environment
    fn fill_calendar_token(&mut self) {
        let calendar_missing = self
            .google
            .calendar_refresh_token
            .as_ref()
            .is_none_or(|t| t.expose_secret().trim().is_empty());
        if calendar_missing {
            self.google.calendar_refresh_token = self.google.gmail_refresh_token.clone();
        }
    }

    /// Render as TOML; secrets are never serialized
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn parse_number(key: &str, raw: &str) -> Result<u32, config::ConfigError> {
    raw.parse()
        .map_err(|e| config::ConfigError::Message(format!("{key}: invalid number {raw:?}: {e}")))
}

/// Accepts a JSON array or a comma-separated list
fn parse_origins(raw: &str) -> Vec<String> {
    if raw.starts_with('[') {
        if let Ok(list) = serde_json::from_str::<Vec<String>>(raw) {
            return list;
        }
    }
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(String::from)
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
}
