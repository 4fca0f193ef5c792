//! Service wiring
//!
//! Builds every adapter from [`AppConfig`] once at startup and hands them
//! to the [`DigestService`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use application::{ApplicationError, DigestService, SourcePorts};
use integration_google::ClientSecrets;
use tracing::{info, warn};

use crate::adapters::{
    AnthropicInferenceAdapter, GmailEmailAdapter, GoogleCalendarAdapter, NewsAdapter, TodoistAdapter,
    TrafficAdapter, WeatherAdapter,
};
use crate::config::{AppConfig, google_credentials_missing};

/// Build the digest service from configuration
///
/// Missing credentials are not an error; the affected sources simply report
/// themselves as unconfigured.
pub fn build_digest_service(config: &AppConfig) -> Result<DigestService, ApplicationError> {
    let sources = SourcePorts {
        email: Arc::new(GmailEmailAdapter::with_config(&config.google, config.digest.max_emails)?),
        news: Arc::new(NewsAdapter::with_config(config.news.clone(), config.digest.max_news)?),
        calendar: Arc::new(GoogleCalendarAdapter::with_config(&config.google)?),
        weather: Arc::new(WeatherAdapter::with_config(config.weather.clone())?),
        traffic: Arc::new(TrafficAdapter::with_config(
            &config.traffic,
            config.digest.commute_routes.clone(),
        )?),
        todos: Arc::new(TodoistAdapter::with_config(config.todoist.clone())?),
    };
    let inference = Arc::new(AnthropicInferenceAdapter::new(config.inference.clone())?);

    let service = DigestService::new(sources, inference, config.digest.to_digest_config()?);
    info!(status = ?service.service_status(), "Digest service ready");
    Ok(service)
}

/// Where the Google credentials came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoogleCredentialSource {
    /// Environment or config file supplied everything
    Configured,
    /// Completed from a token file written by `google-auth`
    TokenFile(PathBuf),
    /// Still incomplete; the client secret file for the bootstrap, if found
    Missing { client_secrets: Option<PathBuf> },
}

/// Inspect Google credential state for the startup report
pub fn google_credential_source(config: &AppConfig, root: &Path) -> GoogleCredentialSource {
    if !google_credentials_missing(&config.google) {
        return config
            .google_token_file
            .clone()
            .map_or(GoogleCredentialSource::Configured, GoogleCredentialSource::TokenFile);
    }
    GoogleCredentialSource::Missing {
        client_secrets: ClientSecrets::discover(root),
    }
}

/// Log how Google credentials were resolved and what to do when they are missing
pub fn log_credential_report(config: &AppConfig, root: &Path) {
    match google_credential_source(config, root) {
        GoogleCredentialSource::Configured => info!("Google tokens loaded from environment"),
        GoogleCredentialSource::TokenFile(path) => {
            info!(path = %path.display(), "Google tokens loaded from token file");
        },
        GoogleCredentialSource::Missing {
            client_secrets: Some(path),
        } => warn!(
            client_secrets = %path.display(),
            "Google tokens not found; run `daily-digest-cli google-auth` to authorize Gmail and Calendar"
        ),
        GoogleCredentialSource::Missing { client_secrets: None } => warn!(
            "Google tokens not found and no client secret file present; \
             place client_secret_*.json under setup/google_credentials/ and run `daily-digest-cli google-auth`"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn complete_google(config: &mut AppConfig) {
        config.google.client_id = Some("id".to_string());
        config.google.client_secret = Some(SecretString::from("secret"));
        config.google.gmail_refresh_token = Some(SecretString::from("refresh"));
    }

    #[test]
    fn unconfigured_service_reports_all_false() {
        let service = build_digest_service(&AppConfig::default()).unwrap();
        let status = service.service_status();

        assert!(!status.email);
        assert!(!status.news);
        assert!(!status.calendar);
        assert!(!status.weather);
        assert!(!status.traffic);
        assert!(!status.todos);
        assert!(!status.claude);
    }

    #[test]
    fn configured_keys_show_in_status() {
        let mut config = AppConfig::default();
        config.news.api_key = Some(SecretString::from("news"));
        config.weather.api_key = Some(SecretString::from("owm"));
        config.inference.api_key = Some(SecretString::from("sk-ant"));

        let status = build_digest_service(&config).unwrap().service_status();
        assert!(status.news);
        assert!(status.weather);
        assert!(status.claude);
        assert!(!status.todos);
    }

    #[test]
    fn credential_source_configured() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        complete_google(&mut config);

        assert_eq!(
            google_credential_source(&config, dir.path()),
            GoogleCredentialSource::Configured
        );
    }

    #[test]
    fn credential_source_token_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        complete_google(&mut config);
        config.google_token_file = Some(dir.path().join("token.json"));

        assert!(matches!(
            google_credential_source(&config, dir.path()),
            GoogleCredentialSource::TokenFile(_)
        ));
    }

    #[test]
    fn credential_source_missing_finds_client_secrets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("credentials.json"),
            r#"{"installed":{"client_id":"id","client_secret":"s"}}"#,
        )
        .unwrap();

        let source = google_credential_source(&AppConfig::default(), dir.path());
        assert_eq!(
            source,
            GoogleCredentialSource::Missing {
                client_secrets: Some(dir.path().join("credentials.json"))
            }
        );
    }

    #[test]
    fn credential_source_missing_without_files() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            google_credential_source(&AppConfig::default(), dir.path()),
            GoogleCredentialSource::Missing { client_secrets: None }
        );
    }
}
