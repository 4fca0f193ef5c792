//! Google token-file fallback
//!
//! The OAuth bootstrap writes the refresh token and client pair to disk.
//! When the environment leaves any of them out, the first readable token
//! file fills the gaps without overriding values that are already set.

use std::path::{Path, PathBuf};

use integration_google::{GoogleConfig, TokenFile};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

/// Token files checked in order, relative to the working directory
pub const TOKEN_FILE_CANDIDATES: [&str; 2] = ["setup/google_credentials/tokens.json", "token.json"];

fn is_blank(value: Option<&SecretString>) -> bool {
    value.is_none_or(|v| v.expose_secret().trim().is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Whether any of client id, client secret or Gmail refresh token is missing
pub fn google_credentials_missing(google: &GoogleConfig) -> bool {
    !google.has_client() || is_blank(google.gmail_refresh_token.as_ref())
}

/// Fill missing Google credentials from the first readable token file under `root`
///
/// Returns the file that was used, if any.
pub fn apply_google_token_files(google: &mut GoogleConfig, root: &Path) -> Option<PathBuf> {
    if !google_credentials_missing(google) {
        return None;
    }

    for candidate in TOKEN_FILE_CANDIDATES {
        let path = root.join(candidate);
        if !path.exists() {
            continue;
        }

        match TokenFile::read(&path) {
            Ok(tokens) => {
                merge_token_file(google, tokens);
                info!(path = %path.display(), "Loaded Google tokens from file");
                return Some(path);
            },
            Err(e) => warn!(path = %path.display(), error = %e, "Failed to load Google tokens"),
        }
    }

    None
}

fn merge_token_file(google: &mut GoogleConfig, tokens: TokenFile) {
    if google.client_id.as_deref().is_none_or(|id| id.trim().is_empty()) {
        google.client_id = non_empty(tokens.client_id);
    }
    if is_blank(google.client_secret.as_ref()) {
        google.client_secret = non_empty(tokens.client_secret).map(SecretString::from);
    }

    let refresh = non_empty(tokens.refresh_token);
    if is_blank(google.gmail_refresh_token.as_ref()) {
        google.gmail_refresh_token = refresh.clone().map(SecretString::from);
    }
    if is_blank(google.calendar_refresh_token.as_ref()) {
        google.calendar_refresh_token = refresh.map(SecretString::from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tokens(root: &Path, relative: &str, json: &str) {
        let path = root.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, json).unwrap();
    }

    const TOKENS: &str = r#"{
        "refresh_token": "file-refresh",
        "client_id": "file-client.apps.googleusercontent.com",
        "client_secret": "file-secret",
        "token_uri": "https://oauth2.googleapis.com/token",
        "scopes": []
    }"#;

    #[test]
    fn fills_every_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        write_tokens(dir.path(), "setup/google_credentials/tokens.json", TOKENS);

        let mut google = GoogleConfig::default();
        let used = apply_google_token_files(&mut google, dir.path());

        assert!(used.unwrap().ends_with("tokens.json"));
        assert_eq!(
            google.client_id.as_deref(),
            Some("file-client.apps.googleusercontent.com")
        );
        assert_eq!(google.client_secret.unwrap().expose_secret(), "file-secret");
        assert_eq!(google.gmail_refresh_token.unwrap().expose_secret(), "file-refresh");
        assert_eq!(google.calendar_refresh_token.unwrap().expose_secret(), "file-refresh");
    }

    #[test]
    fn keeps_values_already_set() {
        let dir = tempfile::tempdir().unwrap();
        write_tokens(dir.path(), "token.json", TOKENS);

        let mut google = GoogleConfig {
            client_id: Some("env-client".to_string()),
            calendar_refresh_token: Some(SecretString::from("env-calendar")),
            ..Default::default()
        };
        apply_google_token_files(&mut google, dir.path());

        assert_eq!(google.client_id.as_deref(), Some("env-client"));
        assert_eq!(google.client_secret.unwrap().expose_secret(), "file-secret");
        assert_eq!(google.gmail_refresh_token.unwrap().expose_secret(), "file-refresh");
        assert_eq!(google.calendar_refresh_token.unwrap().expose_secret(), "env-calendar");
    }

    #[test]
    fn skipped_when_complete() {
        let dir = tempfile::tempdir().unwrap();
        write_tokens(dir.path(), "token.json", TOKENS);

        let mut google = GoogleConfig {
            client_id: Some("env-client".to_string()),
            client_secret: Some(SecretString::from("env-secret")),
            gmail_refresh_token: Some(SecretString::from("env-refresh")),
            ..Default::default()
        };
        assert!(apply_google_token_files(&mut google, dir.path()).is_none());
        assert!(google.calendar_refresh_token.is_none());
    }

    #[test]
    fn unreadable_file_falls_through_to_next() {
        let dir = tempfile::tempdir().unwrap();
        write_tokens(dir.path(), "setup/google_credentials/tokens.json", "{not json");
        write_tokens(dir.path(), "token.json", TOKENS);

        let mut google = GoogleConfig::default();
        let used = apply_google_token_files(&mut google, dir.path()).unwrap();

        assert_eq!(used, dir.path().join("token.json"));
        assert!(google.gmail_configured());
    }

    #[test]
    fn no_files_leaves_config_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let mut google = GoogleConfig::default();

        assert!(apply_google_token_files(&mut google, dir.path()).is_none());
        assert!(google.client_id.is_none());
    }
}
