//! OAuth 2.0 for Google APIs
//!
//! Covers the parts of the installed-app flow this crate needs: building the
//! consent URL, exchanging the authorization code, refreshing access tokens,
//! and reading or writing the credential files kept on disk.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::config::GoogleConfig;
use crate::error::GoogleError;

/// Read-only Gmail and Calendar scopes
pub const GOOGLE_SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/gmail.readonly",
    "https://www.googleapis.com/auth/calendar.readonly",
];

/// Refresh this long before the reported expiry
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Fallback lifetime when the token endpoint omits `expires_in`
const DEFAULT_LIFETIME_SECS: u64 = 3600;

/// Successful token endpoint response
#[derive(Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: SecretString,
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Only present on code exchange with `access_type=offline`
    #[serde(default)]
    pub refresh_token: Option<SecretString>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("scope", &self.scope)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct TokenErrorBody {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// Client for Google's OAuth endpoints
#[derive(Debug)]
pub struct OAuthClient {
    client: Client,
    config: GoogleConfig,
}

impl OAuthClient {
    /// Create a new OAuth client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &GoogleConfig) -> Result<Self, GoogleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GoogleError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn client_credentials(&self) -> Result<(&str, &SecretString), GoogleError> {
        let id = self
            .config
            .client_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| GoogleError::NotConfigured("client_id".to_string()))?;
        let secret = self
            .config
            .client_secret
            .as_ref()
            .filter(|s| !s.expose_secret().trim().is_empty())
            .ok_or_else(|| GoogleError::NotConfigured("client_secret".to_string()))?;
        Ok((id, secret))
    }

    /// Consent page URL requesting offline access to [`GOOGLE_SCOPES`]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str) -> Result<Url, GoogleError> {
        let (client_id, _) = self.client_credentials()?;
        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| GoogleError::RequestFailed(format!("invalid auth_url: {e}")))?;

        url.query_pairs_mut()
            .append_pair("client_id", client_id)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &GOOGLE_SCOPES.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent")
            .append_pair("state", state);

        Ok(url)
    }

    /// Exchange an authorization code for tokens
    #[instrument(skip(self, code))]
    pub async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<TokenGrant, GoogleError> {
        let (client_id, client_secret) = self.client_credentials()?;
        self.token_request(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
        ])
        .await
    }

    /// Trade a refresh token for a fresh access token
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &SecretString) -> Result<TokenGrant, GoogleError> {
        let (client_id, client_secret) = self.client_credentials()?;
        self.token_request(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token.expose_secret()),
            ("client_id", client_id),
            ("client_secret", client_secret.expose_secret()),
        ])
        .await
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenGrant, GoogleError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| GoogleError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if status.is_server_error() {
            return Err(GoogleError::ServiceUnavailable(format!("HTTP {status}")));
        }
        if !status.is_success() {
            let detail = response.json::<TokenErrorBody>().await.map_or_else(
                |_| format!("HTTP {status}"),
                |body| match body.error_description {
                    Some(description) => format!("{}: {description}", body.error),
                    None => body.error,
                },
            );
            return Err(GoogleError::TokenRejected(detail));
        }

        let grant: TokenGrant = response
            .json()
            .await
            .map_err(|e| GoogleError::ParseError(e.to_string()))?;
        debug!(expires_in = ?grant.expires_in, "Token endpoint granted access token");
        Ok(grant)
    }
}

struct CachedToken {
    token: SecretString,
    expires_at: Instant,
}

/// Access tokens for one refresh token, refreshed on demand
pub struct AccessTokenSource {
    oauth: Arc<OAuthClient>,
    refresh_token: Option<SecretString>,
    cached: Mutex<Option<CachedToken>>,
}

impl fmt::Debug for AccessTokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenSource")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("cached", &self.cached.lock().is_some())
            .finish_non_exhaustive()
    }
}

impl AccessTokenSource {
    #[must_use]
    pub fn new(oauth: Arc<OAuthClient>, refresh_token: Option<SecretString>) -> Self {
        Self {
            oauth,
            refresh_token,
            cached: Mutex::new(None),
        }
    }

    /// A valid access token, refreshing when the cached one is near expiry
    pub async fn access_token(&self) -> Result<SecretString, GoogleError> {
        let fresh = self
            .cached
            .lock()
            .as_ref()
            .filter(|cached| Instant::now() + EXPIRY_MARGIN < cached.expires_at)
            .map(|cached| cached.token.clone());
        if let Some(token) = fresh {
            return Ok(token);
        }

        let refresh_token = self
            .refresh_token
            .as_ref()
            .filter(|t| !t.expose_secret().trim().is_empty())
            .ok_or_else(|| GoogleError::NotConfigured("refresh_token".to_string()))?;

        let grant = self.oauth.refresh(refresh_token).await?;
        let lifetime = Duration::from_secs(grant.expires_in.unwrap_or(DEFAULT_LIFETIME_SECS));

        *self.cached.lock() = Some(CachedToken {
            token: grant.access_token.clone(),
            expires_at: Instant::now() + lifetime,
        });
        Ok(grant.access_token)
    }

    /// Drop the cached token so the next call refreshes
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }
}

/// OAuth client as downloaded from the Google Cloud console
#[derive(Clone, Deserialize)]
pub struct ClientSecrets {
    pub client_id: String,
    pub client_secret: SecretString,
    #[serde(default)]
    pub auth_uri: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl fmt::Debug for ClientSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSecrets")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ClientSecretsFile {
    #[serde(default)]
    installed: Option<ClientSecrets>,
    #[serde(default)]
    web: Option<ClientSecrets>,
}

impl ClientSecrets {
    /// Parse a console download (`{"installed": {...}}` or `{"web": {...}}`)
    pub fn from_json(raw: &str) -> Result<Self, GoogleError> {
        let file: ClientSecretsFile =
            serde_json::from_str(raw).map_err(|e| GoogleError::CredentialsFile(e.to_string()))?;
        file.installed.or(file.web).ok_or_else(|| {
            GoogleError::CredentialsFile("expected an \"installed\" or \"web\" client".to_string())
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, GoogleError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GoogleError::CredentialsFile(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    /// Locate a client secret file under `root`
    ///
    /// Checks `setup/google_credentials/client_secret_*.json` first, then
    /// `setup/google_credentials/credentials.json` and `credentials.json`.
    #[must_use]
    pub fn discover(root: &Path) -> Option<PathBuf> {
        let credentials_dir = root.join("setup").join("google_credentials");

        let mut downloads: Vec<PathBuf> = std::fs::read_dir(&credentials_dir)
            .into_iter()
            .flatten()
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with("client_secret_") && name.ends_with(".json"))
            })
            .collect();
        downloads.sort();

        downloads.into_iter().next().or_else(|| {
            [credentials_dir.join("credentials.json"), root.join("credentials.json")]
                .into_iter()
                .find(|path| path.is_file())
        })
    }
}

/// Token file written after consent and read back as a credential fallback
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TokenFile {
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl fmt::Debug for TokenFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenFile")
            .field("client_id", &self.client_id)
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("has_client_secret", &self.client_secret.is_some())
            .field("scopes", &self.scopes)
            .finish_non_exhaustive()
    }
}

impl TokenFile {
    pub fn read(path: &Path) -> Result<Self, GoogleError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GoogleError::CredentialsFile(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&raw)
            .map_err(|e| GoogleError::CredentialsFile(format!("{}: {e}", path.display())))
    }

    /// Write as pretty JSON, creating parent directories
    pub fn write(&self, path: &Path) -> Result<(), GoogleError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| GoogleError::CredentialsFile(format!("{}: {e}", parent.display())))?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| GoogleError::CredentialsFile(e.to_string()))?;
        std::fs::write(path, json)
            .map_err(|e| GoogleError::CredentialsFile(format!("{}: {e}", path.display())))
    }
}
