//! Google OAuth bootstrap
//!
//! Installed-app consent flow for the Gmail and Calendar read scopes. The
//! consent page redirects to a listener on `127.0.0.1` with a random port;
//! the code it carries is exchanged for a refresh token, which is written to
//! the token files the server falls back to and printed as `.env` lines.

use std::{
    fs::OpenOptions,
    io::Write as _,
    path::{Path, PathBuf},
    time::Duration,
};

use axum::{
    Router,
    extract::Query,
    response::Html,
    routing::get,
};
use infrastructure::config::TOKEN_FILE_CANDIDATES;
use integration_google::{ClientSecrets, GOOGLE_SCOPES, GoogleConfig, GoogleError, OAuthClient, TokenFile};
use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tokio::{
    net::TcpListener,
    sync::{mpsc, oneshot},
};
use tracing::{debug, info};

/// Token endpoint recorded when the client secret file does not name one
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// How long to wait for the user to finish the consent page
pub const CONSENT_TIMEOUT: Duration = Duration::from_secs(300);

const SUCCESS_PAGE: &str =
    "<html><body><h3>Authorization successful! You can close this window.</h3></body></html>";
const FAILURE_PAGE: &str =
    "<html><body><h3>Authorization failed. Check the terminal for details.</h3></body></html>";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No Google OAuth client secret file found under {0}")]
    NoClientSecrets(PathBuf),

    #[error(transparent)]
    Google(#[from] GoogleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authorization failed: {0}")]
    Callback(String),

    #[error("Redirect state did not match; ignoring a stale or forged callback")]
    StateMismatch,

    #[error("Google returned no refresh token; revoke the app's access and retry")]
    MissingRefreshToken,
}

/// Console steps printed when no client secret file exists
pub const SETUP_STEPS: &str = "\
1. Go to https://console.cloud.google.com/
2. Select your project (or create one)
3. Enable the Gmail API and the Google Calendar API
4. Go to 'APIs & Services' > 'Credentials'
5. Create an 'OAuth 2.0 Client ID' of type 'Desktop app'
6. Download the JSON file into setup/google_credentials/ (keep its name)";

/// Locate and parse the client secret file under `root`
pub fn load_client_secrets(root: &Path) -> Result<(PathBuf, ClientSecrets), AuthError> {
    let path = ClientSecrets::discover(root)
        .ok_or_else(|| AuthError::NoClientSecrets(root.join("setup").join("google_credentials")))?;
    let secrets = ClientSecrets::from_file(&path)?;
    debug!(path = %path.display(), client_id = %secrets.client_id, "Client secrets loaded");
    Ok((path, secrets))
}

/// OAuth settings for a downloaded client
#[must_use]
pub fn google_config(secrets: &ClientSecrets) -> GoogleConfig {
    let mut config = GoogleConfig {
        client_id: Some(secrets.client_id.clone()),
        client_secret: Some(secrets.client_secret.clone()),
        ..GoogleConfig::default()
    };
    if let Some(auth_uri) = &secrets.auth_uri {
        config.auth_url.clone_from(auth_uri);
    }
    if let Some(token_uri) = &secrets.token_uri {
        config.token_url.clone_from(token_uri);
    }
    config
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

impl CallbackParams {
    fn into_code(self, expected_state: &str) -> Result<String, AuthError> {
        if let Some(error) = self.error {
            return Err(AuthError::Callback(error));
        }
        if self.state.as_deref() != Some(expected_state) {
            return Err(AuthError::StateMismatch);
        }
        self.code
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuthError::Callback("redirect carried no code".to_string()))
    }
}

/// Listener receiving the consent redirect
#[derive(Debug)]
pub struct LoopbackListener {
    listener: TcpListener,
    redirect_uri: String,
}

impl LoopbackListener {
    /// Bind `127.0.0.1` on a port chosen by the OS
    pub async fn bind() -> Result<Self, AuthError> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();
        Ok(Self {
            listener,
            redirect_uri: format!("http://127.0.0.1:{port}/"),
        })
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Serve until one redirect arrives and return its authorization code
    pub async fn wait_for_code(self, expected_state: &str, limit: Duration) -> Result<String, AuthError> {
        let (code_tx, mut code_rx) = mpsc::channel::<Result<String, AuthError>>(1);
        let expected = expected_state.to_string();

        let app = Router::new().route(
            "/",
            get(move |Query(params): Query<CallbackParams>| {
                let code_tx = code_tx.clone();
                let expected = expected.clone();
                async move {
                    let outcome = params.into_code(&expected);
                    let page = if outcome.is_ok() { SUCCESS_PAGE } else { FAILURE_PAGE };
                    // Only the first redirect counts; later ones find the channel full or closed
                    let _ = code_tx.try_send(outcome);
                    Html(page)
                }
            }),
        );

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(self.listener, app)
                .with_graceful_shutdown(async {
                    let _ = stop_rx.await;
                })
                .await
        });

        let outcome = tokio::time::timeout(limit, code_rx.recv()).await;
        let _ = stop_tx.send(());
        let _ = server.await;

        match outcome {
            Ok(Some(result)) => result,
            Ok(None) => Err(AuthError::Callback("callback listener stopped".to_string())),
            Err(_) => Err(AuthError::Callback(format!(
                "no redirect received within {}s",
                limit.as_secs()
            ))),
        }
    }
}

/// Exchange the code and build the token file contents
pub async fn exchange(
    oauth: &OAuthClient,
    secrets: &ClientSecrets,
    code: &str,
    redirect_uri: &str,
) -> Result<TokenFile, AuthError> {
    let grant = oauth.exchange_code(code, redirect_uri).await?;
    let refresh_token = grant.refresh_token.ok_or(AuthError::MissingRefreshToken)?;
    info!(scope = ?grant.scope, "Authorization code exchanged");

    Ok(TokenFile {
        refresh_token: Some(refresh_token.expose_secret().to_string()),
        client_id: Some(secrets.client_id.clone()),
        client_secret: Some(secrets.client_secret.expose_secret().to_string()),
        token_uri: Some(
            secrets
                .token_uri
                .clone()
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
        ),
        scopes: GOOGLE_SCOPES.iter().map(ToString::to_string).collect(),
    })
}

/// Write the token file to every location the server reads from
pub fn write_token_files(root: &Path, tokens: &TokenFile) -> Result<Vec<PathBuf>, AuthError> {
    TOKEN_FILE_CANDIDATES
        .iter()
        .map(|relative| {
            let path = root.join(relative);
            tokens.write(&path)?;
            Ok(path)
        })
        .collect()
}

/// `.env` lines for the obtained credentials
#[must_use]
pub fn env_lines(tokens: &TokenFile) -> Vec<String> {
    let value = |v: &Option<String>| v.clone().unwrap_or_default();
    vec![
        format!("GMAIL_CLIENT_ID={}", value(&tokens.client_id)),
        format!("GMAIL_CLIENT_SECRET={}", value(&tokens.client_secret)),
        format!("GMAIL_REFRESH_TOKEN={}", value(&tokens.refresh_token)),
        format!("GOOGLE_CALENDAR_CREDENTIALS={}", value(&tokens.refresh_token)),
    ]
}

/// Append the lines to an existing `.env`; returns false when there is none
pub fn append_env(path: &Path, lines: &[String]) -> Result<bool, AuthError> {
    if !path.is_file() {
        return Ok(false);
    }

    let mut file = OpenOptions::new().append(true).open(path)?;
    writeln!(file, "\n# Google API Credentials")?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(true)
}
