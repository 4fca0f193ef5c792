//! Daily digest CLI
//!
//! Command-line interface for checking a deployment and bootstrapping
//! Google credentials.

#![allow(clippy::print_stdout)]

use std::path::Path;

use clap::Parser;
use infrastructure::AppConfig;
use integration_google::OAuthClient;
use presentation_cli::{
    Cli, Commands, DigestClient,
    cli::log_filter_from_verbosity,
    digest_client::{render_digest, render_status},
    google_auth::{self, AuthError, CONSENT_TIMEOUT, LoopbackListener, SETUP_STEPS},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(cli.verbose)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Status { url } => {
            let health = DigestClient::new(&url)?.status().await?;
            print!("{}", render_status(&health));
        },

        Commands::Digest {
            sources,
            location,
            raw,
            url,
        } => {
            let request = sources.to_request(location);
            println!("Requesting digest for: {:?}", request.enabled_sources());
            let digest = DigestClient::new(&url)?.digest(&request).await?;
            print_digest(&digest, raw)?;
        },

        Commands::Quick { raw, url } => {
            println!("Requesting quick digest...");
            let digest = DigestClient::new(&url)?.quick().await?;
            print_digest(&digest, raw)?;
        },

        Commands::Config => {
            let _ = dotenvy::dotenv();
            let config = AppConfig::load()?;
            print!("{}", config.to_toml()?);
        },

        Commands::GoogleAuth { root, append_env } => {
            if let Err(e) = google_auth_flow(&root, append_env).await {
                if matches!(e, AuthError::NoClientSecrets(_)) {
                    println!("{e}\n\nSteps to get credentials:\n{SETUP_STEPS}");
                } else if e.to_string().contains("redirect_uri_mismatch") {
                    println!("Make sure the OAuth client type is 'Desktop app', not 'Web application'.");
                }
                return Err(e.into());
            }
        },
    }

    Ok(())
}

fn print_digest(digest: &serde_json::Value, raw: bool) -> anyhow::Result<()> {
    if raw {
        println!("{}", serde_json::to_string_pretty(digest)?);
    } else {
        print!("{}", render_digest(digest));
    }
    Ok(())
}

async fn google_auth_flow(root: &Path, append_env: bool) -> Result<(), AuthError> {
    let (secrets_path, secrets) = google_auth::load_client_secrets(root)?;
    println!("Found credentials at: {}", secrets_path.display());

    let oauth = OAuthClient::new(&google_auth::google_config(&secrets))?;
    let listener = LoopbackListener::bind().await?;
    let redirect_uri = listener.redirect_uri().to_string();
    let state = Uuid::new_v4().to_string();

    let consent_url = oauth.authorization_url(&redirect_uri, &state)?;
    println!("\nOpen this URL in a browser, sign in and grant read access to Gmail and Calendar:\n");
    println!("{consent_url}\n");
    println!("Waiting for the redirect on {redirect_uri} ...");

    let code = listener.wait_for_code(&state, CONSENT_TIMEOUT).await?;
    let tokens = google_auth::exchange(&oauth, &secrets, &code, &redirect_uri).await?;

    let lines = google_auth::env_lines(&tokens);
    println!("\nAuthorization complete. Add these to your .env file:\n");
    for line in &lines {
        println!("{line}");
    }

    for path in google_auth::write_token_files(root, &tokens)? {
        println!("Credentials saved to: {}", path.display());
    }
    println!("Keep these files private and out of version control.");

    if append_env {
        let env_path = root.join(".env");
        if google_auth::append_env(&env_path, &lines)? {
            println!("Credentials appended to {}", env_path.display());
        } else {
            println!("No .env file at {}; create one with the lines above.", env_path.display());
        }
    }

    Ok(())
}
