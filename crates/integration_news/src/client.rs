//! NewsAPI HTTP client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::NewsConfig;
use crate::error::NewsError;
use crate::models::{Headline, RawErrorBody, RawTopHeadlines};

/// Trait for headline sources
#[async_trait]
pub trait NewsClient: Send + Sync {
    /// Fetch at most `page_size` top headlines
    async fn top_headlines(&self, page_size: u32) -> Result<Vec<Headline>, NewsError>;

    fn is_configured(&self) -> bool;
}

/// NewsAPI client
#[derive(Debug)]
pub struct NewsApiClient {
    client: Client,
    config: NewsConfig,
}

impl NewsApiClient {
    /// Create a new NewsAPI client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: NewsConfig) -> Result<Self, NewsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NewsError::ConnectionFailed(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl NewsClient for NewsApiClient {
    #[instrument(skip(self), fields(country = %self.config.country))]
    async fn top_headlines(&self, page_size: u32) -> Result<Vec<Headline>, NewsError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .filter(|_| self.config.has_api_key())
            .ok_or(NewsError::NotConfigured)?;

        let url = format!(
            "{}/top-headlines",
            self.config.base_url.trim_end_matches('/')
        );
        let page_size = page_size.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", api_key.expose_secret()),
                ("country", self.config.country.as_str()),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NewsError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response
                .json::<RawErrorBody>()
                .await
                .map_or_else(|_| format!("HTTP {status}"), |body| body.describe());

            return Err(match status {
                StatusCode::UNAUTHORIZED => NewsError::Unauthorized(detail),
                StatusCode::TOO_MANY_REQUESTS => NewsError::RateLimitExceeded,
                s if s.is_server_error() => NewsError::ServiceUnavailable(format!("HTTP {s}")),
                _ => NewsError::RequestFailed(detail),
            });
        }

        let body: RawTopHeadlines = response
            .json()
            .await
            .map_err(|e| NewsError::ParseError(e.to_string()))?;

        let headlines: Vec<Headline> = body.articles.into_iter().map(Headline::from).collect();
        debug!(count = headlines.len(), "Fetched headlines");
        Ok(headlines)
    }

    fn is_configured(&self) -> bool {
        self.config.has_api_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_is_configured_follows_key() {
        let client = NewsApiClient::new(NewsConfig::default()).unwrap();
        assert!(!client.is_configured());

        let client = NewsApiClient::new(NewsConfig {
            api_key: Some(SecretString::from("k")),
            ..Default::default()
        })
        .unwrap();
        assert!(client.is_configured());
    }

    #[test]
    fn test_debug_does_not_leak_key() {
        let client = NewsApiClient::new(NewsConfig {
            api_key: Some(SecretString::from("super-secret-news-key")),
            ..Default::default()
        })
        .unwrap();
        assert!(!format!("{client:?}").contains("super-secret-news-key"));
    }
}
