//! News adapter - Implements NewsPort using NewsAPI top headlines

use std::sync::Arc;

use application::{ApplicationError, NewsPort};
use async_trait::async_trait;
use domain::NewsArticleRecord;
use integration_news::{Headline, NewsApiClient, NewsClient, NewsConfig, NewsError};
use tracing::{debug, instrument};

pub struct NewsAdapter {
    client: Arc<dyn NewsClient>,
    page_size: u32,
}

impl std::fmt::Debug for NewsAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewsAdapter")
            .field("configured", &self.client.is_configured())
            .field("page_size", &self.page_size)
            .finish()
    }
}

impl NewsAdapter {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: NewsConfig, page_size: u32) -> Result<Self, ApplicationError> {
        let client = NewsApiClient::new(config).map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::from_client(Arc::new(client), page_size))
    }

    #[must_use]
    pub fn from_client(client: Arc<dyn NewsClient>, page_size: u32) -> Self {
        Self { client, page_size }
    }

    fn map_error(err: NewsError) -> ApplicationError {
        match err {
            NewsError::NotConfigured => ApplicationError::NotConfigured("news API key missing".into()),
            NewsError::RateLimitExceeded => ApplicationError::RateLimited,
            other @ (NewsError::ConnectionFailed(_)
            | NewsError::RequestFailed(_)
            | NewsError::ParseError(_)
            | NewsError::Unauthorized(_)
            | NewsError::ServiceUnavailable(_)) => ApplicationError::ExternalService(other.to_string()),
        }
    }

    fn map_headline(headline: Headline) -> NewsArticleRecord {
        NewsArticleRecord {
            title: headline.title,
            source: headline.source_name,
            description: headline.description,
            url: headline.url,
            published_at: headline.published_at,
        }
    }
}

#[async_trait]
impl NewsPort for NewsAdapter {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[instrument(skip(self), fields(page_size = self.page_size))]
    async fn fetch_top_stories(&self) -> Result<Vec<NewsArticleRecord>, ApplicationError> {
        let headlines = self
            .client
            .top_headlines(self.page_size)
            .await
            .map_err(Self::map_error)?;

        debug!(count = headlines.len(), "Fetched headlines");
        Ok(headlines.into_iter().map(Self::map_headline).collect())
    }
}
