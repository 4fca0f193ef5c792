//! News port - top headlines

use async_trait::async_trait;
use domain::NewsArticleRecord;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NewsPort: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn fetch_top_stories(&self) -> Result<Vec<NewsArticleRecord>, ApplicationError>;
}
