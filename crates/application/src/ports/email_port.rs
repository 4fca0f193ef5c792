//! Email port - unread inbox messages

use async_trait::async_trait;
use domain::EmailRecord;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading the user's unread mail
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmailPort: Send + Sync {
    /// Whether credentials for the mailbox are present
    fn is_configured(&self) -> bool;

    /// Fetch unread inbox messages, newest first
    async fn fetch_unread(&self) -> Result<Vec<EmailRecord>, ApplicationError>;
}
