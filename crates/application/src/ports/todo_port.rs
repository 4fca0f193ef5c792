//! Todo port - active tasks

use async_trait::async_trait;
use domain::TodoRecord;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading the user's open tasks
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TodoPort: Send + Sync {
    fn is_configured(&self) -> bool;

    async fn fetch_todos(&self) -> Result<Vec<TodoRecord>, ApplicationError>;
}
