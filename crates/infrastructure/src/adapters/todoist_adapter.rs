//! Todo adapter - Implements TodoPort using Todoist

use std::sync::Arc;

use application::{ApplicationError, TodoPort};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use domain::TodoRecord;
use integration_todoist::{TodoistClient, TodoistConfig, TodoistError, TodoistHttpClient, TodoistTask};
use tracing::{debug, instrument};

pub struct TodoistAdapter {
    client: Arc<dyn TodoistClient>,
}

impl std::fmt::Debug for TodoistAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoistAdapter")
            .field("configured", &self.client.is_configured())
            .finish()
    }
}

impl TodoistAdapter {
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn with_config(config: TodoistConfig) -> Result<Self, ApplicationError> {
        let client =
            TodoistHttpClient::new(config).map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::from_client(Arc::new(client)))
    }

    #[must_use]
    pub fn from_client(client: Arc<dyn TodoistClient>) -> Self {
        Self { client }
    }

    fn map_error(err: TodoistError) -> ApplicationError {
        match err {
            TodoistError::NotConfigured => ApplicationError::NotConfigured("Todoist API token missing".into()),
            TodoistError::RateLimitExceeded => ApplicationError::RateLimited,
            other @ (TodoistError::ConnectionFailed(_)
            | TodoistError::RequestFailed(_)
            | TodoistError::ParseError(_)
            | TodoistError::Unauthorized
            | TodoistError::ServiceUnavailable(_)) => ApplicationError::ExternalService(other.to_string()),
        }
    }

    fn map_task(task: TodoistTask, today: NaiveDate) -> TodoRecord {
        let due = task.due_text();
        let is_overdue = task.is_overdue(today);
        TodoRecord {
            id: task.id,
            content: task.content,
            description: task.description,
            priority: task.priority,
            project_id: task.project_id,
            labels: task.labels,
            due,
            is_overdue,
        }
    }
}

#[async_trait]
impl TodoPort for TodoistAdapter {
    fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    #[instrument(skip(self))]
    async fn fetch_todos(&self) -> Result<Vec<TodoRecord>, ApplicationError> {
        let tasks = self.client.active_tasks().await.map_err(Self::map_error)?;

        let today = Utc::now().date_naive();
        let todos: Vec<_> = tasks
            .into_iter()
            .map(|task| Self::map_task(task, today))
            .collect();

        debug!(
            count = todos.len(),
            overdue = todos.iter().filter(|t| t.is_overdue).count(),
            "Fetched todos"
        );
        Ok(todos)
    }
}
