//! Todoist task models

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An active Todoist task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoistTask {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub description: String,
    /// 1 (normal) to 4 (urgent)
    #[serde(default = "default_priority")]
    pub priority: u8,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub due: Option<TaskDue>,
}

const fn default_priority() -> u8 {
    1
}

/// Due information attached to a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDue {
    /// `YYYY-MM-DD`, or a local datetime for timed tasks
    pub date: String,
    /// Human-entered phrasing, e.g. `every monday`
    #[serde(default)]
    pub string: Option<String>,
    #[serde(default)]
    pub is_recurring: bool,
}

impl TaskDue {
    /// Calendar day the task is due, ignoring any time component
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        let day = self.date.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

impl TodoistTask {
    /// Due phrasing as the user typed it, falling back to the raw date
    #[must_use]
    pub fn due_text(&self) -> Option<String> {
        self.due
            .as_ref()
            .map(|due| due.string.clone().unwrap_or_else(|| due.date.clone()))
    }

    /// Whether the due day lies strictly before `today`
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due
            .as_ref()
            .and_then(TaskDue::day)
            .is_some_and(|day| day < today)
    }
}

/// Task list payload; older endpoints return a bare array
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TaskPage {
    Paged {
        results: Vec<TodoistTask>,
        #[serde(default)]
        next_cursor: Option<String>,
    },
    Bare(Vec<TodoistTask>),
}

impl TaskPage {
    pub(crate) fn into_parts(self) -> (Vec<TodoistTask>, Option<String>) {
        match self {
            Self::Paged {
                results,
                next_cursor,
            } => (results, next_cursor),
            Self::Bare(tasks) => (tasks, None),
        }
    }
}
