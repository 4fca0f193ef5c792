//! Todoist integration for the daily digest
//!
//! Lists active tasks through the Todoist REST API using a personal API token.

pub mod client;
mod models;

pub use client::{TodoistClient, TodoistConfig, TodoistError, TodoistHttpClient};
pub use models::{TaskDue, TodoistTask};
