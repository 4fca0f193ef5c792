//! Google Workspace integration for the daily digest
//!
//! Read-only access to Gmail and Google Calendar for a single account.
//!
//! # Architecture
//!
//! Both APIs authenticate with an OAuth 2.0 refresh token obtained once through
//! the installed-app consent flow. [`OAuthClient`] performs the token endpoint
//! calls (code exchange and refresh) and [`AccessTokenSource`] caches the
//! short-lived access token per refresh token.
//!
//! - [`GmailClient`] / [`GmailApiClient`]: unread inbox messages with
//!   `From`, `Subject` and `Date` headers
//! - [`CalendarClient`] / [`GoogleCalendarClient`]: upcoming events on the
//!   primary calendar
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_google::{GmailApiClient, GmailClient, GoogleConfig};
//!
//! let gmail = GmailApiClient::new(&GoogleConfig::default())?;
//! let unread = gmail.unread_inbox(20).await?;
//! ```

mod calendar;
mod config;
mod error;
mod gmail;
mod models;
pub mod oauth;

pub use calendar::{CalendarClient, GoogleCalendarClient};
pub use config::GoogleConfig;
pub use error::GoogleError;
pub use gmail::{GmailApiClient, GmailClient};
pub use models::{CalendarEvent, MessageSummary};
pub use oauth::{AccessTokenSource, ClientSecrets, GOOGLE_SCOPES, OAuthClient, TokenFile, TokenGrant};
