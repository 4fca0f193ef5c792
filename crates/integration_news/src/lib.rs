//! News integration for the daily digest
//!
//! Fetches top headlines from [NewsAPI](https://newsapi.org/docs/endpoints/top-headlines).

mod client;
mod config;
mod error;
mod models;

pub use client::{NewsApiClient, NewsClient};
pub use config::NewsConfig;
pub use error::NewsError;
pub use models::Headline;
