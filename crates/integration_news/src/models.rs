//! NewsAPI response models

use serde::{Deserialize, Serialize};

/// One top-headline article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headline {
    pub title: Option<String>,
    /// Display name of the publishing outlet
    pub source_name: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// ISO 8601 publication time, passed through unparsed
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTopHeadlines {
    #[serde(default)]
    pub articles: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawArticle {
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSource {
    #[serde(default)]
    pub name: Option<String>,
}

/// Error envelope returned with non-2xx statuses
#[derive(Debug, Deserialize)]
pub(crate) struct RawErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl RawErrorBody {
    pub(crate) fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{code}: {message}"),
            (Some(text), None) | (None, Some(text)) => text.clone(),
            (None, None) => "no detail".to_string(),
        }
    }
}

impl From<RawArticle> for Headline {
    fn from(raw: RawArticle) -> Self {
        Self {
            title: raw.title,
            source_name: raw.source.and_then(|s| s.name),
            description: raw.description,
            url: raw.url,
            published_at: raw.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_conversion() {
        let raw: RawArticle = serde_json::from_value(serde_json::json!({
            "source": {"id": null, "name": "The Seattle Times"},
            "author": "Staff",
            "title": "Ferry schedule changes",
            "description": null,
            "url": "https://example.com/ferry",
            "publishedAt": "2026-10-19T06:30:00Z"
        }))
        .unwrap();

        let headline = Headline::from(raw);
        assert_eq!(headline.source_name.as_deref(), Some("The Seattle Times"));
        assert_eq!(headline.published_at.as_deref(), Some("2026-10-19T06:30:00Z"));
        assert!(headline.description.is_none());
    }

    #[test]
    fn test_error_body_description() {
        let body: RawErrorBody = serde_json::from_value(serde_json::json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid"
        }))
        .unwrap();
        assert_eq!(body.describe(), "apiKeyInvalid: Your API key is invalid");
    }
}
