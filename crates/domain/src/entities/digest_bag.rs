//! Keyed collection of per-source payloads assembled for one digest

use std::collections::BTreeMap;

use serde::Serialize;

use super::records::{
    CalendarEventRecord, EmailRecord, NewsArticleRecord, TodoRecord, TrafficReport, TripTraffic,
    WeatherLookup, WeatherRecord,
};
use crate::value_objects::SourceKind;

/// Payload contributed by one source
///
/// Serialized untagged so that the bag renders as `{"news": [...], ...}`
/// with each value in its source's own shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceData {
    Emails(Vec<EmailRecord>),
    News(Vec<NewsArticleRecord>),
    Calendar(Vec<CalendarEventRecord>),
    /// Plain fetch for the request or default location
    Weather(WeatherRecord),
    /// Lookups for locations extracted by the model
    WeatherLookups(Vec<WeatherLookup>),
    /// Plain fetch over the configured commute routes
    Traffic(TrafficReport),
    /// Lookups for trips extracted by the model
    TripTraffic(Vec<TripTraffic>),
    Todos(Vec<TodoRecord>),
}

impl SourceData {
    /// Number of individual records carried
    #[must_use]
    pub fn record_count(&self) -> usize {
        match self {
            Self::Emails(v) => v.len(),
            Self::News(v) => v.len(),
            Self::Calendar(v) => v.len(),
            Self::Weather(_) => 1,
            Self::WeatherLookups(v) => v.len(),
            Self::Traffic(report) => report.routes.len(),
            Self::TripTraffic(v) => v.len(),
            Self::Todos(v) => v.len(),
        }
    }

    /// Source key this payload belongs under
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self {
            Self::Emails(_) => SourceKind::Emails,
            Self::News(_) => SourceKind::News,
            Self::Calendar(_) => SourceKind::Calendar,
            Self::Weather(_) | Self::WeatherLookups(_) => SourceKind::Weather,
            Self::Traffic(_) | Self::TripTraffic(_) => SourceKind::Traffic,
            Self::Todos(_) => SourceKind::Todos,
        }
    }
}

/// Mapping from source key to that source's payload
///
/// Keys iterate and serialize in [`SourceKind`] declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DigestBag(BTreeMap<SourceKind, SourceData>);

impl DigestBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a payload under its own source key, replacing any previous one
    pub fn insert(&mut self, data: SourceData) -> Option<SourceData> {
        self.0.insert(data.kind(), data)
    }

    #[must_use]
    pub fn get(&self, kind: SourceKind) -> Option<&SourceData> {
        self.0.get(&kind)
    }

    #[must_use]
    pub fn contains(&self, kind: SourceKind) -> bool {
        self.0.contains_key(&kind)
    }

    pub fn keys(&self) -> impl Iterator<Item = SourceKind> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SourceKind, &SourceData)> {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Record counts per source, used for logging and CLI output
    #[must_use]
    pub fn record_counts(&self) -> BTreeMap<SourceKind, usize> {
        self.0.iter().map(|(k, v)| (*k, v.record_count())).collect()
    }
}

impl FromIterator<SourceData> for DigestBag {
    fn from_iter<T: IntoIterator<Item = SourceData>>(iter: T) -> Self {
        let mut bag = Self::new();
        for data in iter {
            bag.insert(data);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str) -> NewsArticleRecord {
        NewsArticleRecord {
            title: Some(title.to_string()),
            source: None,
            description: None,
            url: None,
            published_at: None,
        }
    }

    #[test]
    fn insert_uses_payload_kind() {
        let mut bag = DigestBag::new();
        bag.insert(SourceData::News(vec![article("a")]));
        assert!(bag.contains(SourceKind::News));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn enrichment_variants_replace_plain_fetch() {
        let mut bag = DigestBag::new();
        bag.insert(SourceData::Weather(WeatherRecord {
            location: Some("Seattle".to_string()),
            temperature: Some(50.0),
            feels_like: None,
            condition: None,
            description: None,
            humidity: None,
            wind_speed: None,
            precipitation: 0.0,
        }));
        let previous = bag.insert(SourceData::WeatherLookups(Vec::new()));
        assert!(matches!(previous, Some(SourceData::Weather(_))));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn serializes_as_plain_map() {
        let bag: DigestBag = [
            SourceData::Todos(Vec::new()),
            SourceData::News(vec![article("x")]),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&bag).unwrap();
        assert_eq!(
            json,
            r#"{"news":[{"title":"x","source":null,"description":null,"url":null,"publishedAt":null}],"todos":[]}"#
        );
    }

    #[test]
    fn record_counts_per_source() {
        let bag: DigestBag = [
            SourceData::News(vec![article("a"), article("b")]),
            SourceData::Emails(Vec::new()),
        ]
        .into_iter()
        .collect();

        let counts = bag.record_counts();
        assert_eq!(counts.get(&SourceKind::News), Some(&2));
        assert_eq!(counts.get(&SourceKind::Emails), Some(&0));
    }
}
