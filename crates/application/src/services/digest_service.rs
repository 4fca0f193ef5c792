//! Digest orchestration
//!
//! Fans out to every requested source at once, collects whatever comes back
//! into a [`DigestBag`], and hands the bag to the summarizer. A source that
//! fails, times out or lacks credentials is left out of the bag and reported
//! as a warning; it never blocks the others.

use std::{fmt, sync::Arc, time::Duration};

use chrono::Utc;
use domain::{DigestBag, DigestRequest, DigestResult, DigestWarning, Location, SourceData, SourceKind};
use futures::future::join_all;
use serde::Serialize;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use super::summarizer_service::SummarizerService;
use crate::{
    error::ApplicationError,
    ports::{CalendarPort, EmailPort, InferencePort, NewsPort, TodoPort, TrafficPort, WeatherPort},
};

/// Default per-source fetch timeout in seconds
const DEFAULT_SOURCE_TIMEOUT_SECS: u64 = 10;

/// Default overall digest deadline in seconds
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Orchestrator settings
#[derive(Debug, Clone)]
pub struct DigestConfig {
    /// Location used when a request does not name one
    pub default_location: Location,
    /// Upper bound for each individual source fetch and enrichment lookup
    pub source_timeout: Duration,
    /// Upper bound for the whole digest, summarization included
    pub request_timeout: Duration,
}

impl DigestConfig {
    #[must_use]
    pub fn new(default_location: Location) -> Self {
        Self {
            default_location,
            source_timeout: Duration::from_secs(DEFAULT_SOURCE_TIMEOUT_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub const fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// The six data source ports
#[derive(Clone)]
pub struct SourcePorts {
    pub email: Arc<dyn EmailPort>,
    pub news: Arc<dyn NewsPort>,
    pub calendar: Arc<dyn CalendarPort>,
    pub weather: Arc<dyn WeatherPort>,
    pub traffic: Arc<dyn TrafficPort>,
    pub todos: Arc<dyn TodoPort>,
}

impl fmt::Debug for SourcePorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourcePorts")
            .field("email", &self.email.is_configured())
            .field("news", &self.news.is_configured())
            .field("calendar", &self.calendar.is_configured())
            .field("weather", &self.weather.is_configured())
            .field("traffic", &self.traffic.is_configured())
            .field("todos", &self.todos.is_configured())
            .finish()
    }
}

impl SourcePorts {
    /// Whether credentials for a source are present
    #[must_use]
    pub fn is_configured(&self, kind: SourceKind) -> bool {
        match kind {
            SourceKind::Emails => self.email.is_configured(),
            SourceKind::News => self.news.is_configured(),
            SourceKind::Calendar => self.calendar.is_configured(),
            SourceKind::Weather => self.weather.is_configured(),
            SourceKind::Traffic => self.traffic.is_configured(),
            SourceKind::Todos => self.todos.is_configured(),
        }
    }

    async fn fetch(&self, kind: SourceKind, location: &Location) -> Result<SourceData, ApplicationError> {
        match kind {
            SourceKind::Emails => self.email.fetch_unread().await.map(SourceData::Emails),
            SourceKind::News => self.news.fetch_top_stories().await.map(SourceData::News),
            SourceKind::Calendar => self.calendar.fetch_upcoming().await.map(SourceData::Calendar),
            SourceKind::Weather => self.weather.fetch_weather(location).await.map(SourceData::Weather),
            SourceKind::Traffic => self.traffic.fetch_commute(location).await.map(SourceData::Traffic),
            SourceKind::Todos => self.todos.fetch_todos().await.map(SourceData::Todos),
        }
    }
}

/// Why a requested source is missing from the bag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceFailureReason {
    NotConfigured,
    TimedOut(Duration),
    Failed(String),
}

impl fmt::Display for SourceFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("not configured"),
            Self::TimedOut(after) => write!(f, "timed out after {after:?}"),
            Self::Failed(message) => f.write_str(message),
        }
    }
}

/// A requested source that contributed nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    pub source: SourceKind,
    pub reason: SourceFailureReason,
}

impl From<&SourceFailure> for DigestWarning {
    fn from(failure: &SourceFailure) -> Self {
        Self::source_fetch(failure.source, failure.reason.to_string())
    }
}

/// Result of the fan-out stage
#[derive(Debug, Default)]
pub struct AssembledDigest {
    pub bag: DigestBag,
    pub failures: Vec<SourceFailure>,
}

/// Configuration state of each source and the language model
///
/// Field order is the order the health endpoint reports them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ServiceStatus {
    pub email: bool,
    pub news: bool,
    pub calendar: bool,
    pub weather: bool,
    pub traffic: bool,
    pub todos: bool,
    pub claude: bool,
}

/// Assembles and summarizes digests
pub struct DigestService {
    sources: SourcePorts,
    inference: Arc<dyn InferencePort>,
    summarizer: SummarizerService,
    config: DigestConfig,
}

impl fmt::Debug for DigestService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestService")
            .field("sources", &self.sources)
            .field("inference", &"<InferencePort>")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DigestService {
    /// Create a digest service
    ///
    /// The summarizer shares the weather and traffic ports for enrichment.
    #[must_use]
    pub fn new(sources: SourcePorts, inference: Arc<dyn InferencePort>, config: DigestConfig) -> Self {
        let summarizer = SummarizerService::new(
            Arc::clone(&inference),
            Arc::clone(&sources.weather),
            Arc::clone(&sources.traffic),
            config.source_timeout,
        );
        Self {
            sources,
            inference,
            summarizer,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &DigestConfig {
        &self.config
    }

    /// Whether each source and the model have credentials
    #[must_use]
    pub fn service_status(&self) -> ServiceStatus {
        ServiceStatus {
            email: self.sources.is_configured(SourceKind::Emails),
            news: self.sources.is_configured(SourceKind::News),
            calendar: self.sources.is_configured(SourceKind::Calendar),
            weather: self.sources.is_configured(SourceKind::Weather),
            traffic: self.sources.is_configured(SourceKind::Traffic),
            todos: self.sources.is_configured(SourceKind::Todos),
            claude: self.inference.is_configured(),
        }
    }

    /// Fetch every enabled source concurrently
    #[instrument(skip(self, request), fields(sources = ?request.enabled_sources()))]
    pub async fn assemble(&self, request: &DigestRequest) -> Result<AssembledDigest, ApplicationError> {
        let location = match request.location_override() {
            Some(name) => Location::new(name)?,
            None => self.config.default_location.clone(),
        };

        let fetches = request.enabled_sources().into_iter().map(|kind| {
            let location = &location;
            async move { (kind, self.fetch_one(kind, location).await) }
        });

        let mut assembled = AssembledDigest::default();
        for (kind, outcome) in join_all(fetches).await {
            match outcome {
                Ok(data) => {
                    debug!(source = %kind, records = data.record_count(), "Source fetched");
                    assembled.bag.insert(data);
                },
                Err(reason) => {
                    warn!(source = %kind, reason = %reason, "Source left out of digest");
                    assembled.failures.push(SourceFailure { source: kind, reason });
                },
            }
        }

        Ok(assembled)
    }

    async fn fetch_one(&self, kind: SourceKind, location: &Location) -> Result<SourceData, SourceFailureReason> {
        if !self.sources.is_configured(kind) {
            return Err(SourceFailureReason::NotConfigured);
        }

        match timeout(self.config.source_timeout, self.sources.fetch(kind, location)).await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(e)) => Err(SourceFailureReason::Failed(e.to_string())),
            Err(_) => Err(SourceFailureReason::TimedOut(self.config.source_timeout)),
        }
    }

    /// Assemble, summarize and timestamp a digest within the request deadline
    #[instrument(skip(self, request))]
    pub async fn generate(&self, request: &DigestRequest) -> Result<DigestResult, ApplicationError> {
        let deadline = self.config.request_timeout;
        timeout(deadline, self.run(request)).await.map_err(|_| {
            ApplicationError::Timeout(format!(
                "digest was not ready within {}s",
                deadline.as_secs()
            ))
        })?
    }

    async fn run(&self, request: &DigestRequest) -> Result<DigestResult, ApplicationError> {
        info!("Starting digest generation");

        let assembled = self.assemble(request).await?;
        let mut warnings: Vec<DigestWarning> =
            assembled.failures.iter().map(DigestWarning::from).collect();

        let summary = self.summarizer.summarize(assembled.bag).await?;
        warnings.extend(summary.warnings);

        info!(
            sources = summary.bag.len(),
            warnings = warnings.len(),
            "Digest generation completed"
        );

        Ok(DigestResult {
            summary: summary.text,
            details: summary.bag,
            timestamp: Utc::now(),
            warnings,
        })
    }
}
