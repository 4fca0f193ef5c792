//! Two-pass summarization
//!
//! 1. Ask the model which places and drives appear in the user's calendar,
//!    email and todos.
//! 2. Look up weather for each place and a route for each drive, concurrently
//!    and independently.
//! 3. Fold those lookups into the bag and ask the model for the digest.

use std::{future::Future, sync::Arc, time::Duration};

use domain::{
    DigestBag, DigestWarning, ExtractedEntities, ExtractionOutcome, Location, SourceData,
    TripTraffic, WeatherLookup,
};
use futures::future::join_all;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{InferencePort, TrafficPort, WeatherPort},
    prompts,
};

/// Lookups produced for extracted entities
#[derive(Debug, Default)]
pub struct Enrichment {
    pub weather: Vec<WeatherLookup>,
    pub traffic: Vec<TripTraffic>,
    pub warnings: Vec<DigestWarning>,
}

/// Output of a summarization run
#[derive(Debug)]
pub struct Summary {
    /// Final narrative text, verbatim from the model
    pub text: String,
    /// The bag after enrichment
    pub bag: DigestBag,
    pub entities: ExtractedEntities,
    /// Extraction and enrichment failures
    pub warnings: Vec<DigestWarning>,
}

/// Turns an assembled bag into a narrative digest
pub struct SummarizerService {
    inference: Arc<dyn InferencePort>,
    weather: Arc<dyn WeatherPort>,
    traffic: Arc<dyn TrafficPort>,
    lookup_timeout: Duration,
}

impl std::fmt::Debug for SummarizerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizerService")
            .field("inference", &"<InferencePort>")
            .field("weather", &"<WeatherPort>")
            .field("traffic", &"<TrafficPort>")
            .field("lookup_timeout", &self.lookup_timeout)
            .finish()
    }
}

impl SummarizerService {
    #[must_use]
    pub fn new(
        inference: Arc<dyn InferencePort>,
        weather: Arc<dyn WeatherPort>,
        traffic: Arc<dyn TrafficPort>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            inference,
            weather,
            traffic,
            lookup_timeout,
        }
    }

    /// Run extraction, enrichment and the final completion
    ///
    /// Only a failed completion call is fatal. Extraction replies that do not
    /// parse and failed lookups become warnings.
    #[instrument(skip(self, bag), fields(sources = bag.len()))]
    pub async fn summarize(&self, mut bag: DigestBag) -> Result<Summary, ApplicationError> {
        let mut warnings = Vec::new();

        let entities = self.extract_entities(&bag, &mut warnings).await?;
        let enrichment = self.enrich(&entities).await;
        warnings.extend(enrichment.warnings);

        // Entity-driven lookups supersede the plain fetch, but an empty
        // enrichment leaves whatever the plain fetch produced.
        if !enrichment.weather.is_empty() {
            bag.insert(SourceData::WeatherLookups(enrichment.weather));
        }
        if !enrichment.traffic.is_empty() {
            bag.insert(SourceData::TripTraffic(enrichment.traffic));
        }

        let context = prompts::render_digest_context(&bag)?;
        let response = self
            .inference
            .generate(&prompts::digest_prompt(&context))
            .await?;

        info!(
            model = %response.model,
            latency_ms = response.latency_ms,
            warnings = warnings.len(),
            "Digest summary generated"
        );

        Ok(Summary {
            text: response.content,
            bag,
            entities,
            warnings,
        })
    }

    /// First completion: places and trips mentioned in the user's data
    async fn extract_entities(
        &self,
        bag: &DigestBag,
        warnings: &mut Vec<DigestWarning>,
    ) -> Result<ExtractedEntities, ApplicationError> {
        let context = prompts::render_extraction_context(bag)?;
        if context.is_empty() {
            debug!("No calendar, email or todo data, skipping entity extraction");
            return Ok(ExtractedEntities::default());
        }

        let response = self
            .inference
            .generate(&prompts::extraction_prompt(&context))
            .await?;
        debug!(reply = %response.content, "Entity extraction reply");

        let outcome = ExtractionOutcome::parse(&response.content);
        if let Some(reason) = outcome.fallback_reason() {
            warn!(reason = %reason, "Could not parse extracted entities, continuing without them");
            warnings.push(DigestWarning::extraction(reason));
        }

        let entities = outcome.into_entities();
        debug!(
            locations = entities.locations.len(),
            trips = entities.trips.len(),
            "Entities extracted"
        );
        Ok(entities)
    }

    /// Concurrent lookups for every extracted place and trip
    ///
    /// Each lookup is isolated: a failure is recorded and its siblings still
    /// complete.
    pub async fn enrich(&self, entities: &ExtractedEntities) -> Enrichment {
        let weather_lookups = entities.locations.iter().map(|name| async move {
            let result = self.lookup_weather(name).await;
            (name, result)
        });
        let route_lookups = entities.trips.iter().map(|trip| async move {
            let result = self.bounded(self.traffic.fetch_route(trip)).await;
            (trip, result)
        });

        let (weather_results, route_results) =
            futures::join!(join_all(weather_lookups), join_all(route_lookups));

        let mut enrichment = Enrichment::default();

        for (name, result) in weather_results {
            match result {
                Ok(weather) => enrichment.weather.push(WeatherLookup {
                    location: name.clone(),
                    weather,
                }),
                Err(e) => {
                    warn!(location = %name, error = %e, "Weather lookup failed");
                    enrichment
                        .warnings
                        .push(DigestWarning::enrichment(name.clone(), e.to_string()));
                },
            }
        }

        for (trip, result) in route_results {
            match result {
                Ok(traffic) => enrichment.traffic.push(TripTraffic {
                    trip: trip.clone(),
                    traffic,
                }),
                Err(e) => {
                    let name = trip.route_name();
                    warn!(trip = %name, error = %e, "Route lookup failed");
                    enrichment
                        .warnings
                        .push(DigestWarning::enrichment(name, e.to_string()));
                },
            }
        }

        enrichment
    }

    async fn lookup_weather(
        &self,
        name: &str,
    ) -> Result<domain::WeatherRecord, ApplicationError> {
        let location = Location::new(name)?;
        self.bounded(self.weather.fetch_weather(&location)).await
    }

    async fn bounded<T>(
        &self,
        lookup: impl Future<Output = Result<T, ApplicationError>>,
    ) -> Result<T, ApplicationError> {
        timeout(self.lookup_timeout, lookup).await.map_err(|_| {
            ApplicationError::Timeout(format!(
                "lookup did not finish within {:?}",
                self.lookup_timeout
            ))
        })?
    }
}
