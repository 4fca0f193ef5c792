//! Domain entities - per-request digest structures

mod digest;
mod digest_bag;
mod extraction;
mod records;

pub use digest::{DigestRequest, DigestResult, DigestWarning, WarningStage};
pub use digest_bag::{DigestBag, SourceData};
pub use extraction::{ExtractedEntities, ExtractionOutcome, strip_code_fence};
pub use records::{
    CalendarEventRecord, EmailRecord, NewsArticleRecord, TodoRecord, TrafficReport,
    TrafficRouteRecord, TripTraffic, WeatherLookup, WeatherRecord,
};
