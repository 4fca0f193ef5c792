//! Application services - Use case implementations

mod digest_service;
mod summarizer_service;

pub use digest_service::{
    AssembledDigest, DigestConfig, DigestService, ServiceStatus, SourceFailure,
    SourceFailureReason, SourcePorts,
};
pub use summarizer_service::{Enrichment, Summary, SummarizerService};
