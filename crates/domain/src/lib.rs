//! Domain layer for the daily digest
//!
//! Contains the per-source record shapes, the digest bag, request and result
//! types, and the parsing rules for entities extracted by the language model.
//! This layer performs no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
