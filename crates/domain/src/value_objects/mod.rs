//! Value Objects - Immutable, identity-less domain primitives

mod location;
mod source_kind;
mod traffic_level;
mod trip;

pub use location::Location;
pub use source_kind::SourceKind;
pub use traffic_level::TrafficLevel;
pub use trip::Trip;
