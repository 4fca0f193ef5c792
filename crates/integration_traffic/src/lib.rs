//! Road traffic integration for the daily digest
//!
//! Provides traffic-aware driving estimates via the
//! [Google Routes API](https://developers.google.com/maps/documentation/routes).
//!
//! # Architecture
//!
//! [`TrafficClient`] defines the interface for route computation and is
//! implemented by [`GoogleRoutesClient`]. Responses are reduced to a
//! [`RouteEstimate`] per alternative so callers never see the raw wire format.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_traffic::{GoogleRoutesClient, TrafficClient, TrafficConfig};
//!
//! let client = GoogleRoutesClient::new(&TrafficConfig::default())?;
//! let routes = client.compute_routes("Seattle, WA", "Tacoma, WA").await?;
//! println!("{} via primary route", routes.primary.duration_text());
//! ```

mod client;
mod config;
mod error;
mod models;

pub use client::{GoogleRoutesClient, TrafficClient};
pub use config::TrafficConfig;
pub use error::TrafficError;
pub use models::{ComputedRoutes, RouteEstimate};
