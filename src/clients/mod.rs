//! Clients - HTTP Clients for External APIs
//!
//! This module contains HTTP clients for communicating with external APIs.

pub mod telemetry_client;

// Re-export main types for convenience
pub use telemetry_client::{FeedPosition, FeedVehicle, PositionFeed, TelemetryClient};
