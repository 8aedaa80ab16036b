//! Deviation computation and station discovery.
//!
//! This module answers: "is this waypoint on the way from A to B, and which
//! stations along the way cost the least extra time?"
//!
//! Discovery samples points along the baseline path, searches for stations
//! near each, deduplicates, costs a detour through every unique station and
//! keeps the cheapest few. Results are cached per start/end pair.

mod config;
mod discovery;
mod generation;
mod orchestrator;
mod rank;
mod sample;
mod services;

pub use config::EngineConfig;
pub use discovery::{Discovery, dedup_by_id, dedup_by_proximity, discover_stations};
pub use generation::{Generation, GenerationToken};
pub use orchestrator::{
    DeviationReport, DiscoveryPhase, DiscoveryStatus, EngineError, RouteDeviationEngine,
};
pub use rank::{DetourContext, rank_candidates, top_by_extra_duration};
pub use sample::{sample_count, sample_route};
pub use services::{NearbyQuery, PlacesSearch, RouteRequest, RoutingService};
