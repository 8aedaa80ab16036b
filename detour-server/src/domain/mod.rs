//! Domain types for the detour engine.
//!
//! Coordinates are validated at construction time, so code that receives a
//! `LatLng` can trust it. Route costs and deviations are plain numbers with
//! the arithmetic the engine relies on.

mod candidate;
mod deviation;
mod location;
mod route;

pub use candidate::{Candidate, PlaceId, RankedCandidate};
pub use deviation::{
    Deviation, DeviationLevel, calculate_deviation, format_distance, format_duration,
};
pub use location::{InvalidCoordinate, LatLng, Location, Stop};
pub use route::{Route, RouteCost, TravelMode};
