//! Maps web service client.
//!
//! This module provides an HTTP client for a Google-Maps-style web service
//! offering the two capabilities the engine consumes:
//! - Directions: routes between points, optionally through waypoints, with
//!   per-leg distance/duration and an encoded overview polyline
//! - Places Nearby Search: places of a category within a radius of a point

mod client;
mod convert;
mod error;
mod types;

pub use client::{MapsClient, MapsConfig};
pub use convert::{PolylineError, decode_polyline};
pub use error::MapsError;
pub use types::{DirectionsResponse, NearbySearchResponse};
