//! External capabilities consumed by the engine.
//!
//! The engine never computes routes or searches places itself. These traits
//! are the seams: the maps HTTP client implements both, and tests substitute
//! in-memory fakes.

use std::future::Future;
use std::sync::Arc;

use crate::domain::{Candidate, LatLng, Route, TravelMode};
use crate::maps::MapsError;

/// Request for a route visiting `waypoints` in the given order.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub origin: LatLng,
    pub destination: LatLng,
    /// Visited in order; never reordered or optimized.
    pub waypoints: Vec<LatLng>,
    pub mode: TravelMode,
}

impl RouteRequest {
    /// A direct route with no intermediate waypoints.
    pub fn direct(origin: LatLng, destination: LatLng, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            waypoints: Vec::new(),
            mode,
        }
    }

    pub fn via(origin: LatLng, destination: LatLng, waypoint: LatLng, mode: TravelMode) -> Self {
        Self {
            origin,
            destination,
            waypoints: vec![waypoint],
            mode,
        }
    }
}

/// Nearby search around a point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub location: LatLng,
    pub radius_meters: f64,
    pub category: String,
    pub keyword: Option<String>,
}

/// Routing capability.
pub trait RoutingService {
    /// Fetch a route from origin to destination through the waypoints.
    fn route(&self, request: &RouteRequest)
    -> impl Future<Output = Result<Route, MapsError>> + Send;
}

/// Nearby places capability.
pub trait PlacesSearch {
    /// Find places of `query.category` within the radius, in service order.
    fn nearby(
        &self,
        query: &NearbyQuery,
    ) -> impl Future<Output = Result<Vec<Candidate>, MapsError>> + Send;
}

impl<T: RoutingService> RoutingService for Arc<T> {
    fn route(
        &self,
        request: &RouteRequest,
    ) -> impl Future<Output = Result<Route, MapsError>> + Send {
        (**self).route(request)
    }
}

impl<T: PlacesSearch> PlacesSearch for Arc<T> {
    fn nearby(
        &self,
        query: &NearbyQuery,
    ) -> impl Future<Output = Result<Vec<Candidate>, MapsError>> + Send {
        (**self).nearby(query)
    }
}
