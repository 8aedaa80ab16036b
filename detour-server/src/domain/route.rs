//! Route costs and route geometry.

use serde::{Deserialize, Serialize};

use super::location::LatLng;

/// Aggregate cost of travelling a route or a single leg of it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RouteCost {
    /// Distance in meters.
    pub distance_meters: f64,

    /// Duration in seconds.
    pub duration_seconds: f64,
}

impl RouteCost {
    pub fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
        }
    }
}

impl std::iter::Sum for RouteCost {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(RouteCost::default(), |acc, leg| RouteCost {
            distance_meters: acc.distance_meters + leg.distance_meters,
            duration_seconds: acc.duration_seconds + leg.duration_seconds,
        })
    }
}

/// A route returned by the routing capability.
///
/// `path` is the overview polyline and is only needed for the baseline
/// route, which anchors station sampling. Detour routes are compared by
/// `cost` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub cost: RouteCost,
    pub legs: Vec<RouteCost>,
    pub path: Vec<LatLng>,
}

impl Route {
    /// Build a route whose total cost is the sum of its legs.
    pub fn from_legs(legs: Vec<RouteCost>, path: Vec<LatLng>) -> Self {
        let cost = legs.iter().copied().sum();
        Self { cost, legs, path }
    }

    pub fn distance_meters(&self) -> f64 {
        self.cost.distance_meters
    }

    pub fn duration_seconds(&self) -> f64 {
        self.cost.duration_seconds
    }
}

/// How the route is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    /// Wire name used by the maps web service.
    pub fn as_str(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Bicycling => "bicycling",
            TravelMode::Transit => "transit",
        }
    }
}
