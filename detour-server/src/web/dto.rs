//! Data transfer objects for web requests and responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    Deviation, DeviationLevel, LatLng, Location, RankedCandidate, Route, Stop, format_distance,
    format_duration,
};
use crate::engine::{DeviationReport, DiscoveryPhase, DiscoveryStatus};

/// A start or end point.
#[derive(Debug, Deserialize)]
pub struct PointInput {
    pub lat: f64,
    pub lng: f64,
    pub name: Option<String>,
}

impl PointInput {
    /// Validate into a location. `field` names the input in error messages.
    pub fn to_location(&self, field: &str) -> Result<Location, String> {
        let coords = LatLng::new(self.lat, self.lng).map_err(|e| format!("{field}: {e}"))?;
        Ok(Location {
            name: self.name.clone(),
            ..Location::new(coords)
        })
    }
}

/// An intermediate stop. Coordinates are absent until the stop is resolved.
#[derive(Debug, Deserialize)]
pub struct StopInput {
    pub id: String,
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl StopInput {
    pub fn to_stop(&self) -> Result<Stop, String> {
        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                Some(LatLng::new(lat, lng).map_err(|e| format!("stop {}: {e}", self.id))?)
            }
            _ => None,
        };
        Ok(Stop {
            name: self.name.clone(),
            ..Stop::new(self.id.clone(), location)
        })
    }
}

/// Request to compute deviations for a set of stops.
#[derive(Debug, Deserialize)]
pub struct DeviationsRequest {
    pub start: PointInput,
    pub end: PointInput,

    #[serde(default)]
    pub stops: Vec<StopInput>,

    /// Place ids of currently listed stations to add as stops, after `stops`
    #[serde(default)]
    pub stations: Vec<String>,
}

/// Request to discover stations between two points.
#[derive(Debug, Deserialize)]
pub struct NearbyStationsRequest {
    pub start: PointInput,
    pub end: PointInput,
}

/// A route summary.
#[derive(Debug, Serialize)]
pub struct RouteView {
    pub distance_meters: f64,
    pub duration_seconds: f64,
    pub distance: String,
    pub duration: String,
    pub legs: usize,
    pub path: Vec<LatLng>,
}

impl RouteView {
    pub fn from_route(route: &Route) -> Self {
        Self {
            distance_meters: route.distance_meters(),
            duration_seconds: route.duration_seconds(),
            distance: format_distance(route.distance_meters()),
            duration: format_duration(route.duration_seconds()),
            legs: route.legs.len(),
            path: route.path.clone(),
        }
    }
}

/// A deviation with its classification.
#[derive(Debug, Serialize)]
pub struct DeviationView {
    #[serde(flatten)]
    pub deviation: Deviation,

    pub level: DeviationLevel,

    /// "On the way", "Slight detour" or "Detour"
    pub label: &'static str,

    /// e.g. "+10.0% · +1.0 km · +1 min"
    pub summary: String,
}

impl DeviationView {
    pub fn from_deviation(deviation: &Deviation) -> Self {
        let level = deviation.level();
        Self {
            deviation: *deviation,
            level,
            label: level.label(),
            summary: deviation.summary(),
        }
    }
}

/// Response for deviation computation.
#[derive(Debug, Serialize)]
pub struct DeviationsResponse {
    pub baseline: RouteView,
    pub deviations: BTreeMap<String, DeviationView>,
    pub combined: Option<RouteView>,
}

impl DeviationsResponse {
    pub fn from_report(report: &DeviationReport) -> Self {
        Self {
            baseline: RouteView::from_route(&report.baseline),
            deviations: report
                .deviations
                .iter()
                .map(|(id, d)| (id.clone(), DeviationView::from_deviation(d)))
                .collect(),
            combined: report.combined.as_ref().map(RouteView::from_route),
        }
    }
}

/// A ranked station.
#[derive(Debug, Serialize)]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lng: f64,
    pub vicinity: Option<String>,
    pub deviation: DeviationView,
}

impl StationView {
    pub fn from_ranked(ranked: &RankedCandidate) -> Self {
        let candidate = &ranked.candidate;
        Self {
            id: candidate.id.to_string(),
            name: candidate.name.clone(),
            lat: candidate.location.lat(),
            lng: candidate.location.lng(),
            vicinity: candidate.vicinity.clone(),
            deviation: DeviationView::from_deviation(&ranked.deviation),
        }
    }
}

/// Response listing stations.
#[derive(Debug, Serialize)]
pub struct StationsResponse {
    #[serde(flatten)]
    pub phase: DiscoveryPhase,
    pub loading: bool,
    pub stations: Vec<StationView>,

    /// Start/end pairs with a cached station list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached_routes: Option<u64>,
}

impl StationsResponse {
    pub fn from_status(status: &DiscoveryStatus) -> Self {
        Self {
            phase: status.phase,
            loading: status.phase.is_loading(),
            stations: status.stations.iter().map(StationView::from_ranked).collect(),
            cached_routes: None,
        }
    }

    pub fn with_cached_routes(mut self, n: u64) -> Self {
        self.cached_routes = Some(n);
        self
    }

    pub fn done(stations: &[RankedCandidate]) -> Self {
        Self {
            phase: DiscoveryPhase::Done,
            loading: false,
            stations: stations.iter().map(StationView::from_ranked).collect(),
            cached_routes: None,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candidate, PlaceId, RouteCost};
    use std::sync::Arc;

    #[test]
    fn stop_without_coordinates_is_unresolved() {
        let input = StopInput {
            id: "stop-1".into(),
            name: Some("Cafe".into()),
            lat: Some(3.0),
            lng: None,
        };
        let stop = input.to_stop().unwrap();
        assert!(!stop.is_resolved());
        assert_eq!(stop.name.as_deref(), Some("Cafe"));
    }

    #[test]
    fn invalid_stop_coordinates_are_rejected() {
        let input = StopInput {
            id: "stop-2".into(),
            name: None,
            lat: Some(100.0),
            lng: Some(101.0),
        };
        let err = input.to_stop().unwrap_err();
        assert!(err.starts_with("stop stop-2:"));
    }

    #[test]
    fn invalid_point_names_field() {
        let input = PointInput {
            lat: 0.0,
            lng: 200.0,
            name: None,
        };
        assert!(input.to_location("start").unwrap_err().starts_with("start:"));
    }

    #[test]
    fn deviation_view_serializes_flat() {
        let d = Deviation::between(
            &RouteCost::new(10000.0, 600.0),
            &RouteCost::new(11000.0, 660.0),
        );
        let json = serde_json::to_value(DeviationView::from_deviation(&d)).unwrap();

        assert_eq!(json["extra_distance"], 1000.0);
        assert_eq!(json["deviation_percent"], 10.0);
        assert_eq!(json["level"], "medium");
        assert_eq!(json["label"], "Slight detour");
        assert_eq!(json["summary"], "+10.0% · +1.0 km · +1 min");
    }

    #[test]
    fn stations_response_reports_phase() {
        let ranked = RankedCandidate {
            candidate: Candidate {
                id: PlaceId::new("p1"),
                name: "Mid Valley KTM".into(),
                location: LatLng::new(3.1185, 101.6774).unwrap(),
                vicinity: None,
            },
            deviation: Deviation::between(
                &RouteCost::new(10000.0, 600.0),
                &RouteCost::new(10200.0, 630.0),
            ),
        };
        let status = DiscoveryStatus {
            phase: DiscoveryPhase::Searching { points: 5 },
            stations: Arc::new(vec![ranked]),
        };

        let json = serde_json::to_value(StationsResponse::from_status(&status)).unwrap();
        assert_eq!(json["phase"], "searching");
        assert_eq!(json["points"], 5);
        assert_eq!(json["loading"], true);
        assert_eq!(json["stations"][0]["id"], "p1");
        assert_eq!(json["stations"][0]["deviation"]["label"], "On the way");
        assert!(json.get("cached_routes").is_none());

        let json =
            serde_json::to_value(StationsResponse::from_status(&status).with_cached_routes(4))
                .unwrap();
        assert_eq!(json["cached_routes"], 4);
    }

    #[test]
    fn station_ids_default_to_empty() {
        let req: DeviationsRequest = serde_json::from_str(
            r#"{"start": {"lat": 3.0, "lng": 101.0}, "end": {"lat": 3.1, "lng": 101.1}}"#,
        )
        .unwrap();
        assert!(req.stops.is_empty());
        assert!(req.stations.is_empty());
    }
}
