//! Maps web service response DTOs.
//!
//! These types map directly to the Directions and Places Nearby Search JSON
//! responses. Fields the engine never reads are left out; `Option` is used
//! where the service omits fields rather than sending null.

use serde::Deserialize;

/// Response from the Directions API.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    /// `OK`, `ZERO_RESULTS`, `NOT_FOUND`, `REQUEST_DENIED`, ...
    pub status: String,

    #[serde(default)]
    pub routes: Vec<RouteDto>,

    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteDto {
    #[serde(default)]
    pub legs: Vec<LegDto>,

    pub overview_polyline: Option<PolylineDto>,

    pub summary: Option<String>,
}

/// One leg between consecutive route points (origin, waypoints, destination).
#[derive(Debug, Clone, Deserialize)]
pub struct LegDto {
    pub distance: ValueText,
    pub duration: ValueText,
}

/// A numeric value with its localized display text.
#[derive(Debug, Clone, Deserialize)]
pub struct ValueText {
    /// Meters for distances, seconds for durations.
    pub value: f64,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PolylineDto {
    /// Encoded polyline (precision 1e5).
    pub points: String,
}

/// Response from the Places Nearby Search API.
#[derive(Debug, Clone, Deserialize)]
pub struct NearbySearchResponse {
    pub status: String,

    #[serde(default)]
    pub results: Vec<PlaceDto>,

    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceDto {
    pub place_id: String,
    pub name: String,
    pub geometry: GeometryDto,
    pub vicinity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeometryDto {
    pub location: LatLngDto,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLngDto {
    pub lat: f64,
    pub lng: f64,
}
