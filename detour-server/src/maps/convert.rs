//! Conversion from maps DTOs to domain types.

use tracing::debug;

use crate::domain::{Candidate, LatLng, PlaceId, Route, RouteCost};

use super::error::MapsError;
use super::types::{DirectionsResponse, NearbySearchResponse, PlaceDto};

/// Error decoding an encoded polyline.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolylineError {
    #[error("invalid character {0:?} at byte {1}")]
    InvalidChar(char, usize),

    #[error("polyline ends in the middle of a value")]
    Truncated,

    #[error("value overflows at byte {0}")]
    Overflow(usize),

    #[error("decoded point out of range at byte {0}")]
    OutOfRange(usize),
}

/// Decode an encoded polyline (precision 1e5) into coordinates.
pub fn decode_polyline(encoded: &str) -> Result<Vec<LatLng>, PolylineError> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut pos = 0;
    let mut lat: i64 = 0;
    let mut lng: i64 = 0;

    while pos < bytes.len() {
        lat += decode_value(bytes, &mut pos)?;
        lng += decode_value(bytes, &mut pos)?;

        let point = LatLng::new(lat as f64 / 1e5, lng as f64 / 1e5)
            .map_err(|_| PolylineError::OutOfRange(pos))?;
        points.push(point);
    }

    Ok(points)
}

/// Decode one zig-zag varint-style value, advancing `pos`.
fn decode_value(bytes: &[u8], pos: &mut usize) -> Result<i64, PolylineError> {
    let mut result: i64 = 0;
    let mut shift = 0;

    loop {
        let &byte = bytes.get(*pos).ok_or(PolylineError::Truncated)?;
        if !(63..=126).contains(&byte) {
            return Err(PolylineError::InvalidChar(byte as char, *pos));
        }
        if shift > 55 {
            return Err(PolylineError::Overflow(*pos));
        }
        *pos += 1;

        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;

        if chunk < 0x20 {
            break;
        }
    }

    Ok(if result & 1 != 0 {
        !(result >> 1)
    } else {
        result >> 1
    })
}

/// Convert a Directions response into the first route it contains.
///
/// The route cost is the sum over all legs. The overview polyline, when
/// present, becomes the route path.
pub fn convert_directions(response: DirectionsResponse) -> Result<Route, MapsError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" | "NOT_FOUND" => return Err(MapsError::NoRoute),
        _ => {
            return Err(MapsError::Status {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    let route = response.routes.into_iter().next().ok_or(MapsError::NoRoute)?;

    let legs: Vec<RouteCost> = route
        .legs
        .iter()
        .map(|leg| RouteCost::new(leg.distance.value, leg.duration.value))
        .collect();

    if legs.is_empty() {
        return Err(MapsError::InvalidResponse("route has no legs".to_string()));
    }

    let path = match route.overview_polyline {
        Some(polyline) => decode_polyline(&polyline.points)
            .map_err(|e| MapsError::InvalidResponse(format!("overview polyline: {e}")))?,
        None => Vec::new(),
    };

    Ok(Route::from_legs(legs, path))
}

/// Convert a Nearby Search response into candidates, in response order.
///
/// `ZERO_RESULTS` is an empty result, not an error. Places with unusable
/// coordinates are dropped.
pub fn convert_nearby(response: NearbySearchResponse) -> Result<Vec<Candidate>, MapsError> {
    match response.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Ok(Vec::new()),
        _ => {
            return Err(MapsError::Status {
                status: response.status,
                message: response.error_message.unwrap_or_default(),
            });
        }
    }

    Ok(response
        .results
        .into_iter()
        .filter_map(convert_place)
        .collect())
}

fn convert_place(place: PlaceDto) -> Option<Candidate> {
    let loc = place.geometry.location;
    match LatLng::new(loc.lat, loc.lng) {
        Ok(location) => Some(Candidate {
            id: PlaceId::new(place.place_id),
            name: place.name,
            location,
            vicinity: place.vicinity,
        }),
        Err(e) => {
            debug!(place_id = %place.place_id, error = %e, "Dropping place with bad coordinates");
            None
        }
    }
}
