//! Coordinate and location types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::candidate::Candidate;

/// Error returned when a latitude/longitude pair is out of range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lng}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lng: f64,
    reason: &'static str,
}

/// A validated WGS84 coordinate pair in decimal degrees.
///
/// Latitude is within `[-90, 90]`, longitude within `[-180, 180]`, and both
/// are finite.
///
/// # Examples
///
/// ```
/// use detour_server::domain::LatLng;
///
/// let kl = LatLng::new(3.1390, 101.6869).unwrap();
/// assert_eq!(kl.lat(), 3.1390);
///
/// assert!(LatLng::new(91.0, 0.0).is_err());
/// assert!(LatLng::new(0.0, f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawLatLng", into = "RawLatLng")]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(lat: f64, lng: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(InvalidCoordinate {
                lat,
                lng,
                reason: "must be finite",
            });
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate {
                lat,
                lng,
                reason: "latitude must be within [-90, 90]",
            });
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(InvalidCoordinate {
                lat,
                lng,
                reason: "longitude must be within [-180, 180]",
            });
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Whether `other` lies inside the axis-aligned degree box of half-width
    /// `threshold` around `self`.
    ///
    /// This is a degree comparison, not a distance: 0.001° is roughly 100m of
    /// latitude, and the longitude span shrinks away from the equator.
    pub fn within_degrees(&self, other: &LatLng, threshold: f64) -> bool {
        (self.lat - other.lat).abs() < threshold && (self.lng - other.lng).abs() < threshold
    }
}

impl fmt::Debug for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LatLng({}, {})", self.lat, self.lng)
    }
}

/// Formats as `lat,lng`, the form the maps web service accepts.
impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

#[derive(Serialize, Deserialize)]
struct RawLatLng {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawLatLng> for LatLng {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawLatLng) -> Result<Self, Self::Error> {
        LatLng::new(raw.lat, raw.lng)
    }
}

impl From<LatLng> for RawLatLng {
    fn from(c: LatLng) -> Self {
        RawLatLng {
            lat: c.lat,
            lng: c.lng,
        }
    }
}

/// A resolved place: coordinates plus optional display name and identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    #[serde(flatten)]
    pub coords: LatLng,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Location {
    pub fn new(coords: LatLng) -> Self {
        Self {
            coords,
            name: None,
            id: None,
        }
    }
}

/// A user-chosen intermediate stop.
///
/// `location` is `None` until the stop's address has been resolved to
/// coordinates; unresolved stops are skipped by every computation.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub id: String,
    pub name: Option<String>,
    pub location: Option<LatLng>,
}

impl Stop {
    pub fn new(id: impl Into<String>, location: Option<LatLng>) -> Self {
        Self {
            id: id.into(),
            name: None,
            location,
        }
    }

    /// Turn a discovered station into a manual stop.
    pub fn from_candidate(id: impl Into<String>, candidate: &Candidate) -> Self {
        Self {
            id: id.into(),
            name: Some(candidate.name.clone()),
            location: Some(candidate.location),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.location.is_some()
    }
}
