//! Discovered stations and their ranking records.

use std::fmt;

use serde::Serialize;

use super::deviation::Deviation;
use super::location::LatLng;

/// Stable external identifier of a place, as issued by the places service.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlaceId({})", self.0)
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A station found by nearby search.
///
/// Identity is the place id: two candidates with the same id are the same
/// station even if other fields differ.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub id: PlaceId,
    pub name: String,
    pub location: LatLng,
    pub vicinity: Option<String>,
}

/// A candidate whose detour was successfully computed.
#[derive(Debug, Clone, Serialize)]
pub struct RankedCandidate {
    pub candidate: Candidate,
    pub deviation: Deviation,
}
