//! Station discovery along a route.
//!
//! Runs one nearby search per sample point, merges the results in sample
//! order, then deduplicates: first by place id, then by degree proximity.
//! A failed search contributes nothing; discovery never aborts because of
//! one point.

use std::collections::HashSet;

use futures::future::join_all;
use tracing::{debug, trace};

use crate::domain::{Candidate, LatLng};

use super::config::EngineConfig;
use super::generation::GenerationToken;
use super::services::{NearbyQuery, PlacesSearch};

/// Outcome of a discovery pass.
#[derive(Debug, Clone)]
pub struct Discovery {
    /// Unique candidates in canonical (sample, then result) order.
    pub candidates: Vec<Candidate>,

    /// Number of nearby searches issued.
    pub searches: usize,

    /// Number of searches that failed and contributed nothing.
    pub failed: usize,
}

/// Search around every sample point and return the unique candidates.
///
/// Searches run in batches of `config.batch_size`; results are merged in
/// sample order regardless of completion order. Returns `None` if `token`
/// goes stale between batches.
pub async fn discover_stations<P: PlacesSearch>(
    places: &P,
    points: &[LatLng],
    config: &EngineConfig,
    token: &GenerationToken,
) -> Option<Discovery> {
    let mut pooled = Vec::new();
    let mut searches = 0;
    let mut failed = 0;

    for batch in points.chunks(config.fan_out()) {
        if !token.is_current() {
            debug!(searches, "Discovery abandoned: generation is stale");
            return None;
        }

        let futures: Vec<_> = batch
            .iter()
            .map(|point| async move {
                let query = NearbyQuery {
                    location: *point,
                    radius_meters: config.search_radius_meters,
                    category: config.station_category.clone(),
                    keyword: config.station_keyword.clone(),
                };
                (*point, places.nearby(&query).await)
            })
            .collect();

        let results = join_all(futures).await;

        for (point, result) in results {
            searches += 1;
            match result {
                Ok(found) => {
                    trace!(%point, found = found.len(), "Nearby search complete");
                    pooled.extend(found);
                }
                Err(e) => {
                    failed += 1;
                    debug!(%point, error = %e, "Nearby search failed, using empty");
                }
            }
        }
    }

    let unique = dedup_by_id(pooled);
    let candidates = dedup_by_proximity(unique, config.proximity_threshold_deg);

    debug!(
        searches,
        failed,
        candidates = candidates.len(),
        "Discovery complete"
    );

    Some(Discovery {
        candidates,
        searches,
        failed,
    })
}

/// Keep the first occurrence of each place id.
pub fn dedup_by_id(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect()
}

/// Drop candidates within `threshold` degrees (on both axes) of an
/// earlier-accepted candidate.
///
/// Only accepted candidates count, so a chain of stations each slightly
/// offset from the last is not collapsed transitively through a dropped one.
pub fn dedup_by_proximity(candidates: Vec<Candidate>, threshold: f64) -> Vec<Candidate> {
    let mut accepted: Vec<Candidate> = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let duplicate = accepted
            .iter()
            .any(|kept| kept.location.within_degrees(&candidate.location, threshold));

        if duplicate {
            trace!(id = %candidate.id, "Dropping station close to an earlier one");
        } else {
            accepted.push(candidate);
        }
    }

    accepted
}
