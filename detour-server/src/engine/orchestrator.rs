//! Route deviation engine.
//!
//! Orchestrates the baseline route, per-stop deviations, the combined route
//! through all stops, and cached station discovery. This is the single entry
//! point the HTTP layer talks to.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, trace, warn};

use crate::cache::{CacheKey, StationCache, StationList};
use crate::domain::{Deviation, LatLng, Location, Route, Stop};
use crate::maps::MapsError;

use super::config::EngineConfig;
use super::discovery::discover_stations;
use super::generation::{Generation, GenerationToken};
use super::rank::{DetourContext, rank_candidates};
use super::sample::sample_route;
use super::services::{PlacesSearch, RouteRequest, RoutingService};

/// Error from the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The direct route could not be fetched; nothing downstream is meaningful.
    #[error("baseline route unavailable: {0}")]
    BaselineUnavailable(#[source] MapsError),

    /// The visible output was cleared while this discovery was running.
    #[error("station discovery was cancelled")]
    Cancelled,
}

/// Result of computing deviations for a set of stops.
#[derive(Debug, Clone)]
pub struct DeviationReport {
    /// Direct route from start to end.
    pub baseline: Route,

    /// Deviation per stop id, for stops whose detour could be routed.
    pub deviations: BTreeMap<String, Deviation>,

    /// Route through every resolved stop in the given order, if any stop is
    /// resolved and the route could be fetched.
    pub combined: Option<Route>,
}

/// Progress of the latest discovery invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum DiscoveryPhase {
    Idle,
    Sampling,
    Searching { points: usize },
    Ranking { candidates: usize },
    Done,
    CachedReturn,
}

impl DiscoveryPhase {
    pub fn is_loading(&self) -> bool {
        matches!(
            self,
            DiscoveryPhase::Sampling
                | DiscoveryPhase::Searching { .. }
                | DiscoveryPhase::Ranking { .. }
        )
    }
}

/// Visible discovery output.
#[derive(Debug, Clone)]
pub struct DiscoveryStatus {
    pub phase: DiscoveryPhase,
    pub stations: StationList,
}

impl Default for DiscoveryStatus {
    fn default() -> Self {
        Self {
            phase: DiscoveryPhase::Idle,
            stations: Arc::new(Vec::new()),
        }
    }
}

/// Deviation engine over a routing and a places capability.
pub struct RouteDeviationEngine<R, P> {
    routing: R,
    places: P,
    config: EngineConfig,
    cache: StationCache,
    generation: Generation,
    status: RwLock<DiscoveryStatus>,
}

impl<R: RoutingService, P: PlacesSearch> RouteDeviationEngine<R, P> {
    /// Create an engine from ready capabilities.
    pub fn new(routing: R, places: P, config: EngineConfig, cache: StationCache) -> Self {
        Self {
            routing,
            places,
            config,
            cache,
            generation: Generation::new(),
            status: RwLock::new(DiscoveryStatus::default()),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &StationCache {
        &self.cache
    }

    /// Fetch the direct route between start and end.
    pub async fn baseline_route(
        &self,
        start: &Location,
        end: &Location,
    ) -> Result<Route, EngineError> {
        let request = RouteRequest::direct(start.coords, end.coords, self.config.travel_mode);
        self.routing
            .route(&request)
            .await
            .map_err(EngineError::BaselineUnavailable)
    }

    /// Compute the baseline, a deviation per resolved stop, and the combined
    /// route through all resolved stops.
    ///
    /// Only a failed baseline is an error. Stops without coordinates and stops
    /// whose detour fails are left out of the map.
    pub async fn compute_all_deviations(
        &self,
        start: &Location,
        end: &Location,
        stops: &[Stop],
    ) -> Result<DeviationReport, EngineError> {
        let baseline = self.baseline_route(start, end).await?;

        let resolved: Vec<(&str, LatLng)> = stops
            .iter()
            .filter_map(|s| s.location.map(|loc| (s.id.as_str(), loc)))
            .collect();

        let context = DetourContext {
            start: start.coords,
            end: end.coords,
            baseline: baseline.cost,
            mode: self.config.travel_mode,
        };

        let mut deviations = BTreeMap::new();
        for batch in resolved.chunks(self.config.fan_out()) {
            let futures: Vec<_> = batch
                .iter()
                .map(|(id, waypoint)| {
                    let context = &context;
                    async move { (*id, context.deviation_via(&self.routing, *waypoint).await) }
                })
                .collect();

            for (id, result) in join_all(futures).await {
                match result {
                    Ok(deviation) => {
                        deviations.insert(id.to_string(), deviation);
                    }
                    Err(e) => {
                        debug!(stop = id, error = %e, "Stop detour failed, omitting");
                    }
                }
            }
        }

        let combined = if resolved.is_empty() {
            None
        } else {
            let request = RouteRequest {
                origin: start.coords,
                destination: end.coords,
                waypoints: resolved.iter().map(|(_, loc)| *loc).collect(),
                mode: self.config.travel_mode,
            };
            match self.routing.route(&request).await {
                Ok(route) => Some(route),
                Err(e) => {
                    warn!(stops = resolved.len(), error = %e, "Combined route failed");
                    None
                }
            }
        };

        debug!(
            stops = stops.len(),
            resolved = resolved.len(),
            deviations = deviations.len(),
            "Deviations computed"
        );

        Ok(DeviationReport {
            baseline,
            deviations,
            combined,
        })
    }

    /// Find the best stations near the baseline route.
    ///
    /// A cached list for the same start/end is returned without any external
    /// call, even if other context (such as the stop set) has changed since
    /// it was computed. On a miss, samples the baseline path, searches near
    /// each sample, ranks the unique stations and caches the top list.
    pub async fn find_nearby_stations(
        &self,
        start: &Location,
        end: &Location,
        baseline: &Route,
    ) -> Result<StationList, EngineError> {
        let key = CacheKey::for_endpoints(&start.coords, &end.coords);
        if let Some(stations) = self.cached_return(&key).await {
            return Ok(stations);
        }

        let token = self.generation.token();
        info!(key = %key, generation = token.value(), "Discovering stations");

        self.set_phase(&token, DiscoveryPhase::Sampling).await?;
        let points = sample_route(&baseline.path, baseline.distance_meters());

        self.set_phase(
            &token,
            DiscoveryPhase::Searching {
                points: points.len(),
            },
        )
        .await?;
        let discovery = discover_stations(&self.places, &points, &self.config, &token)
            .await
            .ok_or(EngineError::Cancelled)?;

        self.set_phase(
            &token,
            DiscoveryPhase::Ranking {
                candidates: discovery.candidates.len(),
            },
        )
        .await?;
        let context = DetourContext {
            start: start.coords,
            end: end.coords,
            baseline: baseline.cost,
            mode: self.config.travel_mode,
        };
        let ranked = rank_candidates(
            &self.routing,
            &context,
            discovery.candidates,
            &self.config,
            &token,
        )
        .await
        .ok_or(EngineError::Cancelled)?;

        self.publish(&token, key, Arc::new(ranked)).await
    }

    /// Like [`find_nearby_stations`](Self::find_nearby_stations), but fetches
    /// the baseline route itself, and only on a cache miss.
    pub async fn nearby_stations(
        &self,
        start: &Location,
        end: &Location,
    ) -> Result<StationList, EngineError> {
        let key = CacheKey::for_endpoints(&start.coords, &end.coords);
        if let Some(stations) = self.cached_return(&key).await {
            return Ok(stations);
        }

        let baseline = self.baseline_route(start, end).await?;
        self.find_nearby_stations(start, end, &baseline).await
    }

    /// Reset the visible discovery output and abandon in-flight discovery.
    ///
    /// The cache is left untouched.
    pub async fn clear_stations(&self) {
        let mut status = self.status.write().await;
        self.generation.bump();
        *status = DiscoveryStatus::default();
        debug!(generation = self.generation.current(), "Stations cleared");
    }

    /// Current visible discovery output.
    pub async fn status(&self) -> DiscoveryStatus {
        self.status.read().await.clone()
    }

    /// Turn a currently visible station into a manual stop.
    ///
    /// The stop takes the place id as its id. Returns `None` if no visible
    /// station has that id, including after a clear.
    pub async fn station_as_stop(&self, place_id: &str) -> Option<Stop> {
        let status = self.status.read().await;
        status
            .stations
            .iter()
            .find(|ranked| ranked.candidate.id.as_str() == place_id)
            .map(|ranked| Stop::from_candidate(place_id, &ranked.candidate))
    }

    async fn cached_return(&self, key: &CacheKey) -> Option<StationList> {
        let stations = self.cache.get(key).await?;
        trace!(key = %key, "Station cache hit");

        *self.status.write().await = DiscoveryStatus {
            phase: DiscoveryPhase::CachedReturn,
            stations: Arc::clone(&stations),
        };
        Some(stations)
    }

    async fn set_phase(
        &self,
        token: &GenerationToken,
        phase: DiscoveryPhase,
    ) -> Result<(), EngineError> {
        let mut status = self.status.write().await;
        if !token.is_current() {
            return Err(EngineError::Cancelled);
        }
        trace!(generation = token.value(), ?phase, "Discovery phase");
        status.phase = phase;
        Ok(())
    }

    /// Write the result to the cache and the visible status, if still current.
    ///
    /// Both writes happen under the status lock so a concurrent clear either
    /// sees them and overwrites the status, or makes this token stale first.
    async fn publish(
        &self,
        token: &GenerationToken,
        key: CacheKey,
        ranked: StationList,
    ) -> Result<StationList, EngineError> {
        let mut status = self.status.write().await;
        if !token.is_current() {
            debug!(generation = token.value(), "Discarding stale discovery result");
            return Err(EngineError::Cancelled);
        }

        let stored = self.cache.insert_if_absent(key, ranked).await;
        *status = DiscoveryStatus {
            phase: DiscoveryPhase::Done,
            stations: Arc::clone(&stored),
        };

        debug!(stations = stored.len(), "Discovery published");
        Ok(stored)
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
