//! Deviation ranking for discovered stations.
//!
//! Each candidate is costed by routing start → candidate → end and comparing
//! against the baseline. Candidates whose detour cannot be routed are left
//! out. Survivors are ordered by extra travel time, shortest first.

use futures::future::join_all;
use tracing::{debug, trace};

use crate::domain::{Candidate, Deviation, LatLng, RankedCandidate, RouteCost, TravelMode};
use crate::maps::MapsError;

use super::config::EngineConfig;
use super::generation::GenerationToken;
use super::services::{RouteRequest, RoutingService};

/// Start, end and baseline cost shared by every detour in one computation.
#[derive(Debug, Clone, Copy)]
pub struct DetourContext {
    pub start: LatLng,
    pub end: LatLng,
    pub baseline: RouteCost,
    pub mode: TravelMode,
}

impl DetourContext {
    /// Deviation of routing through `waypoint` instead of going direct.
    pub async fn deviation_via<R: RoutingService>(
        &self,
        routing: &R,
        waypoint: LatLng,
    ) -> Result<Deviation, MapsError> {
        let request = RouteRequest::via(self.start, self.end, waypoint, self.mode);
        let detour = routing.route(&request).await?;
        Ok(Deviation::between(&self.baseline, &detour.cost))
    }
}

/// Compute a deviation for every candidate and return the best ones.
///
/// Detours are requested in batches of `config.batch_size`. Returns `None`
/// if `token` goes stale between batches.
pub async fn rank_candidates<R: RoutingService>(
    routing: &R,
    context: &DetourContext,
    candidates: Vec<Candidate>,
    config: &EngineConfig,
    token: &GenerationToken,
) -> Option<Vec<RankedCandidate>> {
    let mut ranked = Vec::with_capacity(candidates.len());

    for batch in candidates.chunks(config.fan_out()) {
        if !token.is_current() {
            debug!(ranked = ranked.len(), "Ranking abandoned: generation is stale");
            return None;
        }

        let futures: Vec<_> = batch
            .iter()
            .map(|candidate| async move {
                let result = context.deviation_via(routing, candidate.location).await;
                (candidate, result)
            })
            .collect();

        for (candidate, result) in join_all(futures).await {
            match result {
                Ok(deviation) => {
                    trace!(
                        id = %candidate.id,
                        extra_secs = deviation.extra_duration,
                        "Station detour computed"
                    );
                    ranked.push(RankedCandidate {
                        candidate: candidate.clone(),
                        deviation,
                    });
                }
                Err(e) => {
                    debug!(id = %candidate.id, error = %e, "Station detour failed, excluding");
                }
            }
        }
    }

    Some(top_by_extra_duration(ranked, config.max_results))
}

/// Sort by extra duration (shortest first) and keep the first `limit`.
///
/// The sort is stable, so equal durations keep their discovery order.
pub fn top_by_extra_duration(
    mut ranked: Vec<RankedCandidate>,
    limit: usize,
) -> Vec<RankedCandidate> {
    ranked.sort_by(|a, b| {
        a.deviation
            .extra_duration
            .total_cmp(&b.deviation.extra_duration)
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlaceId, Route};
    use crate::engine::generation::Generation;
    use std::sync::Mutex;

    fn at(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn station(id: &str, lat: f64) -> Candidate {
        Candidate {
            id: PlaceId::new(id),
            name: format!("Station {id}"),
            location: at(lat, 101.0),
            vicinity: None,
        }
    }

    fn ranked(id: &str, extra_duration: f64) -> RankedCandidate {
        let baseline = RouteCost::new(10000.0, 600.0);
        let detour = RouteCost::new(10500.0, 600.0 + extra_duration);
        RankedCandidate {
            candidate: station(id, 1.0),
            deviation: Deviation::between(&baseline, &detour),
        }
    }

    fn extras(ranked: &[RankedCandidate]) -> Vec<f64> {
        ranked.iter().map(|r| r.deviation.extra_duration).collect()
    }

    /// Routes through a waypoint cost 600s plus the waypoint latitude in
    /// whole seconds; latitude 9.0 fails.
    struct FakeRouting {
        calls: Mutex<usize>,
    }

    impl RoutingService for FakeRouting {
        async fn route(&self, request: &RouteRequest) -> Result<Route, MapsError> {
            *self.calls.lock().unwrap() += 1;
            let waypoint = request.waypoints[0];
            if waypoint.lat() == 9.0 {
                return Err(MapsError::NoRoute);
            }
            Ok(Route::from_legs(
                vec![RouteCost::new(10000.0, 600.0 + waypoint.lat())],
                vec![],
            ))
        }
    }

    #[test]
    fn ranks_by_extra_duration_and_truncates() {
        let input = vec![
            ranked("a", 120.0),
            ranked("b", 30.0),
            ranked("c", 90.0),
            ranked("d", 45.0),
        ];

        let top = top_by_extra_duration(input, 3);
        assert_eq!(extras(&top), vec![30.0, 45.0, 90.0]);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let input = vec![ranked("a", 60.0), ranked("b", 30.0), ranked("c", 60.0)];

        let top = top_by_extra_duration(input, 3);
        let ids: Vec<_> = top.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn negative_extra_sorts_first() {
        let top = top_by_extra_duration(vec![ranked("a", 10.0), ranked("b", -20.0)], 3);
        assert_eq!(extras(&top), vec![-20.0, 10.0]);
    }

    #[tokio::test]
    async fn failed_detours_are_excluded() {
        let routing = FakeRouting {
            calls: Mutex::new(0),
        };
        let context = DetourContext {
            start: at(0.0, 100.0),
            end: at(0.0, 102.0),
            baseline: RouteCost::new(10000.0, 600.0),
            mode: TravelMode::Driving,
        };
        let generation = Generation::new();
        let token = generation.token();

        let candidates = vec![
            station("slow", 40.0),
            station("broken", 9.0),
            station("fast", 5.0),
            station("mid", 20.0),
            station("slowest", 80.0),
        ];

        let top = rank_candidates(
            &routing,
            &context,
            candidates,
            &EngineConfig::default().with_batch_size(2),
            &token,
        )
        .await
        .unwrap();

        let ids: Vec<_> = top.iter().map(|r| r.candidate.id.as_str()).collect();
        assert_eq!(ids, vec!["fast", "mid", "slow"]);
        assert_eq!(extras(&top), vec![5.0, 20.0, 40.0]);
        assert_eq!(*routing.calls.lock().unwrap(), 5);
    }
}
