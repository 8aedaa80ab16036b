//! Route sampling.
//!
//! Picks evenly spaced points along the baseline path to anchor nearby
//! searches. Longer routes get more samples. Coverage is approximate: the
//! stride is derived from the path length, so the number of emitted points
//! can differ from the target count.

use crate::domain::LatLng;

/// Routes shorter than this get the fewest samples.
const SHORT_ROUTE_METERS: f64 = 5000.0;

/// Routes shorter than this (and at least `SHORT_ROUTE_METERS`) get a medium count.
const MEDIUM_ROUTE_METERS: f64 = 15000.0;

/// Target number of samples for a route of the given length.
pub fn sample_count(total_distance_meters: f64) -> usize {
    if total_distance_meters < SHORT_ROUTE_METERS {
        3
    } else if total_distance_meters < MEDIUM_ROUTE_METERS {
        5
    } else {
        7
    }
}

/// Sample points along `path`.
///
/// Emits `path[0]`, `path[step]`, `path[2 * step]`, ... where
/// `step = max(1, len / sample_count)`.
pub fn sample_route(path: &[LatLng], total_distance_meters: f64) -> Vec<LatLng> {
    let step = (path.len() / sample_count(total_distance_meters)).max(1);
    path.iter().step_by(step).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn path(n: usize) -> Vec<LatLng> {
        (0..n)
            .map(|i| LatLng::new(1.0 + i as f64 * 0.001, 101.0).unwrap())
            .collect()
    }

    #[test]
    fn count_tiers() {
        assert_eq!(sample_count(4000.0), 3);
        assert_eq!(sample_count(4999.9), 3);
        assert_eq!(sample_count(5000.0), 5);
        assert_eq!(sample_count(9000.0), 5);
        assert_eq!(sample_count(14999.0), 5);
        assert_eq!(sample_count(15000.0), 7);
        assert_eq!(sample_count(20000.0), 7);
    }

    #[test]
    fn empty_path_yields_nothing() {
        assert!(sample_route(&[], 20000.0).is_empty());
    }

    #[test]
    fn even_stride() {
        // 30 points, short route: step = 10 -> indices 0, 10, 20
        let p = path(30);
        let samples = sample_route(&p, 4000.0);
        assert_eq!(samples, vec![p[0], p[10], p[20]]);
    }

    #[test]
    fn remainder_emits_extra_point() {
        // 10 points, 3 samples: step = 3 -> indices 0, 3, 6, 9
        let p = path(10);
        let samples = sample_route(&p, 1000.0);
        assert_eq!(samples, vec![p[0], p[3], p[6], p[9]]);
    }

    #[test]
    fn short_path_emits_every_point() {
        // 4 points, 7 samples wanted: step clamps to 1
        let p = path(4);
        assert_eq!(sample_route(&p, 50000.0), p);
    }

    proptest! {
        #[test]
        fn samples_start_at_origin_and_come_from_path(
            n in 1usize..500,
            distance in 0.0f64..100_000.0,
        ) {
            let p = path(n);
            let samples = sample_route(&p, distance);

            prop_assert_eq!(samples[0], p[0]);
            prop_assert!(samples.len() <= n);
            // Never fewer than the target unless the path itself is shorter
            prop_assert!(samples.len() >= sample_count(distance).min(n));
        }
    }
}
