//! Deviation of a detour relative to a baseline route.
//!
//! A deviation answers "how much does going via this waypoint cost?" It is
//! computed from two aggregate route costs and carries no I/O.

use serde::Serialize;

use super::route::RouteCost;

/// Percent thresholds separating deviation levels.
const MEDIUM_THRESHOLD_PERCENT: f64 = 10.0;
const HIGH_THRESHOLD_PERCENT: f64 = 25.0;

/// Extra cost of a detour over the baseline.
///
/// `extra_*` values are detour minus baseline and may be negative when the
/// detour happens to be shorter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Deviation {
    pub extra_distance: f64,
    pub extra_duration: f64,
    pub deviation_percent: f64,
    pub baseline_distance: f64,
    pub baseline_duration: f64,
    pub detour_distance: f64,
    pub detour_duration: f64,
}

impl Deviation {
    /// Compute the deviation of `detour` relative to `baseline`.
    ///
    /// `deviation_percent` is relative to the baseline distance, and is 0
    /// when the baseline distance is not positive.
    pub fn between(baseline: &RouteCost, detour: &RouteCost) -> Self {
        let extra_distance = detour.distance_meters - baseline.distance_meters;
        let extra_duration = detour.duration_seconds - baseline.duration_seconds;

        let deviation_percent = if baseline.distance_meters > 0.0 {
            extra_distance / baseline.distance_meters * 100.0
        } else {
            0.0
        };

        Self {
            extra_distance,
            extra_duration,
            deviation_percent,
            baseline_distance: baseline.distance_meters,
            baseline_duration: baseline.duration_seconds,
            detour_distance: detour.distance_meters,
            detour_duration: detour.duration_seconds,
        }
    }

    pub fn level(&self) -> DeviationLevel {
        DeviationLevel::classify(self.deviation_percent)
    }

    /// Signed summary, e.g. `+10.0% · +1.0 km · +1 min`.
    pub fn summary(&self) -> String {
        format!(
            "{}{:.1}% · {}{} · {}{}",
            sign(self.deviation_percent),
            self.deviation_percent.abs(),
            sign(self.extra_distance),
            format_distance(self.extra_distance.abs()),
            sign(self.extra_duration),
            format_duration(self.extra_duration.abs()),
        )
    }
}

/// Compute a deviation when both route costs are available.
///
/// Returns `None` if either cost is absent.
pub fn calculate_deviation(
    baseline: Option<&RouteCost>,
    detour: Option<&RouteCost>,
) -> Option<Deviation> {
    Some(Deviation::between(baseline?, detour?))
}

/// Coarse classification of a deviation percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviationLevel {
    /// Below 10%.
    Low,
    /// 10% up to, but excluding, 25%.
    Medium,
    /// 25% and above.
    High,
}

impl DeviationLevel {
    pub fn classify(percent: f64) -> Self {
        if percent < MEDIUM_THRESHOLD_PERCENT {
            DeviationLevel::Low
        } else if percent < HIGH_THRESHOLD_PERCENT {
            DeviationLevel::Medium
        } else {
            DeviationLevel::High
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DeviationLevel::Low => "On the way",
            DeviationLevel::Medium => "Slight detour",
            DeviationLevel::High => "Detour",
        }
    }
}

fn sign(value: f64) -> char {
    if value >= 0.0 { '+' } else { '-' }
}

/// Format a distance in meters: `1.2 km` from 1000m upwards, else `850 m`.
pub fn format_distance(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1} km", meters / 1000.0)
    } else {
        format!("{} m", meters.round())
    }
}

/// Format a duration in seconds as `1h 5m` or `12 min`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;

    if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes} min")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn slight_detour_scenario() {
        let baseline = RouteCost::new(10000.0, 600.0);
        let detour = RouteCost::new(11000.0, 660.0);

        let d = calculate_deviation(Some(&baseline), Some(&detour)).unwrap();
        assert_eq!(d.extra_distance, 1000.0);
        assert_eq!(d.extra_duration, 60.0);
        assert_eq!(d.deviation_percent, 10.0);
        assert_eq!(d.baseline_distance, 10000.0);
        assert_eq!(d.detour_duration, 660.0);

        assert_eq!(d.level(), DeviationLevel::Medium);
        assert_eq!(d.level().label(), "Slight detour");
    }

    #[test]
    fn missing_input_yields_none() {
        let cost = RouteCost::new(1.0, 1.0);
        assert!(calculate_deviation(None, Some(&cost)).is_none());
        assert!(calculate_deviation(Some(&cost), None).is_none());
        assert!(calculate_deviation(None, None).is_none());
    }

    #[test]
    fn zero_baseline_distance_has_zero_percent() {
        let baseline = RouteCost::new(0.0, 0.0);
        let detour = RouteCost::new(500.0, 40.0);

        let d = Deviation::between(&baseline, &detour);
        assert_eq!(d.deviation_percent, 0.0);
        assert_eq!(d.extra_distance, 500.0);
    }

    #[test]
    fn shorter_detour_is_negative() {
        let baseline = RouteCost::new(10000.0, 600.0);
        let detour = RouteCost::new(9500.0, 580.0);

        let d = Deviation::between(&baseline, &detour);
        assert_eq!(d.extra_distance, -500.0);
        assert_eq!(d.extra_duration, -20.0);
        assert_eq!(d.deviation_percent, -5.0);
        assert_eq!(d.level(), DeviationLevel::Low);
    }

    #[test]
    fn classification_boundaries() {
        assert_eq!(DeviationLevel::classify(9.999), DeviationLevel::Low);
        assert_eq!(DeviationLevel::classify(10.0), DeviationLevel::Medium);
        assert_eq!(DeviationLevel::classify(24.999), DeviationLevel::Medium);
        assert_eq!(DeviationLevel::classify(25.0), DeviationLevel::High);
    }

    #[test]
    fn labels() {
        assert_eq!(DeviationLevel::Low.label(), "On the way");
        assert_eq!(DeviationLevel::Medium.label(), "Slight detour");
        assert_eq!(DeviationLevel::High.label(), "Detour");
    }

    #[test]
    fn distance_formatting() {
        assert_eq!(format_distance(999.4), "999 m");
        assert_eq!(format_distance(1000.0), "1.0 km");
        assert_eq!(format_distance(12345.0), "12.3 km");
        assert_eq!(format_distance(0.0), "0 m");
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(59.0), "0 min");
        assert_eq!(format_duration(60.0), "1 min");
        assert_eq!(format_duration(3599.0), "59 min");
        assert_eq!(format_duration(3900.0), "1h 5m");
    }

    #[test]
    fn summary_signs() {
        let d = Deviation::between(
            &RouteCost::new(10000.0, 600.0),
            &RouteCost::new(11000.0, 660.0),
        );
        assert_eq!(d.summary(), "+10.0% · +1.0 km · +1 min");

        let d = Deviation::between(
            &RouteCost::new(10000.0, 600.0),
            &RouteCost::new(9800.0, 480.0),
        );
        assert_eq!(d.summary(), "-2.0% · -200 m · -2 min");
    }

    proptest! {
        #[test]
        fn percent_matches_formula(
            baseline in 1.0f64..1_000_000.0,
            detour in 0.0f64..2_000_000.0,
        ) {
            let d = Deviation::between(
                &RouteCost::new(baseline, 0.0),
                &RouteCost::new(detour, 0.0),
            );
            let expected = (detour - baseline) / baseline * 100.0;
            prop_assert!((d.deviation_percent - expected).abs() <= 1e-9 * expected.abs().max(1.0));
            prop_assert_eq!(d.extra_distance, detour - baseline);
        }

        #[test]
        fn extra_is_detour_minus_baseline(
            bd in 0.0f64..1e6, bt in 0.0f64..1e5,
            dd in 0.0f64..1e6, dt in 0.0f64..1e5,
        ) {
            let d = Deviation::between(&RouteCost::new(bd, bt), &RouteCost::new(dd, dt));
            prop_assert_eq!(d.extra_distance, dd - bd);
            prop_assert_eq!(d.extra_duration, dt - bt);
        }
    }
}
