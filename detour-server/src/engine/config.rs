//! Configuration for the deviation engine.

use crate::domain::TravelMode;

/// Configuration parameters for deviation computation and station discovery.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Nearby-search radius around each sample point (meters).
    pub search_radius_meters: f64,

    /// Place category searched for.
    pub station_category: String,

    /// Optional keyword narrowing the search.
    pub station_keyword: Option<String>,

    /// Number of ranked stations kept.
    pub max_results: usize,

    /// Maximum number of external calls in flight per fan-out.
    /// 1 gives strictly sequential, input-ordered behaviour.
    pub batch_size: usize,

    /// Degree box within which two stations are considered the same place.
    pub proximity_threshold_deg: f64,

    /// Travel mode for every route request.
    pub travel_mode: TravelMode,
}

impl EngineConfig {
    /// Set the fan-out concurrency limit.
    pub fn with_batch_size(mut self, n: usize) -> Self {
        self.batch_size = n;
        self
    }

    /// Set the number of ranked stations kept.
    pub fn with_max_results(mut self, n: usize) -> Self {
        self.max_results = n;
        self
    }

    pub fn with_travel_mode(mut self, mode: TravelMode) -> Self {
        self.travel_mode = mode;
        self
    }

    /// Batch size clamped to at least one.
    pub(crate) fn fan_out(&self) -> usize {
        self.batch_size.max(1)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: 1500.0,
            station_category: "transit_station".to_string(),
            station_keyword: Some("LRT MRT train station".to_string()),
            max_results: 3,
            batch_size: 4,
            proximity_threshold_deg: 0.001,
            travel_mode: TravelMode::Driving,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = EngineConfig::default();

        assert_eq!(config.search_radius_meters, 1500.0);
        assert_eq!(config.station_category, "transit_station");
        assert_eq!(
            config.station_keyword.as_deref(),
            Some("LRT MRT train station")
        );
        assert_eq!(config.max_results, 3);
        assert_eq!(config.batch_size, 4);
        assert_eq!(config.proximity_threshold_deg, 0.001);
        assert_eq!(config.travel_mode, TravelMode::Driving);
    }

    #[test]
    fn builder() {
        let config = EngineConfig::default()
            .with_batch_size(0)
            .with_max_results(5)
            .with_travel_mode(TravelMode::Walking);

        assert_eq!(config.fan_out(), 1);
        assert_eq!(config.max_results, 5);
        assert_eq!(config.travel_mode, TravelMode::Walking);
    }
}
