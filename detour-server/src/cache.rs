//! Cache of ranked nearby stations.
//!
//! Key schema: `"{start.lat},{start.lng}-{end.lat},{end.lng}"` using the raw
//! coordinates (shortest round-trip float formatting). Only the endpoints
//! are part of the key: the manual stop set, travel mode and engine config
//! are not, so a hit can return a list computed in a different context.
//!
//! Entries are written once per key (first writer wins) and by default live
//! for the process lifetime. A TTL or capacity bound can be configured as an
//! explicit invalidation policy; clearing the visible discovery output never
//! touches the cache.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;

use crate::domain::{LatLng, RankedCandidate};

/// Cached ranked station list.
pub type StationList = Arc<Vec<RankedCandidate>>;

/// Cache key built from the start and end coordinates.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn for_endpoints(start: &LatLng, end: &LatLng) -> Self {
        Self(format!("{start}-{end}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration for the cache.
#[derive(Debug, Clone, Default)]
pub struct CacheConfig {
    /// TTL for cached entries. `None` keeps entries for the process lifetime.
    pub ttl: Option<Duration>,

    /// Maximum number of cached entries. `None` is unbounded.
    pub max_capacity: Option<u64>,
}

impl CacheConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_max_capacity(mut self, n: u64) -> Self {
        self.max_capacity = Some(n);
        self
    }
}

/// Append-only cache of ranked station lists, safe for concurrent use.
#[derive(Clone)]
pub struct StationCache {
    entries: MokaCache<CacheKey, StationList>,
}

impl StationCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let mut builder = MokaCache::builder();
        if let Some(ttl) = config.ttl {
            builder = builder.time_to_live(ttl);
        }
        if let Some(capacity) = config.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        Self {
            entries: builder.build(),
        }
    }

    /// Get a cached station list.
    pub async fn get(&self, key: &CacheKey) -> Option<StationList> {
        self.entries.get(key).await
    }

    /// Insert unless the key is already present.
    ///
    /// Returns the list now stored under the key, which is the earlier
    /// writer's list if one raced ahead.
    pub async fn insert_if_absent(&self, key: CacheKey, list: StationList) -> StationList {
        self.entries.entry(key).or_insert(list).await.into_value()
    }

    /// Number of start/end pairs with a cached list.
    ///
    /// Approximate: writes still pending in the cache's maintenance queue
    /// may not be counted yet.
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candidate, Deviation, PlaceId, RouteCost};

    fn at(lat: f64, lng: f64) -> LatLng {
        LatLng::new(lat, lng).unwrap()
    }

    fn list(id: &str) -> StationList {
        Arc::new(vec![RankedCandidate {
            candidate: Candidate {
                id: PlaceId::new(id),
                name: id.to_string(),
                location: at(1.0, 101.0),
                vicinity: None,
            },
            deviation: Deviation::between(
                &RouteCost::new(1000.0, 60.0),
                &RouteCost::new(1100.0, 90.0),
            ),
        }])
    }

    #[test]
    fn key_uses_raw_coordinates() {
        let key = CacheKey::for_endpoints(&at(3.139, 101.6869), &at(3.0738, 101.5183));
        assert_eq!(key.as_str(), "3.139,101.6869-3.0738,101.5183");
    }

    #[test]
    fn key_distinguishes_direction() {
        let a = at(1.0, 101.0);
        let b = at(2.0, 102.0);
        assert_ne!(CacheKey::for_endpoints(&a, &b), CacheKey::for_endpoints(&b, &a));
    }

    #[test]
    fn default_config_never_evicts() {
        let config = CacheConfig::default();
        assert!(config.ttl.is_none());
        assert!(config.max_capacity.is_none());
    }

    #[tokio::test]
    async fn first_writer_wins() {
        let cache = StationCache::new(&CacheConfig::default());
        let key = CacheKey::for_endpoints(&at(1.0, 101.0), &at(2.0, 102.0));

        let stored = cache.insert_if_absent(key.clone(), list("first")).await;
        assert_eq!(stored[0].candidate.id.as_str(), "first");

        let stored = cache.insert_if_absent(key.clone(), list("second")).await;
        assert_eq!(stored[0].candidate.id.as_str(), "first");

        let cached = cache.get(&key).await.unwrap();
        assert_eq!(cached[0].candidate.id.as_str(), "first");
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = StationCache::new(&CacheConfig::default());
        let key = CacheKey::for_endpoints(&at(1.0, 101.0), &at(2.0, 102.0));

        assert!(cache.get(&key).await.is_none());
        cache.insert_if_absent(key.clone(), Arc::new(Vec::new())).await;
        assert!(cache.get(&key).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn entry_count_tracks_distinct_routes() {
        let cache = StationCache::new(&CacheConfig::default());
        let a = CacheKey::for_endpoints(&at(1.0, 101.0), &at(2.0, 102.0));
        let b = CacheKey::for_endpoints(&at(2.0, 102.0), &at(1.0, 101.0));

        cache.insert_if_absent(a.clone(), list("x")).await;
        cache.insert_if_absent(a, list("y")).await;
        cache.insert_if_absent(b, list("z")).await;
        cache.entries.run_pending_tasks().await;

        assert_eq!(cache.entry_count(), 2);
    }

    #[tokio::test]
    async fn invalidate_all_clears() {
        let cache = StationCache::new(&CacheConfig::default());
        let key = CacheKey::for_endpoints(&at(1.0, 101.0), &at(2.0, 102.0));
        cache.insert_if_absent(key.clone(), list("x")).await;

        cache.invalidate_all();
        assert!(cache.get(&key).await.is_none());
    }
}
