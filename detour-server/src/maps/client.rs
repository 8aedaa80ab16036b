//! Maps web service HTTP client.
//!
//! Provides async access to the Directions and Places Nearby Search
//! endpoints. Handles authentication, concurrency limiting, and conversion
//! to domain types.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::{Candidate, Route};
use crate::engine::{NearbyQuery, PlacesSearch, RouteRequest, RoutingService};

use super::convert::{convert_directions, convert_nearby};
use super::error::MapsError;
use super::types::{DirectionsResponse, NearbySearchResponse};

/// Default base URL for the maps web service.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// Directions and Places share one quota, so both go through one permit pool.
const DEFAULT_MAX_CONCURRENT: usize = 5;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the maps client.
///
/// The maps service authenticates with a plain API key in the query string
/// (`key=...`) rather than a header, so the key ends up in request URLs and
/// must not be logged with them.
#[derive(Debug, Clone)]
pub struct MapsConfig {
    pub api_key: String,
    /// Root under which `directions/json` and `place/nearbysearch/json` live
    pub base_url: String,
    /// In-flight request limit across routing and place search
    pub max_concurrent: usize,
    pub timeout_secs: u64,
}

impl MapsConfig {
    /// Production endpoints with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Point at a different host, e.g. a local stub of the maps API.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Zero is treated as one.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Maps web service client.
///
/// Implements both [`RoutingService`] and [`PlacesSearch`]. A semaphore
/// bounds the number of in-flight requests across all callers.
#[derive(Debug, Clone)]
pub struct MapsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl MapsClient {
    /// Create a new maps client with the given configuration.
    pub fn new(config: MapsConfig) -> Result<Self, MapsError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Fetch a route from the Directions endpoint.
    pub async fn directions(&self, request: &RouteRequest) -> Result<Route, MapsError> {
        let mut query = vec![
            ("origin", request.origin.to_string()),
            ("destination", request.destination.to_string()),
            ("mode", request.mode.as_str().to_string()),
        ];
        if !request.waypoints.is_empty() {
            let waypoints: Vec<String> = request.waypoints.iter().map(|w| w.to_string()).collect();
            query.push(("waypoints", waypoints.join("|")));
        }

        let response: DirectionsResponse = self.get_json("directions/json", &query).await?;
        convert_directions(response)
    }

    /// Search for places near a point.
    pub async fn nearby_search(&self, query: &NearbyQuery) -> Result<Vec<Candidate>, MapsError> {
        let mut params = vec![
            ("location", query.location.to_string()),
            ("radius", query.radius_meters.to_string()),
            ("type", query.category.clone()),
        ];
        if let Some(keyword) = &query.keyword {
            params.push(("keyword", keyword.clone()));
        }

        let response: NearbySearchResponse =
            self.get_json("place/nearbysearch/json", &params).await?;
        convert_nearby(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, MapsError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| MapsError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(MapsError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MapsError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapsError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| MapsError::Json {
            message: e.to_string(),
        })
    }
}

impl RoutingService for MapsClient {
    async fn route(&self, request: &RouteRequest) -> Result<Route, MapsError> {
        self.directions(request).await
    }
}

impl PlacesSearch for MapsClient {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Candidate>, MapsError> {
        self.nearby_search(query).await
    }
}
