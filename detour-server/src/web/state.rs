//! Application state for the web layer.

use std::sync::Arc;

use crate::engine::RouteDeviationEngine;
use crate::maps::MapsClient;

/// Engine wired to the maps web service for both capabilities.
pub type MapsEngine = RouteDeviationEngine<MapsClient, MapsClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Deviation engine, owning the station cache
    pub engine: Arc<MapsEngine>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: MapsEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }
}
