use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use detour_server::cache::{CacheConfig, StationCache};
use detour_server::engine::{EngineConfig, RouteDeviationEngine};
use detour_server::maps::{MapsClient, MapsConfig};
use detour_server::web::{AppState, create_router};

const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let api_key = std::env::var("MAPS_API_KEY").unwrap_or_else(|_| {
        warn!("MAPS_API_KEY not set. API calls will fail.");
        String::new()
    });

    let addr: SocketAddr = std::env::var("DETOUR_BIND")
        .unwrap_or_else(|_| DEFAULT_BIND.to_string())
        .parse()
        .expect("DETOUR_BIND must be a socket address");

    // One client serves both routing and place search
    let maps = MapsClient::new(MapsConfig::new(api_key)).expect("Failed to create maps client");

    let engine_config = EngineConfig::default();
    let cache = StationCache::new(&CacheConfig::default());
    let engine = RouteDeviationEngine::new(maps.clone(), maps, engine_config, cache);

    let app = create_router(AppState::new(engine));

    info!(%addr, "Route deviation server listening");
    info!("  GET    /health           - Health check");
    info!("  POST   /deviations       - Deviation per stop");
    info!("  POST   /stations/nearby  - Discover stations on the way");
    info!("  GET    /stations         - Current discovery output");
    info!("  POST   /stations/clear   - Clear discovery output");
    info!("  DELETE /stations/cache   - Drop cached station lists");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
