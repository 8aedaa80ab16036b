//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tracing::warn;

use crate::engine::EngineError;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/deviations", post(compute_deviations))
        .route("/stations", get(current_stations))
        .route("/stations/nearby", post(find_nearby_stations))
        .route("/stations/clear", post(clear_stations))
        .route("/stations/cache", delete(invalidate_station_cache))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Compute the baseline, per-stop deviations and the combined route.
async fn compute_deviations(
    State(state): State<AppState>,
    Json(req): Json<DeviationsRequest>,
) -> Result<Json<DeviationsResponse>, AppError> {
    let start = req.start.to_location("start").map_err(AppError::bad_request)?;
    let end = req.end.to_location("end").map_err(AppError::bad_request)?;
    let mut stops = req
        .stops
        .iter()
        .map(StopInput::to_stop)
        .collect::<Result<Vec<_>, _>>()
        .map_err(AppError::bad_request)?;
    for place_id in &req.stations {
        let stop = state
            .engine
            .station_as_stop(place_id)
            .await
            .ok_or_else(|| AppError::bad_request(format!("unknown station {place_id}")))?;
        stops.push(stop);
    }

    let report = state
        .engine
        .compute_all_deviations(&start, &end, &stops)
        .await?;

    Ok(Json(DeviationsResponse::from_report(&report)))
}

/// Discover and rank stations along the direct route.
async fn find_nearby_stations(
    State(state): State<AppState>,
    Json(req): Json<NearbyStationsRequest>,
) -> Result<Json<StationsResponse>, AppError> {
    let start = req.start.to_location("start").map_err(AppError::bad_request)?;
    let end = req.end.to_location("end").map_err(AppError::bad_request)?;

    let stations = state.engine.nearby_stations(&start, &end).await?;

    Ok(Json(StationsResponse::done(&stations)))
}

/// Currently visible discovery output.
async fn current_stations(State(state): State<AppState>) -> Json<StationsResponse> {
    let status = state.engine.status().await;
    let cached = state.engine.cache().entry_count();
    Json(StationsResponse::from_status(&status).with_cached_routes(cached))
}

/// Clear visible discovery output. The cache is kept.
async fn clear_stations(State(state): State<AppState>) -> StatusCode {
    state.engine.clear_stations().await;
    StatusCode::NO_CONTENT
}

/// Drop every cached station list.
async fn invalidate_station_cache(State(state): State<AppState>) -> StatusCode {
    state.engine.cache().invalidate_all();
    StatusCode::NO_CONTENT
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    Conflict { message: String },
    Upstream { message: String },
}

impl AppError {
    fn bad_request(message: String) -> Self {
        AppError::BadRequest { message }
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Cancelled => AppError::Conflict {
                message: e.to_string(),
            },
            EngineError::BaselineUnavailable(_) => AppError::Upstream {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::Upstream { message } => (StatusCode::BAD_GATEWAY, message),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
