use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Structured health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub games: usize,
    pub instances: usize,
    pub scorecards: usize,
}

/// Service description served at `/`.
#[derive(Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub endpoints: Vec<&'static str>,
}

pub async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            "GET /api/games",
            "POST /api/scorecard/open",
            "POST /api/scorecard/close",
            "GET /api/scorecard/{card_id}",
            "GET /api/scorecard/{card_id}/{game_id}",
            "POST /api/cmd/{command}",
            "GET /health",
            "GET /ready",
        ],
    })
}

/// Health endpoint with registry and table sizes.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        games: state.registry.available_games(),
        instances: state.instances.count().await,
        scorecards: state.scorecards.count().await,
    })
}

/// Readiness check: ready once at least one game is registered.
pub async fn readiness_check(State(state): State<AppState>) -> &'static str {
    if state.registry.available_games() == 0 {
        return "not ready: no games registered";
    }
    "ready"
}
