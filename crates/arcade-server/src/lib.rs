pub mod api;
pub mod auth;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod game_registry;
pub mod health;
pub mod instance_manager;
pub mod scorecard_manager;
pub mod state;

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

use config::ServerConfig;
use game_registry::GameRegistry;
use state::AppState;

/// Build the Axum router and application state from a config, registering
/// every compiled-in game.
pub fn build_app(config: ServerConfig) -> (Router<()>, AppState) {
    router(AppState::new(config))
}

/// Build the router over an explicit game registry.
pub fn build_app_with_registry(
    config: ServerConfig,
    registry: GameRegistry,
) -> (Router<()>, AppState) {
    router(AppState::with_registry(config, registry))
}

fn router(state: AppState) -> (Router<()>, AppState) {
    let web_root = state.config.web_root.clone();
    let request_timeout = state.config.limits.request_timeout();

    // API routes (behind API key middleware)
    let api_routes = Router::new()
        .route("/games", get(api::list_games))
        .route("/scorecard/open", post(api::open_scorecard))
        .route("/scorecard/close", post(api::close_scorecard))
        .route("/scorecard/{card_id}", get(api::get_scorecard))
        .route(
            "/scorecard/{card_id}/{game_id}",
            get(api::get_scorecard_for_game),
        )
        .route("/cmd/{command}", post(api::command))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_layer,
        ));

    let app = Router::new()
        .route("/", get(health::service_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(&web_root))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(CorsLayer::permissive())
        .with_state(state.clone());

    (app, state)
}

/// Middleware wrapper that injects AuthConfig into request extensions for the
/// API key middleware.
async fn api_key_layer(
    axum::extract::State(state): axum::extract::State<AppState>,
    mut request: axum::extract::Request,
    next: middleware::Next,
) -> Result<axum::response::Response, error::AppError> {
    request.extensions_mut().insert(state.auth.clone());
    auth::api_key_middleware(request.headers().clone(), request, next).await
}
