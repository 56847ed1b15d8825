//! HTTP router for tsqrest

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tsqrest_tsq::{routes, QueueClient, TsqState};

/// Service state for the main router
pub struct AppState {
    tsq: Arc<TsqState>,
    cors: bool,
}

impl AppState {
    pub fn new(client: Arc<dyn QueueClient>, strict_status: bool, cors: bool) -> Self {
        Self {
            tsq: Arc::new(TsqState::new(client).with_strict_status(strict_status)),
            cors,
        }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let tsq = state.tsq.clone();
    let cors = state.cors;
    let shared_state = Arc::new(state);

    let router = Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .with_state(shared_state)
        .merge(routes(tsq))
        .layer(TraceLayer::new_for_http());

    if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "running",
            "backend": state.tsq.client.backend_name(),
        })),
    )
}
