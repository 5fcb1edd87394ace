pub mod cors;
pub mod format;
pub mod notify;
pub mod registry;
pub mod state;
pub mod webhook;

use axum::{
    Json, Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use relay_types::api::StatusResponse;

use crate::state::AppState;

/// All routes of the relay, with CORS and request tracing applied.
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/notify-order", post(notify::notify_order))
        .route("/line/webhook", post(webhook::line_webhook))
        .route("/line/users", get(webhook::list_users))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse::ok())
}
