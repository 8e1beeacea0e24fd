//! Health check endpoint. Public, no authentication.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /api/health
///
/// Reports process liveness and database reachability.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let database = match state.db().ping().await {
        Ok(()) => "ok",
        Err(_) => "unreachable",
    };

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            HealthResponse {
                status: "ok",
                database,
            },
            "Service is healthy",
        )),
    )
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health))
}
