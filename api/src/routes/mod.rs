//! HTTP route entry point for `/api/...`.
//!
//! Route groups are organized by domain, each wired up in its own module:
//! - `/health` → liveness probe (public)
//! - `/topics` → the shared topic taxonomy
//! - `/groups` → classrooms, membership and nested activities/items
//! - `/questions` → question bank, options and submissions
//! - `/video-lessons`, `/handouts`, `/exercise-lists`, `/simulated-exams` → content library
//! - `/submissions` → grade write-back
//! - `/users` → user listing (admin only)
//!
//! Everything except `/health` sits behind `allow_authenticated`; mutating
//! routes additionally carry `allow_admin` per route.

use axum::{Router, middleware::from_fn};

use crate::auth::guards::{allow_admin, allow_authenticated};
use crate::state::AppState;

pub mod common;
pub mod groups;
pub mod health;
pub mod library;
pub mod questions;
pub mod submissions;
pub mod topics;
pub mod users;

/// Builds the complete application router for all HTTP endpoints.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health::health_routes())
        .nest(
            "/topics",
            topics::topic_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/groups",
            groups::group_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/questions",
            questions::question_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/video-lessons",
            library::video_lesson_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/handouts",
            library::handout_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/exercise-lists",
            library::exercise_list_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/simulated-exams",
            library::simulated_exam_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest(
            "/submissions",
            submissions::submission_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/users", users::user_routes().route_layer(from_fn(allow_admin)))
        .with_state(app_state)
}
