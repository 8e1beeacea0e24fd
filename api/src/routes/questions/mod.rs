//! # Question Routes Module
//!
//! Defines and wires up routes for the `/api/questions` endpoint group:
//! the question bank, per-question options, and submissions.

use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::auth::guards::allow_admin;
use crate::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;

/// Builds and returns the `/questions` route group.
///
/// Routes:
/// - `GET    /questions`                              → filtered listing
/// - `POST   /questions`                              → create (admin only)
/// - `GET    /questions/{question_id}`                → fetch with options
/// - `DELETE /questions/{question_id}`                → archive (admin only)
/// - `POST   /questions/{question_id}/options`        → add an option (admin only)
/// - `POST   /questions/{question_id}/submissions`    → submit an answer
/// - `GET    /questions/{question_id}/submissions`    → own submissions (all for admins)
pub fn question_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_questions))
        .route(
            "/",
            post(post::create_question).route_layer(from_fn(allow_admin)),
        )
        .route("/{question_id}", get(get::get_question))
        .route(
            "/{question_id}",
            delete(delete::delete_question).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{question_id}/options",
            post(post::create_option).route_layer(from_fn(allow_admin)),
        )
        .route("/{question_id}/submissions", post(post::submit_answer))
        .route("/{question_id}/submissions", get(get::list_submissions))
}
