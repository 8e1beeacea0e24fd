//! # Topic Routes Module
//!
//! Defines and wires up routes for the `/api/topics` endpoint group.
//!
//! ## Structure
//! - `post.rs` — create a topic
//! - `get.rs` — list/fetch topics and per-topic stats
//! - `put.rs` — partial update, including reparenting
//! - `delete.rs` — the three deletion modes
//! - `common.rs` — request/response DTOs shared by the handlers

use axum::middleware::from_fn;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::auth::guards::allow_admin;
use crate::state::AppState;

pub mod common;
pub mod delete;
pub mod get;
pub mod post;
pub mod put;

/// Builds and returns the `/topics` route group.
///
/// Routes:
/// - `GET    /topics`                   → paginated, filtered listing
/// - `POST   /topics`                   → create a topic (admin only)
/// - `GET    /topics/{topic_id}`        → fetch one topic
/// - `GET    /topics/{topic_id}/stats`  → question count and median difficulty
/// - `PUT    /topics/{topic_id}`        → partial update (admin only)
/// - `DELETE /topics/{topic_id}`        → delete with `?mode=` (admin only)
pub fn topic_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_topics))
        .route("/", post(post::create_topic).route_layer(from_fn(allow_admin)))
        .route("/{topic_id}", get(get::get_topic))
        .route("/{topic_id}/stats", get(get::topic_stats))
        .route(
            "/{topic_id}",
            put(put::edit_topic).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{topic_id}",
            delete(delete::delete_topic).route_layer(from_fn(allow_admin)),
        )
}
