//! # Group Routes Module
//!
//! Defines and wires up routes for the `/api/groups` endpoint group,
//! including membership and the nested activity/item routes.

use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use axum::Router;

use crate::auth::guards::allow_admin;
use crate::state::AppState;

pub mod activities;
pub mod common;
pub mod delete;
pub mod get;
pub mod post;

/// Builds and returns the `/groups` route group.
///
/// Routes:
/// - `GET    /groups`                     → list groups
/// - `POST   /groups`                     → create a group (admin only)
/// - `GET    /groups/{group_id}`          → fetch one group
/// - `DELETE /groups/{group_id}`          → archive a group (admin only)
/// - `GET    /groups/{group_id}/members`  → list members
/// - `POST   /groups/{group_id}/members`  → add members (admin only)
/// - `DELETE /groups/{group_id}/members`  → remove members (admin only)
///
/// Activity routes are nested under `/groups/{group_id}/activities`.
pub fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_groups))
        .route("/", post(post::create_group).route_layer(from_fn(allow_admin)))
        .route("/{group_id}", get(get::get_group))
        .route(
            "/{group_id}",
            delete(delete::delete_group).route_layer(from_fn(allow_admin)),
        )
        .route("/{group_id}/members", get(get::get_members))
        .route(
            "/{group_id}/members",
            post(post::add_members).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{group_id}/members",
            delete(delete::remove_members).route_layer(from_fn(allow_admin)),
        )
        .nest("/{group_id}/activities", activities::activity_routes())
}
