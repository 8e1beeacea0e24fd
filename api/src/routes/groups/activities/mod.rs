//! # Activity Routes Module
//!
//! Routes nested under `/api/groups/{group_id}/activities`: the group-scoped
//! assignment checklist and its ordered content items.

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

/// Builds the activity route group.
///
/// Routes (all relative to `/groups/{group_id}/activities`):
/// - `GET    /`                                → list activities
/// - `POST   /`                                → create an activity (admin only)
/// - `GET    /{activity_id}`                   → fetch one activity
/// - `PUT    /{activity_id}`                   → edit an activity (admin only)
/// - `DELETE /{activity_id}`                   → archive an activity (admin only)
/// - `GET    /{activity_id}/items`             → ordered item list
/// - `POST   /{activity_id}/items`             → append an item (admin only)
/// - `PUT    /{activity_id}/items/order`       → atomic reorder (admin only)
/// - `DELETE /{activity_id}/items/{item_id}`   → remove an item (admin only)
pub fn activity_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::list_activities))
        .route(
            "/",
            post(post::create_activity).route_layer(from_fn(allow_admin)),
        )
        .route("/{activity_id}", get(get::get_activity))
        .route(
            "/{activity_id}",
            put(put::edit_activity).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{activity_id}",
            delete(delete::delete_activity).route_layer(from_fn(allow_admin)),
        )
        .route("/{activity_id}/items", get(get::list_items))
        .route(
            "/{activity_id}/items",
            post(post::create_item).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{activity_id}/items/order",
            put(put::reorder_items).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{activity_id}/items/{item_id}",
            delete(delete::delete_item).route_layer(from_fn(allow_admin)),
        )
}
