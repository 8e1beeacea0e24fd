//! # User Routes Module
//!
//! Admin-only listing of provisioned accounts. There is no registration or
//! login flow; accounts and tokens are provisioned out of band.

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub mod get;

/// Builds and returns the `/users` route group (admin only).
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/", get(get::list_users))
}
