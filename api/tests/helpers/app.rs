//! Shared setup for API integration tests: a fresh in-memory database behind
//! the full router, plus request plumbing helpers.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use api::auth::generate_jwt;
use api::routes::routes;
use api::state::AppState;
use db::models::user::Model as UserModel;
use db::test_utils::setup_test_db;

pub async fn make_test_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let app = Router::new().nest("/api", routes(AppState::new(db.clone())));
    (app, db)
}

/// Creates a user and a signed token for it.
pub async fn create_user_with_token(
    db: &DatabaseConnection,
    username: &str,
    admin: bool,
) -> (UserModel, String) {
    let email = format!("{username}@example.com");
    let user = UserModel::create(db, username, &email, admin)
        .await
        .expect("Failed to create user");
    let (token, _) = generate_jwt(user.id, user.admin);
    (user, token)
}

/// Sends a JSON request with the token carried in the `token` cookie (the
/// primary transport).
pub async fn request_with_cookie(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Cookie", format!("token={token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Same as [`request_with_cookie`] but using the `Authorization: Bearer`
/// fallback.
pub async fn request_with_bearer(
    app: &Router,
    method: &str,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> Response<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {token}"));
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
