//! Health endpoint test.

mod helpers;

use axum::http::StatusCode;

use helpers::app::{body_json, make_test_app, request_with_cookie};

#[tokio::test]
async fn health_is_public_and_reports_database() {
    let (app, _db) = make_test_app().await;

    let response = request_with_cookie(&app, "GET", "/api/health", None, None).await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], "ok");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let (app, _db) = make_test_app().await;

    let response =
        request_with_cookie(&app, "GET", "/api/topics", Some("not-a-real-token"), None).await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}
