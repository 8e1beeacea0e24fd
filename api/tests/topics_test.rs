//! End-to-end tests for the `/api/topics` route group: envelope shape, auth
//! guards, tree mutation rules and the three deletion modes.

mod helpers;

use axum::http::StatusCode;
use serde_json::json;

use helpers::app::{
    body_json, create_user_with_token, make_test_app, request_with_bearer, request_with_cookie,
};

#[tokio::test]
async fn admin_creates_topic_with_trimmed_fields() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let response = request_with_cookie(
        &app,
        "POST",
        "/api/topics",
        Some(&token),
        Some(json!({"name": "  Algebra  ", "description": "  Equations  "})),
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Topic created successfully");
    assert_eq!(body["data"]["name"], "Algebra");
    assert_eq!(body["data"]["description"], "Equations");
    assert_eq!(body["data"]["parent_id"], serde_json::Value::Null);
    assert!(body["data"]["id"].as_str().is_some());
    // Internal integer ids never appear in responses.
    assert!(body["data"]["id"].as_i64().is_none());
}

#[tokio::test]
async fn blank_topic_name_is_invalid_input() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    for name in ["", "   "] {
        let response = request_with_cookie(
            &app,
            "POST",
            "/api/topics",
            Some(&token),
            Some(json!({"name": name})),
        )
        .await;
        let (status, body) = body_json(response).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_input");
    }
}

#[tokio::test]
async fn duplicate_sibling_name_is_conflict() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let response = request_with_cookie(
        &app,
        "POST",
        "/api/topics",
        Some(&token),
        Some(json!({"name": "Algebra"})),
    )
    .await;
    let (status, _) = body_json(response).await;
    assert_eq!(status, StatusCode::CREATED);

    let response = request_with_cookie(
        &app,
        "POST",
        "/api/topics",
        Some(&token),
        Some(json!({"name": " Algebra "})),
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert!(body["message"].as_str().is_some());
}

#[tokio::test]
async fn unknown_parent_is_not_found() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let response = request_with_cookie(
        &app,
        "POST",
        "/api/topics",
        Some(&token),
        Some(json!({
            "name": "Orphan",
            "parent_id": "0eeb2f15-9aa5-4f32-a39b-000000000000"
        })),
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn guards_reject_missing_token_and_non_admin() {
    let (app, db) = make_test_app().await;
    let (_user, token) = create_user_with_token(&db, "regular", false).await;

    let response =
        request_with_cookie(&app, "POST", "/api/topics", None, Some(json!({"name": "X"}))).await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let response = request_with_cookie(
        &app,
        "POST",
        "/api/topics",
        Some(&token),
        Some(json!({"name": "X"})),
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    // Reads only need authentication.
    let response = request_with_cookie(&app, "GET", "/api/topics", Some(&token), None).await;
    let (status, _) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn bearer_header_works_as_cookie_fallback() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let response = request_with_bearer(&app, "GET", "/api/topics", &token, None).await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

async fn create_topic(
    app: &axum::Router,
    token: &str,
    name: &str,
    parent_id: Option<&str>,
) -> String {
    let mut payload = json!({"name": name});
    if let Some(parent) = parent_id {
        payload["parent_id"] = json!(parent);
    }
    let response = request_with_cookie(app, "POST", "/api/topics", Some(token), Some(payload)).await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "create {name}: {body}");
    body["data"]["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn default_delete_blocks_on_children() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let parent = create_topic(&app, &token, "Parent", None).await;
    let child = create_topic(&app, &token, "Child", Some(&parent)).await;

    let response = request_with_cookie(
        &app,
        "DELETE",
        &format!("/api/topics/{parent}"),
        Some(&token),
        None,
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "topic_has_children");

    // Nothing was deleted.
    for id in [&parent, &child] {
        let response = request_with_cookie(
            &app,
            "GET",
            &format!("/api/topics/{id}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn cascade_delete_archives_descendants() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let root = create_topic(&app, &token, "Root", None).await;
    let child = create_topic(&app, &token, "Child", Some(&root)).await;
    let grandchild = create_topic(&app, &token, "Grandchild", Some(&child)).await;

    let response = request_with_cookie(
        &app,
        "DELETE",
        &format!("/api/topics/{child}?mode=cascade"),
        Some(&token),
        None,
    )
    .await;
    let (status, _) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);

    for gone in [&child, &grandchild] {
        let response = request_with_cookie(
            &app,
            "GET",
            &format!("/api/topics/{gone}"),
            Some(&token),
            None,
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
    let response = request_with_cookie(
        &app,
        "GET",
        &format!("/api/topics/{root}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn reparent_delete_moves_children_up() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let root = create_topic(&app, &token, "Root", None).await;
    let middle = create_topic(&app, &token, "Middle", Some(&root)).await;
    let leaf = create_topic(&app, &token, "Leaf", Some(&middle)).await;

    let response = request_with_cookie(
        &app,
        "DELETE",
        &format!("/api/topics/{middle}?mode=reparent"),
        Some(&token),
        None,
    )
    .await;
    let (status, _) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);

    let response = request_with_cookie(
        &app,
        "GET",
        &format!("/api/topics/{leaf}"),
        Some(&token),
        None,
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["parent_id"], json!(root));

    let response = request_with_cookie(
        &app,
        "GET",
        &format!("/api/topics/{middle}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_delete_mode_is_invalid_input() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let topic = create_topic(&app, &token, "Solo", None).await;

    let response = request_with_cookie(
        &app,
        "DELETE",
        &format!("/api/topics/{topic}?mode=purge"),
        Some(&token),
        None,
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn update_clears_description_and_blocks_cycles() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let root = create_topic(&app, &token, "Root", None).await;
    let child = create_topic(&app, &token, "Child", Some(&root)).await;

    let response = request_with_cookie(
        &app,
        "PUT",
        &format!("/api/topics/{root}"),
        Some(&token),
        Some(json!({"description": ""})),
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["description"], serde_json::Value::Null);

    // Moving a topic under its own descendant is rejected.
    let response = request_with_cookie(
        &app,
        "PUT",
        &format!("/api/topics/{root}"),
        Some(&token),
        Some(json!({"parent_id": child})),
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
}

#[tokio::test]
async fn list_filters_by_query_and_parent() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let maths = create_topic(&app, &token, "Mathematics", None).await;
    create_topic(&app, &token, "Algebra", Some(&maths)).await;
    create_topic(&app, &token, "Analysis", Some(&maths)).await;
    create_topic(&app, &token, "History", None).await;

    let response = request_with_cookie(
        &app,
        "GET",
        "/api/topics?query=Alg",
        Some(&token),
        None,
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["topics"][0]["name"], "Algebra");

    let response = request_with_cookie(
        &app,
        "GET",
        &format!("/api/topics?parent_id={maths}"),
        Some(&token),
        None,
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
}

#[tokio::test]
async fn stats_reports_median_difficulty() {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let topic = create_topic(&app, &token, "Geometry", None).await;

    for difficulty in [1, 4, 5] {
        let response = request_with_cookie(
            &app,
            "POST",
            "/api/questions",
            Some(&token),
            Some(json!({
                "statement": format!("Question with difficulty {difficulty}"),
                "question_type": "open",
                "difficulty": difficulty,
                "topic_id": topic,
            })),
        )
        .await;
        let (status, _) = body_json(response).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let response = request_with_cookie(
        &app,
        "GET",
        &format!("/api/topics/{topic}/stats"),
        Some(&token),
        None,
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["question_count"], 3);
    assert_eq!(body["data"]["median_difficulty"], 4.0);
}
