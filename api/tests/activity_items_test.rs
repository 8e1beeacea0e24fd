//! End-to-end tests for activity items: the exactly-one-of-five content
//! contract, derived item types, and atomic reordering.

mod helpers;

use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

use helpers::app::{body_json, create_user_with_token, make_test_app, request_with_cookie};

struct Fixture {
    app: Router,
    token: String,
    items_uri: String,
    question_id: String,
    handout_id: String,
    lesson_id: String,
}

async fn setup() -> Fixture {
    let (app, db) = make_test_app().await;
    let (_admin, token) = create_user_with_token(&db, "admin", true).await;

    let post = |uri: &'static str, payload: Value| {
        let app = app.clone();
        let token = token.clone();
        async move {
            let response =
                request_with_cookie(&app, "POST", uri, Some(&token), Some(payload)).await;
            let (status, body) = body_json(response).await;
            assert_eq!(status, StatusCode::CREATED, "POST {uri}: {body}");
            body["data"]["id"].as_str().unwrap().to_owned()
        }
    };

    let group_id = post("/api/groups", json!({"name": "Calculus 1"})).await;

    let response = request_with_cookie(
        &app,
        "POST",
        &format!("/api/groups/{group_id}/activities"),
        Some(&token),
        Some(json!({
            "title": "Week 1",
            "due_date": "2026-03-01T23:59:00Z"
        })),
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "create activity: {body}");
    let activity_id = body["data"]["id"].as_str().unwrap().to_owned();

    let question_id = post(
        "/api/questions",
        json!({"statement": "What is 2 + 2?", "question_type": "closed", "difficulty": 1}),
    )
    .await;
    let handout_id = post(
        "/api/handouts",
        json!({"title": "Syllabus", "storage_key": "handouts/syllabus.pdf"}),
    )
    .await;
    let lesson_id = post(
        "/api/video-lessons",
        json!({"title": "Intro", "url": "https://videos.example.com/intro"}),
    )
    .await;

    Fixture {
        app,
        token,
        items_uri: format!("/api/groups/{group_id}/activities/{activity_id}/items"),
        question_id,
        handout_id,
        lesson_id,
    }
}

async fn add_item(fx: &Fixture, payload: Value) -> (StatusCode, Value) {
    let response =
        request_with_cookie(&fx.app, "POST", &fx.items_uri, Some(&fx.token), Some(payload)).await;
    body_json(response).await
}

async fn list_items(fx: &Fixture) -> Vec<Value> {
    let response =
        request_with_cookie(&fx.app, "GET", &fx.items_uri, Some(&fx.token), None).await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);
    body["data"].as_array().unwrap().clone()
}

#[tokio::test]
async fn item_with_no_content_reference_is_rejected() {
    let fx = setup().await;

    let (status, body) = add_item(&fx, json!({"title": "Empty"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
    assert!(list_items(&fx).await.is_empty());
}

#[tokio::test]
async fn item_with_two_content_references_is_rejected() {
    let fx = setup().await;

    let (status, body) = add_item(
        &fx,
        json!({
            "question_id": fx.question_id,
            "handout_id": fx.handout_id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");
    assert!(list_items(&fx).await.is_empty());
}

#[tokio::test]
async fn item_type_is_derived_not_client_supplied() {
    let fx = setup().await;

    // A client-sent item_type is ignored; the stored type follows the
    // populated reference.
    let (status, body) = add_item(
        &fx,
        json!({
            "item_type": "question",
            "handout_id": fx.handout_id,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["item_type"], "handout");
    assert_eq!(body["data"]["content_id"], json!(fx.handout_id));
    assert_eq!(body["data"]["order_index"], 0);
}

#[tokio::test]
async fn unknown_content_reference_is_not_found() {
    let fx = setup().await;

    let (status, body) = add_item(
        &fx,
        json!({"question_id": "7c9d2f14-2f6a-4b6e-8a32-94a1c0d5a111"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

async fn three_items(fx: &Fixture) -> (String, String, String) {
    let (_, a) = add_item(fx, json!({"question_id": fx.question_id})).await;
    let (_, b) = add_item(fx, json!({"handout_id": fx.handout_id})).await;
    let (_, c) = add_item(fx, json!({"video_lesson_id": fx.lesson_id})).await;
    (
        a["data"]["id"].as_str().unwrap().to_owned(),
        b["data"]["id"].as_str().unwrap().to_owned(),
        c["data"]["id"].as_str().unwrap().to_owned(),
    )
}

#[tokio::test]
async fn reorder_assigns_dense_indices_in_request_order() {
    let fx = setup().await;
    let (a, b, c) = three_items(&fx).await;

    let response = request_with_cookie(
        &fx.app,
        "PUT",
        &format!("{}/order", fx.items_uri),
        Some(&fx.token),
        Some(json!({"item_ids": [c, a, b]})),
    )
    .await;
    let (status, body) = body_json(response).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![c.as_str(), a.as_str(), b.as_str()]);
    let indices: Vec<i64> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["order_index"].as_i64().unwrap())
        .collect();
    assert_eq!(indices, vec![0, 1, 2]);
}

#[tokio::test]
async fn incomplete_reorder_list_fails_without_side_effects() {
    let fx = setup().await;
    let (a, b, c) = three_items(&fx).await;

    let response = request_with_cookie(
        &fx.app,
        "PUT",
        &format!("{}/order", fx.items_uri),
        Some(&fx.token),
        Some(json!({"item_ids": [c, a]})),
    )
    .await;
    let (status, body) = body_json(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_input");

    let items = list_items(&fx).await;
    let ids: Vec<&str> = items.iter().map(|i| i["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec![a.as_str(), b.as_str(), c.as_str()]);
}

#[tokio::test]
async fn deleting_an_item_closes_the_index_gap() {
    let fx = setup().await;
    let (a, b, c) = three_items(&fx).await;

    let response = request_with_cookie(
        &fx.app,
        "DELETE",
        &format!("{}/{}", fx.items_uri, b),
        Some(&fx.token),
        None,
    )
    .await;
    let (status, _) = body_json(response).await;
    assert_eq!(status, StatusCode::OK);

    let items = list_items(&fx).await;
    let order: Vec<(&str, i64)> = items
        .iter()
        .map(|i| (i["id"].as_str().unwrap(), i["order_index"].as_i64().unwrap()))
        .collect();
    assert_eq!(order, vec![(a.as_str(), 0), (c.as_str(), 1)]);
}
