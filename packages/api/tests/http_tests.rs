// ABOUTME: Integration tests for the tasks HTTP API
// ABOUTME: Exercises status codes, response envelopes, and error codes end to end

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use taskdeck_api::{create_tasks_router, AppState};
use taskdeck_tasks::{MemoryTaskStore, TaskService};

fn app() -> Router {
    let service = TaskService::new(Arc::new(MemoryTaskStore::new()));
    create_tasks_router().with_state(AppState::new(service))
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn sample_task(title: &str) -> Value {
    json!({
        "title": title,
        "description": "Something worth doing",
        "status": "pending",
        "priority": 2
    })
}

#[tokio::test]
async fn create_returns_created_task_in_envelope() {
    let app = app();

    let response = app.oneshot(post_json("/", sample_task("Gym"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["title"], "Gym");
    assert_eq!(body["data"]["priority"], 2);
    assert!(body["error"].is_null());
}

#[tokio::test]
async fn duplicate_create_conflicts_with_code() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", sample_task("Gym")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(post_json("/", sample_task("Gym"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "DUPLICATE_TASK");
}

#[tokio::test]
async fn create_reports_every_invalid_field() {
    let app = app();

    let response = app
        .oneshot(post_json(
            "/",
            json!({ "status": "done", "priority": 9 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    // title, description, status, and priority are all wrong
    assert_eq!(body["error"]["fields"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn get_missing_task_is_not_found() {
    let app = app();

    let response = app.oneshot(get_request("/Nothing")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "TASK_NOT_FOUND");
}

#[tokio::test]
async fn update_with_different_payload_title_is_a_mismatch() {
    let app = app();

    // The addressed task does not even exist; the mismatch still wins
    let response = app
        .clone()
        .oneshot(put_json("/Gym", sample_task("Yoga")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "TITLE_MISMATCH");

    let response = app
        .clone()
        .oneshot(post_json("/", sample_task("Gym")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .oneshot(put_json("/Gym", sample_task("Yoga")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_overwrites_fields_and_keeps_title() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", sample_task("Gym")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(put_json(
            "/Gym",
            json!({
                "title": "Gym",
                "description": "Back day instead",
                "status": "completed",
                "priority": 5
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"]["title"], "Gym");
    assert_eq!(body["data"]["description"], "Back day instead");
    assert_eq!(body["data"]["status"], "completed");
    assert_eq!(body["data"]["priority"], 5);
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = app();

    let response = app
        .clone()
        .oneshot(post_json("/", sample_task("Gym")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(delete_request("/Gym")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);

    let response = app.oneshot(get_request("/Gym")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_returns_paged_envelope_with_defaults() {
    let app = app();

    for i in 0..12 {
        let response = app
            .clone()
            .oneshot(post_json("/", sample_task(&format!("Task {:02}", i))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Default page size is 10
    let response = app.clone().oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 10);
    assert_eq!(body["data"]["total"], 12);
    assert_eq!(body["data"]["skip"], 0);
    assert_eq!(body["data"]["limit"], 10);
    assert_eq!(body["data"]["has_more"], true);

    let response = app
        .oneshot(get_request("/?skip=10&limit=5"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["has_more"], false);
}

#[tokio::test]
async fn list_filters_sorts_and_searches() {
    let app = app();

    let tasks = [
        ("Gym", "Leg day at the gym", "pending", 4),
        ("Groceries", "Buy milk and eggs", "completed", 4),
        ("Taxes", "File the yearly return", "pending", 2),
    ];
    for (title, description, status, priority) in tasks {
        let response = app
            .clone()
            .oneshot(post_json(
                "/",
                json!({
                    "title": title,
                    "description": description,
                    "status": status,
                    "priority": priority
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get_request("/?status=pending&priority=4"))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "Gym");

    let response = app
        .clone()
        .oneshot(get_request("/?sort_by=title&sort_order=desc"))
        .await
        .unwrap();
    let body = body_json(response).await;
    let titles: Vec<&str> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Taxes", "Gym", "Groceries"]);

    let response = app.oneshot(get_request("/?search=gym")).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["items"][0]["title"], "Gym");
}

#[tokio::test]
async fn list_rejects_invalid_parameters_with_codes() {
    let app = app();

    let response = app
        .clone()
        .oneshot(get_request("/?priority=9"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    let response = app
        .clone()
        .oneshot(get_request("/?limit=0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(get_request("/?sort_by=created"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.oneshot(get_request("/?search=%5Bunclosed")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
