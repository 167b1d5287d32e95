//! Integration tests for the list/filter/pagination contract

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use donelist_http::{ServiceConfig, ServiceConfigBuilder, TaskApi, router};
use donelist_store::InMemoryTaskStore;

const PAGE_SIZE: usize = 5;

fn test_app() -> Router {
    let api = TaskApi::new(InMemoryTaskStore::new(), ServiceConfig::default());
    router(api).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn create(app: &Router, title: &str, due_date: Value) -> Value {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/tasks")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "title": title, "dueDate": due_date }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn set_completed(app: &Router, id: &str) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/tasks/{id}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({ "completed": true }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_empty_listing_still_reports_one_page() {
    let app = test_app();

    let (status, listing) = get(&app, "/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["total"], 0);
    assert_eq!(listing["pages"], 1);
    assert_eq!(listing["tasks"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_pages_partition_the_result_set() {
    let app = test_app();
    for i in 0..13 {
        create(&app, &format!("task {i}"), Value::Null).await;
    }

    let (_, first) = get(&app, "/tasks").await;
    let total = first["total"].as_u64().unwrap() as usize;
    let pages = first["pages"].as_u64().unwrap();
    assert_eq!(total, 13);
    assert_eq!(pages, 3);

    let mut seen = 0;
    for page in 1..=pages {
        let (status, listing) = get(&app, &format!("/tasks?page={page}")).await;
        assert_eq!(status, StatusCode::OK);
        let len = listing["tasks"].as_array().unwrap().len();
        assert!(len <= PAGE_SIZE);
        assert_eq!(listing["page"], page);
        seen += len;
    }
    assert_eq!(seen, total);
}

#[tokio::test]
async fn test_page_beyond_last_returns_empty_not_error() {
    let app = test_app();
    create(&app, "only", Value::Null).await;

    let (status, listing) = get(&app, "/tasks?page=42").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["tasks"].as_array().unwrap().len(), 0);
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["pages"], 1);
}

#[tokio::test]
async fn test_page_zero_is_rejected() {
    let app = test_app();

    let (status, body) = get(&app, "/tasks?page=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_input");
    assert_eq!(body["details"]["field"], "page");
}

#[tokio::test]
async fn test_unknown_filter_is_rejected() {
    let app = test_app();

    let (status, _) = get(&app, "/tasks?filter=overdue").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_completion_filters_partition_all() {
    let app = test_app();
    let a = create(&app, "a", Value::Null).await;
    create(&app, "b", Value::Null).await;
    create(&app, "c", Value::Null).await;
    set_completed(&app, a["id"].as_str().unwrap()).await;

    let (_, complete) = get(&app, "/tasks?filter=complete").await;
    let (_, incomplete) = get(&app, "/tasks?filter=incomplete").await;
    let (_, all) = get(&app, "/tasks?filter=all").await;

    assert_eq!(complete["total"], 1);
    assert_eq!(incomplete["total"], 2);
    assert_eq!(all["total"], 3);

    let complete_titles: Vec<&str> = complete["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(complete_titles, vec!["a"]);
    assert!(
        complete["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["completed"] == true)
    );
    assert!(
        incomplete["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .all(|t| t["completed"] == false)
    );
}

#[tokio::test]
async fn test_today_filter_selects_only_tasks_due_today() {
    let app = test_app();
    let now = Utc::now();

    create(&app, "due now", json!(now.to_rfc3339())).await;
    create(
        &app,
        "tomorrow",
        json!((now + Duration::days(1)).to_rfc3339()),
    )
    .await;
    create(&app, "undated", Value::Null).await;

    let (status, today) = get(&app, "/tasks?filter=today").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = today["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["due now"]);
    assert_eq!(today["total"], 1);
}

#[tokio::test]
async fn test_listing_orders_by_due_date_with_undated_last() {
    let app = test_app();
    let base = Utc::now();

    create(&app, "undated", Value::Null).await;
    create(
        &app,
        "later",
        json!((base + Duration::days(3)).to_rfc3339()),
    )
    .await;
    create(
        &app,
        "sooner",
        json!((base + Duration::days(1)).to_rfc3339()),
    )
    .await;

    let (_, listing) = get(&app, "/tasks").await;
    let titles: Vec<&str> = listing["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["sooner", "later", "undated"]);
}

#[tokio::test]
async fn test_page_size_comes_from_configuration() {
    let config = ServiceConfigBuilder::new().page_size(2).build().unwrap();
    let api = TaskApi::new(InMemoryTaskStore::new(), config);
    let app = router(api).unwrap();

    for i in 0..3 {
        create(&app, &format!("task {i}"), Value::Null).await;
    }

    let (_, listing) = get(&app, "/tasks").await;
    assert_eq!(listing["tasks"].as_array().unwrap().len(), 2);
    assert_eq!(listing["pages"], 2);
}
