//! Integration tests for the API client against a mocked service

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use donelist_cli::{ApiClient, ApiClientError};
use donelist_core::{TaskFilter, TaskId, TaskPatch};

fn task_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "completed": false,
        "dueDate": null,
        "createdAt": "2026-02-01T08:00:00Z",
        "updatedAt": "2026-02-01T08:00:00Z"
    })
}

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_list_sends_filter_and_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(query_param("filter", "complete"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tasks": [task_json("a1", "done thing")],
            "total": 6,
            "page": 2,
            "pages": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let listing = client(&server)
        .list(TaskFilter::Complete, 2)
        .await
        .unwrap();

    assert_eq!(listing.total, 6);
    assert_eq!(listing.pages, 2);
    assert_eq!(listing.tasks.len(), 1);
    assert_eq!(listing.tasks[0].title, "done thing");
}

#[tokio::test]
async fn test_create_posts_title_and_due_date() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tasks"))
        .and(body_partial_json(json!({
            "title": "Buy milk",
            "dueDate": null
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("b2", "Buy milk")))
        .expect(1)
        .mount(&server)
        .await;

    let task = client(&server).create("Buy milk", None).await.unwrap();
    assert_eq!(task.title, "Buy milk");
    assert!(!task.completed);
}

#[tokio::test]
async fn test_update_sends_only_patched_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/tasks/c3"))
        .and(body_partial_json(json!({ "completed": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json("c3", "unchanged")))
        .expect(1)
        .mount(&server)
        .await;

    let id = TaskId::parse("c3").unwrap();
    let task = client(&server)
        .update(&id, &TaskPatch::completion(true))
        .await
        .unwrap();
    assert_eq!(task.title, "unchanged");
}

#[tokio::test]
async fn test_delete_hits_the_task_path() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/d4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "message": "Deleted" })))
        .expect(1)
        .mount(&server)
        .await;

    let id = TaskId::parse("d4").unwrap();
    let ack = client(&server).delete(&id).await.unwrap();
    assert_eq!(ack.message, "Deleted");
}

#[tokio::test]
async fn test_server_errors_surface_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/tasks/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": "task_not_found",
            "message": "Task with ID 'missing' not found",
            "request_id": "req-1",
            "timestamp": "2026-02-01T08:00:00Z"
        })))
        .mount(&server)
        .await;

    let id = TaskId::parse("missing").unwrap();
    let error = client(&server).delete(&id).await.unwrap_err();

    match error {
        ApiClientError::Server { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Task with ID 'missing' not found");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_error_bodies_fall_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let error = client(&server).list(TaskFilter::All, 1).await.unwrap_err();
    match error {
        ApiClientError::Server { status, .. } => assert_eq!(status, 500),
        other => panic!("expected server error, got {other:?}"),
    }
}
