//! HTTP client for the task service
//!
//! Thin typed wrapper over reqwest with a defensive request timeout.
//! Non-2xx responses are decoded into the service's structured error
//! body where possible.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::json;

use donelist_core::{Task, TaskFilter, TaskId, TaskPatch};
use donelist_http::{DeleteTaskResponse, ErrorResponse, TaskListResponse};

/// Errors surfaced by the API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
}

/// Typed client for the REST surface.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for the given base URL (no trailing slash needed).
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = match response.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string(),
        };
        Err(ApiClientError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// GET /tasks with the given filter and page.
    pub async fn list(
        &self,
        filter: TaskFilter,
        page: u32,
    ) -> Result<TaskListResponse, ApiClientError> {
        let response = self
            .http
            .get(self.url("/tasks"))
            .query(&[("filter", filter.as_str()), ("page", &page.to_string())])
            .send()
            .await?;
        Self::decode(response).await
    }

    /// POST /tasks.
    pub async fn create(
        &self,
        title: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<Task, ApiClientError> {
        let response = self
            .http
            .post(self.url("/tasks"))
            .json(&json!({ "title": title, "dueDate": due_date }))
            .send()
            .await?;
        Self::decode(response).await
    }

    /// PATCH /tasks/{id}.
    pub async fn update(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiClientError> {
        let response = self
            .http
            .patch(self.url(&format!("/tasks/{id}")))
            .json(patch)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// DELETE /tasks/{id}.
    pub async fn delete(&self, id: &TaskId) -> Result<DeleteTaskResponse, ApiClientError> {
        let response = self.http.delete(self.url(&format!("/tasks/{id}"))).send().await?;
        Self::decode(response).await
    }
}
