//! Request type definitions for the REST endpoints
//!
//! Partial updates reuse [`donelist_core::TaskPatch`] directly; its wire
//! shape already distinguishes an absent `dueDate` from an explicit null.

use chrono::{DateTime, Utc};
use donelist_core::TaskFilter;
use serde::Deserialize;
use utoipa::ToSchema;

/// Query parameters accepted by `GET /tasks`.
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// 1-based page number, defaults to 1.
    pub page: Option<u32>,
    /// Filter name, defaults to `all`.
    pub filter: Option<TaskFilter>,
}

/// Request body for creating a task.
///
/// `title` is optional at the deserialization layer so a missing field
/// can be reported as such instead of as a parse failure; `completed` is
/// not accepted; new tasks always start incomplete.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    /// Task text. Required and non-empty.
    #[schema(example = "Buy milk")]
    pub title: Option<String>,
    /// Optional due timestamp.
    pub due_date: Option<DateTime<Utc>>,
}
