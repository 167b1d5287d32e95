//! Response type definitions for the REST endpoints

use chrono::{DateTime, Utc};
use donelist_core::Task;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One page of a filtered task listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskListResponse {
    /// The tasks on this page, at most `page_size` of them.
    pub tasks: Vec<Task>,
    /// Count of all tasks matching the filter, ignoring pagination.
    #[schema(example = 12)]
    pub total: usize,
    /// The 1-based page this response covers.
    #[schema(example = 1)]
    pub page: u32,
    /// Total page count; at least 1 even for an empty result set.
    #[schema(example = 3)]
    pub pages: u32,
}

/// Acknowledgement body for a successful delete.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteTaskResponse {
    #[schema(example = "Deleted")]
    pub message: String,
}

/// Service liveness information.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "healthy")]
    pub status: String,
    #[schema(example = "donelist")]
    pub service: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
