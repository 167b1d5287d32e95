//! The document-store seam
//!
//! Handlers compute the `today` window once per request and pass it to
//! both `find` and `count`, so a listing and its total always agree on
//! what "today" means even across a midnight boundary.

use async_trait::async_trait;
use donelist_core::{DayWindow, NewTask, StoreResult, Task, TaskFilter, TaskId, TaskPatch, TaskQuery};

/// Async task persistence: create, find-with-filter-sort-skip-limit,
/// count, update-by-id, and delete-by-id.
///
/// Lookups for missing records return `Ok(None)` / `Ok(false)` rather than
/// an error; [`donelist_core::StoreError`] is reserved for backend
/// failures. Atomicity of a single `update` is whatever the backend
/// provides natively; there is no application-level locking.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persist a new task. The store assigns the id and both timestamps
    /// and initializes `completed` to false.
    async fn insert(&self, draft: NewTask) -> StoreResult<Task>;

    /// Fetch one slice of the filtered, ordered task set.
    async fn find(&self, query: TaskQuery, today: DayWindow) -> StoreResult<Vec<Task>>;

    /// Count all tasks matching the filter, ignoring pagination.
    async fn count(&self, filter: TaskFilter, today: DayWindow) -> StoreResult<usize>;

    /// Apply a partial update. Returns the post-update record, or `None`
    /// when no task has the given id.
    async fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Option<Task>>;

    /// Remove a task. Returns `false` when no task had the given id.
    async fn delete(&self, id: &TaskId) -> StoreResult<bool>;
}
