//! Transient in-memory task store
//!
//! Fast, process-local backend suitable for development and tests. All
//! data is lost when the process terminates. Concurrent access goes
//! through an async `RwLock`; a single `update` holds the write guard
//! for the whole read-modify-write, which is the backend's native
//! atomicity for update-by-id.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use donelist_core::{
    DayWindow, NewTask, StoreResult, Task, TaskFilter, TaskId, TaskPatch, TaskQuery,
};

use crate::ordering::by_due_then_newest;
use crate::store::TaskStore;

/// HashMap-backed [`TaskStore`] implementation.
///
/// # Example
///
/// ```rust
/// use donelist_store::{InMemoryTaskStore, TaskStore};
/// use donelist_core::{DayWindow, NewTask, TaskFilter, TaskQuery};
///
/// # tokio_test::block_on(async {
/// let store = InMemoryTaskStore::new();
/// let task = store
///     .insert(NewTask::new("Buy milk", None).unwrap())
///     .await
///     .unwrap();
///
/// let today = DayWindow::local_today();
/// let all = store
///     .find(TaskQuery::unbounded(TaskFilter::All), today)
///     .await
///     .unwrap();
/// assert_eq!(all, vec![task]);
/// # });
/// ```
#[derive(Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, draft: NewTask) -> StoreResult<Task> {
        let now = Utc::now();
        let task = Task {
            id: TaskId::generate(),
            title: draft.title,
            completed: false,
            due_date: draft.due_date,
            created_at: now,
            updated_at: now,
        };

        let mut tasks = self.tasks.write().await;
        tasks.insert(task.id.clone(), task.clone());
        tracing::debug!(task_id = %task.id, "Inserted task");
        Ok(task)
    }

    async fn find(&self, query: TaskQuery, today: DayWindow) -> StoreResult<Vec<Task>> {
        let tasks = self.tasks.read().await;

        let mut matched: Vec<Task> = tasks
            .values()
            .filter(|task| query.filter.matches(task, &today))
            .cloned()
            .collect();
        matched.sort_by(by_due_then_newest);

        Ok(matched
            .into_iter()
            .skip(query.skip)
            .take(query.limit)
            .collect())
    }

    async fn count(&self, filter: TaskFilter, today: DayWindow) -> StoreResult<usize> {
        let tasks = self.tasks.read().await;
        Ok(tasks
            .values()
            .filter(|task| filter.matches(task, &today))
            .count())
    }

    async fn update(&self, id: &TaskId, patch: TaskPatch) -> StoreResult<Option<Task>> {
        let mut tasks = self.tasks.write().await;

        let Some(current) = tasks.get(id) else {
            return Ok(None);
        };
        let updated = patch.apply(current, Utc::now());
        tasks.insert(id.clone(), updated.clone());
        tracing::debug!(task_id = %id, "Updated task");
        Ok(Some(updated))
    }

    async fn delete(&self, id: &TaskId) -> StoreResult<bool> {
        let mut tasks = self.tasks.write().await;
        let removed = tasks.remove(id).is_some();
        if removed {
            tracing::debug!(task_id = %id, "Deleted task");
        }
        Ok(removed)
    }
}
