//! Task CRUD handlers
//!
//! Each handler is a stateless pass-through: translate the request into a
//! store operation, run it, shape the JSON response. The `today` window
//! for the `today` filter is computed once per request so the count and
//! the page slice always agree on the day's bounds.

use axum::{
    Extension,
    extract::{Path, Query, State},
    response::Json,
};

use donelist_core::{DayWindow, NewTask, Pagination, TaskId, TaskPatch, TaskQuery};
use donelist_store::TaskStore;

use crate::error::{ApiError, ApiResult, RequestIdExtension};
use crate::service::TaskApi;
use crate::types::{CreateTaskRequest, DeleteTaskResponse, ListTasksQuery, TaskListResponse};

/// GET /tasks - List one page of filtered tasks
#[utoipa::path(
    get,
    path = "/tasks",
    params(
        ("page" = Option<u32>, Query, description = "1-based page number, defaults to 1"),
        ("filter" = Option<String>, Query, description = "all | incomplete | complete | today")
    ),
    responses(
        (status = 200, description = "One page of tasks", body = TaskListResponse),
        (status = 400, description = "Invalid page or filter", body = crate::error::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_tasks<S: TaskStore + 'static>(
    State(api): State<TaskApi<S>>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Query(params): Query<ListTasksQuery>,
) -> ApiResult<Json<TaskListResponse>> {
    let page = params.page.unwrap_or(1);
    if page == 0 {
        return Err(ApiError::invalid_input(
            "page",
            "must be a positive integer",
            request_id,
        ));
    }
    let filter = params.filter.unwrap_or_default();
    let today = DayWindow::local_today();
    let pagination = Pagination::new(page, api.config.page_size);

    let total = api
        .store
        .count(filter, today)
        .await
        .map_err(|e| ApiError::store_unavailable(e, request_id.clone()))?;
    let tasks = api
        .store
        .find(TaskQuery::page(filter, pagination), today)
        .await
        .map_err(|e| ApiError::store_unavailable(e, request_id))?;

    Ok(Json(TaskListResponse {
        tasks,
        total,
        page,
        pages: Pagination::page_count(total, api.config.page_size),
    }))
}

/// POST /tasks - Create a task
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 200, description = "The created task", body = donelist_core::Task),
        (status = 400, description = "Missing or blank title", body = crate::error::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_task<S: TaskStore + 'static>(
    State(api): State<TaskApi<S>>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Json(request): Json<CreateTaskRequest>,
) -> ApiResult<Json<donelist_core::Task>> {
    let Some(title) = request.title else {
        return Err(ApiError::missing_field("title", request_id));
    };
    let draft = NewTask::new(title, request.due_date)
        .map_err(|_| ApiError::invalid_input("title", "must not be empty", request_id.clone()))?;

    let task = api
        .store
        .insert(draft)
        .await
        .map_err(|e| ApiError::store_unavailable(e, request_id))?;

    tracing::info!(task_id = %task.id, "Created task");
    Ok(Json(task))
}

/// PATCH /tasks/{id} - Partially update a task
///
/// Fields absent from the body are left unchanged; `dueDate: null`
/// clears the due date. Title values are not re-validated here.
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    request_body = TaskPatch,
    responses(
        (status = 200, description = "The updated task", body = donelist_core::Task),
        (status = 400, description = "Malformed id or body", body = crate::error::ErrorResponse),
        (status = 404, description = "No task has this id", body = crate::error::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_task<S: TaskStore + 'static>(
    State(api): State<TaskApi<S>>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Path(id): Path<String>,
    Json(patch): Json<TaskPatch>,
) -> ApiResult<Json<donelist_core::Task>> {
    let task_id = TaskId::parse(&id)
        .map_err(|e| ApiError::invalid_input("id", e.to_string(), request_id.clone()))?;

    match api.store.update(&task_id, patch).await {
        Ok(Some(task)) => Ok(Json(task)),
        Ok(None) => Err(ApiError::task_not_found(id, request_id)),
        Err(e) => Err(ApiError::store_unavailable(e, request_id)),
    }
}

/// DELETE /tasks/{id} - Remove a task
///
/// Deleting a missing id is an error, not a no-op success.
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(("id" = String, Path, description = "Task identifier")),
    responses(
        (status = 200, description = "Task deleted", body = DeleteTaskResponse),
        (status = 400, description = "Malformed id", body = crate::error::ErrorResponse),
        (status = 404, description = "No task has this id", body = crate::error::ErrorResponse),
        (status = 503, description = "Store unavailable", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_task<S: TaskStore + 'static>(
    State(api): State<TaskApi<S>>,
    Extension(RequestIdExtension(request_id)): Extension<RequestIdExtension>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let task_id = TaskId::parse(&id)
        .map_err(|e| ApiError::invalid_input("id", e.to_string(), request_id.clone()))?;

    match api.store.delete(&task_id).await {
        Ok(true) => {
            tracing::info!(task_id = %task_id, "Deleted task");
            Ok(Json(DeleteTaskResponse {
                message: "Deleted".to_string(),
            }))
        }
        Ok(false) => Err(ApiError::task_not_found(id, request_id)),
        Err(e) => Err(ApiError::store_unavailable(e, request_id)),
    }
}
