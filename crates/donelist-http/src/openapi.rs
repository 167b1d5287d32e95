//! OpenAPI document for the REST surface

use axum::{Router, response::Json, routing::get};
use utoipa::OpenApi;

/// OpenAPI documentation for the task service.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "donelist",
        description = "Single-user to-do task service",
    ),
    paths(
        crate::handlers::tasks::list_tasks,
        crate::handlers::tasks::create_task,
        crate::handlers::tasks::update_task,
        crate::handlers::tasks::delete_task,
        crate::handlers::health::health_check,
    ),
    components(schemas(
        donelist_core::Task,
        donelist_core::TaskPatch,
        donelist_core::TaskFilter,
        crate::types::CreateTaskRequest,
        crate::types::TaskListResponse,
        crate::types::DeleteTaskResponse,
        crate::types::HealthResponse,
        crate::error::ErrorResponse,
    )),
    tags((name = "tasks", description = "Task management endpoints"))
)]
pub struct ApiDoc;

/// Router serving the OpenAPI document.
pub fn openapi_router() -> Router {
    Router::new().route("/api-docs/openapi.json", get(openapi_spec))
}

async fn openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
