//! Request and response DTOs for the REST endpoints

pub mod requests;
pub mod responses;

pub use requests::{CreateTaskRequest, ListTasksQuery};
pub use responses::{DeleteTaskResponse, HealthResponse, TaskListResponse};
