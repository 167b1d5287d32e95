//! # Donelist HTTP
//!
//! REST API for the donelist task service: stateless handlers that
//! translate requests into store operations and shape JSON responses.
//! The wire contract (filter defaults, pagination arithmetic, error
//! taxonomy) lives here.

pub mod config;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod router;
pub mod service;
pub mod types;

pub use config::{ConfigError, ServiceConfig, ServiceConfigBuilder};
pub use error::{ApiError, ApiErrorKind, ErrorCode, ErrorResponse};
pub use router::router;
pub use service::{ServeError, TaskApi, serve};
pub use types::{
    CreateTaskRequest, DeleteTaskResponse, HealthResponse, ListTasksQuery, TaskListResponse,
};
