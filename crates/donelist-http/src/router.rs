//! Router configuration
//!
//! Routes, CORS, tracing, request-id correlation, and the defensive
//! timeout/body-size layers. Cross-origin access is restricted to the one
//! configured origin; there is deliberately no wildcard path.

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, patch},
};
use tower_http::{
    cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use donelist_store::TaskStore;

use crate::config::ConfigError;
use crate::error::request_id_middleware;
use crate::handlers::{create_task, delete_task, health_check, list_tasks, update_task};
use crate::openapi::openapi_router;
use crate::service::TaskApi;

/// Build the axum router for the task service.
///
/// # Errors
///
/// Returns `ConfigError` when the configured CORS origin is not a valid
/// header value.
pub fn router<S: TaskStore + 'static>(api: TaskApi<S>) -> Result<Router, ConfigError> {
    let config = api.config.clone();

    let origin: HeaderValue =
        config
            .allowed_origin
            .parse()
            .map_err(|e| ConfigError::ValidationError(format!(
                "allowed_origin '{}' is not a valid header value: {e}",
                config.allowed_origin
            )))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let mut router = Router::new()
        .route("/tasks", get(list_tasks::<S>).post(create_task::<S>))
        .route(
            "/tasks/{id}",
            patch(update_task::<S>).delete(delete_task::<S>),
        )
        .route("/health", get(health_check))
        .with_state(api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.max_body_size))
        .layer(cors);

    if config.enable_openapi {
        router = router.merge(openapi_router());
    }

    Ok(router)
}
