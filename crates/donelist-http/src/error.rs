//! API error handling
//!
//! The original contract collapsed validation, not-found, and backend
//! failures into generic responses; here each category is a distinct
//! [`ApiErrorKind`] with its own status code and machine-readable
//! [`ErrorCode`]. Every request carries a request id for log correlation,
//! taken from a valid `X-Request-ID` header or generated.

use axum::{
    extract::Request,
    http::{
        StatusCode,
        header::{self, HeaderValue},
    },
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use donelist_core::{RequestId, StoreError};

/// Maximum length for client-provided request IDs.
const MAX_REQUEST_ID_LENGTH: usize = 128;

/// Client-provided request IDs must be non-empty, bounded, and contain
/// only alphanumerics, hyphens, and underscores; anything else is
/// replaced with a generated id to keep log lines clean.
fn acceptable_request_id(s: &str) -> bool {
    !s.is_empty()
        && s.len() <= MAX_REQUEST_ID_LENGTH
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Extension for storing the request id in axum request extensions.
#[derive(Debug, Clone)]
pub struct RequestIdExtension(pub RequestId);

/// Middleware that extracts or generates a request id and echoes it in
/// the `X-Request-ID` response header.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| acceptable_request_id(s))
        .map(|s| RequestId::new_unchecked(s.to_string()))
        .unwrap_or_else(RequestId::generate);

    request
        .extensions_mut()
        .insert(RequestIdExtension(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(
            header::HeaderName::from_static("x-request-id"),
            header_value,
        );
    }

    response
}

/// Type-safe error codes returned in the `error` field of responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// A field value failed validation.
    InvalidInput,
    /// A required field was missing.
    MissingRequiredField,
    /// No task has the requested id.
    TaskNotFound,
    /// The document store failed or was unreachable.
    StoreUnavailable,
    /// Unexpected server-side failure.
    InternalError,
}

impl ErrorCode {
    /// Get the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::MissingRequiredField => "missing_required_field",
            Self::TaskNotFound => "task_not_found",
            Self::StoreUnavailable => "store_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured error response body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code.
    #[schema(example = "task_not_found")]
    pub error: String,
    /// Human-readable error message.
    #[schema(example = "Task with ID 'abc' not found")]
    pub message: String,
    /// Optional additional context.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
    /// Request id for log correlation.
    #[schema(value_type = String)]
    pub request_id: RequestId,
    /// When the error occurred.
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Specific error information per category.
#[derive(Debug, Clone)]
pub enum ApiErrorKind {
    /// A field value failed validation.
    InvalidInput { field: String, reason: String },

    /// A required field was missing from the request.
    MissingField { field: String },

    /// The operation targeted an id no task has.
    TaskNotFound { id: String },

    /// The document store failed; no partial results are returned.
    StoreUnavailable { reason: String },

    /// Unexpected failure not covered by the other categories.
    Internal { reason: String },
}

/// API error with request correlation.
#[derive(Debug)]
pub struct ApiError {
    /// Request id for tracking and correlation.
    pub request_id: RequestId,
    /// Specific error information.
    pub kind: ApiErrorKind,
}

impl ApiError {
    /// Create a new API error with the given kind and request id.
    pub fn new(kind: ApiErrorKind, request_id: RequestId) -> Self {
        Self { request_id, kind }
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(
        field: impl Into<String>,
        reason: impl Into<String>,
        request_id: RequestId,
    ) -> Self {
        Self::new(
            ApiErrorKind::InvalidInput {
                field: field.into(),
                reason: reason.into(),
            },
            request_id,
        )
    }

    /// Create a MissingField error.
    pub fn missing_field(field: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            ApiErrorKind::MissingField {
                field: field.into(),
            },
            request_id,
        )
    }

    /// Create a TaskNotFound error.
    pub fn task_not_found(id: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(ApiErrorKind::TaskNotFound { id: id.into() }, request_id)
    }

    /// Create a StoreUnavailable error from a store failure.
    pub fn store_unavailable(error: StoreError, request_id: RequestId) -> Self {
        Self::new(
            ApiErrorKind::StoreUnavailable {
                reason: error.to_string(),
            },
            request_id,
        )
    }

    /// Create an Internal error.
    pub fn internal(reason: impl Into<String>, request_id: RequestId) -> Self {
        Self::new(
            ApiErrorKind::Internal {
                reason: reason.into(),
            },
            request_id,
        )
    }

    /// Get the appropriate HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match &self.kind {
            ApiErrorKind::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiErrorKind::MissingField { .. } => StatusCode::BAD_REQUEST,
            ApiErrorKind::TaskNotFound { .. } => StatusCode::NOT_FOUND,
            ApiErrorKind::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorKind::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the machine-readable code for this error.
    pub fn error_code(&self) -> ErrorCode {
        match &self.kind {
            ApiErrorKind::InvalidInput { .. } => ErrorCode::InvalidInput,
            ApiErrorKind::MissingField { .. } => ErrorCode::MissingRequiredField,
            ApiErrorKind::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            ApiErrorKind::StoreUnavailable { .. } => ErrorCode::StoreUnavailable,
            ApiErrorKind::Internal { .. } => ErrorCode::InternalError,
        }
    }

    /// Convert this error into a structured response body.
    ///
    /// Store and internal failure reasons stay server-side in the logs;
    /// clients get the category and the request id.
    pub fn to_error_response(&self) -> ErrorResponse {
        let message = match &self.kind {
            ApiErrorKind::InvalidInput { field, .. } => {
                format!("Invalid value provided for field '{}'.", field)
            }
            ApiErrorKind::MissingField { field } => {
                format!("Required field '{}' is missing.", field)
            }
            ApiErrorKind::TaskNotFound { id } => {
                format!("Task with ID '{}' not found", id)
            }
            ApiErrorKind::StoreUnavailable { .. } => {
                "The task store is temporarily unavailable. Please try again later.".to_string()
            }
            ApiErrorKind::Internal { .. } => {
                "An internal error occurred. Please try again later.".to_string()
            }
        };

        let details = match &self.kind {
            ApiErrorKind::InvalidInput { field, reason } => Some(serde_json::json!({
                "field": field,
                "reason": reason,
            })),
            ApiErrorKind::MissingField { field } => Some(serde_json::json!({
                "field": field,
            })),
            _ => None,
        };

        ErrorResponse {
            error: self.error_code().as_str().to_string(),
            message,
            details,
            request_id: self.request_id.clone(),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ApiErrorKind::InvalidInput { field, reason } => {
                write!(f, "Invalid input for '{}': {}", field, reason)
            }
            ApiErrorKind::MissingField { field } => {
                write!(f, "Missing required field: {}", field)
            }
            ApiErrorKind::TaskNotFound { id } => write!(f, "Task not found: {}", id),
            ApiErrorKind::StoreUnavailable { reason } => {
                write!(f, "Store unavailable: {}", reason)
            }
            ApiErrorKind::Internal { reason } => write!(f, "Internal error: {}", reason),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = self.to_error_response();

        tracing::error!(
            error_code = %self.error_code(),
            request_id = %self.request_id,
            status_code = %status_code,
            error_message = %self,
            "API error"
        );

        (status_code, Json(error_response)).into_response()
    }
}

/// Result type alias for handler operations.
pub type ApiResult<T> = Result<T, ApiError>;
