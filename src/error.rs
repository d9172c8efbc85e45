// HTTP API Error Types
use axum::{extract::rejection::BytesRejection, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::{json, Value};

use crate::game::DispatchError;
use crate::middleware::response::ApiResponse;

/// Structural category of a failure, echoed in the `data.kind` field so
/// clients can branch without parsing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Auth,
    Validation,
    Method,
    NotFound,
    PayloadTooLarge,
    Engine,
    Internal,
    Unavailable,
    Timeout,
}

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(String),
    InvalidBody { message: String, detail: String },
    EngineRefused { message: String, detail: String },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 405 Method Not Allowed
    MethodNotAllowed,

    // 413 Payload Too Large
    PayloadTooLarge(String),

    // 500 Internal Server Error
    Internal(String),

    // 503 Service Unavailable
    Unavailable(String),

    // 504 Gateway Timeout (game thread did not get to the task in time)
    Timeout(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::InvalidBody { .. } => 400,
            ApiError::EngineRefused { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed => 405,
            ApiError::PayloadTooLarge(_) => 413,
            ApiError::Internal(_) => 500,
            ApiError::Unavailable(_) => 503,
            ApiError::Timeout(_) => 504,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody { .. } => ErrorKind::Validation,
            ApiError::EngineRefused { .. } => ErrorKind::Engine,
            ApiError::Unauthorized(_) => ErrorKind::Auth,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::MethodNotAllowed => ErrorKind::Method,
            ApiError::PayloadTooLarge(_) => ErrorKind::PayloadTooLarge,
            ApiError::Internal(_) => ErrorKind::Internal,
            ApiError::Unavailable(_) => ErrorKind::Unavailable,
            ApiError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    /// Get client-facing error message
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(detail) => format!("Invalid request parameters: {}", detail),
            ApiError::InvalidBody { message, .. } => message.clone(),
            ApiError::EngineRefused { message, .. } => message.clone(),
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::NotFound(msg) => msg.clone(),
            ApiError::MethodNotAllowed => "Method not allowed".to_string(),
            ApiError::PayloadTooLarge(_) => "Request body too large".to_string(),
            ApiError::Internal(detail) => format!("Internal server error: {}", detail),
            ApiError::Unavailable(msg) => msg.clone(),
            ApiError::Timeout(msg) => msg.clone(),
        }
    }

    /// Extra detail beyond the message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Validation(detail) => Some(detail),
            ApiError::InvalidBody { detail, .. } => Some(detail),
            ApiError::EngineRefused { detail, .. } => Some(detail),
            ApiError::PayloadTooLarge(detail) => Some(detail),
            ApiError::Internal(detail) => Some(detail),
            _ => None,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            // The auth gate answers with a bare error object
            ApiError::Unauthorized(msg) => json!({ "error": msg }),
            _ => serde_json::to_value(self.to_response()).unwrap_or(Value::Null),
        }
    }

    /// Response envelope for every failure except 401
    pub fn to_response(&self) -> ApiResponse {
        ApiResponse::new(self.status(), self.message()).with_data(json!({
            "kind": self.kind(),
            "detail": self.detail(),
        }))
    }

    fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(detail: impl Into<String>) -> Self {
        ApiError::Validation(detail.into())
    }

    pub fn invalid_body(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::InvalidBody {
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn engine_refused(message: impl Into<String>, detail: impl Into<String>) -> Self {
        ApiError::EngineRefused {
            message: message.into(),
            detail: detail.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn payload_too_large(detail: impl Into<String>) -> Self {
        ApiError::PayloadTooLarge(detail.into())
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        ApiError::Internal(detail.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        ApiError::Unavailable(message.into())
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        ApiError::Timeout(message.into())
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Closed => ApiError::unavailable("Game thread is not running"),
            DispatchError::Timeout(after) => ApiError::timeout(format!(
                "Game thread did not run the task within {} ms",
                after.as_millis()
            )),
            DispatchError::TaskPanicked(message) => {
                tracing::error!("game-thread task panicked: {}", message);
                ApiError::internal(message)
            }
            DispatchError::Dropped => {
                tracing::error!("game thread dropped a task before completing it");
                ApiError::internal("task was dropped before completion")
            }
        }
    }
}

/// Body extraction failures, mostly the request body limit
impl From<BytesRejection> for ApiError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::payload_too_large(rejection.body_text())
        } else {
            ApiError::invalid_body(format!("Invalid request: {}", rejection.body_text()), rejection.body_text())
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Unauthorized(_) => (self.status(), axum::Json(self.to_json())).into_response(),
            _ => self.to_response().into_response(),
        }
    }
}
