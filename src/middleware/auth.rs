use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "X-API-Key";

pub const UNAUTHORIZED_MESSAGE: &str =
    "Unauthorized: Invalid or missing API key. Include your API key in the X-API-Key header.";

/// API key gate in front of every `/api/*` route. Requests without the exact
/// key never reach the handler.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let supplied = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match supplied {
        Some(candidate) if state.api_key.matches(candidate) => Ok(next.run(request).await),
        Some(_) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "rejected request with invalid API key"
            );
            Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE))
        }
        None => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "rejected request without API key"
            );
            Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE))
        }
    }
}
