// handlers/public/health.rs - GET /health handler

use axum::extract::State;
use serde_json::json;

use crate::error::ApiError;
use crate::game::DispatchError;
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// GET /health - liveness plus game-thread progress
///
/// `tick` only moves while the game thread is alive, so a stalled value means
/// block requests will start timing out.
pub async fn health_get(State(state): State<AppState>) -> Result<ApiResponse, ApiError> {
    let dispatcher = &state.dispatcher;

    if dispatcher.is_closed() {
        return Err(DispatchError::Closed.into());
    }

    Ok(ApiResponse::ok("ok").with_data(json!({
        "tick": dispatcher.current_tick(),
        "queued": dispatcher.queued(),
    })))
}
