// handlers/protected/block.rs - POST /api/block handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
};
use serde_json::json;
use tracing::{debug, error};

use crate::api::{codec, BlockPlacement, BlockPlacementRequest};
use crate::error::ApiError;
use crate::game::{BlockPos, EngineError, GameEngine};
use crate::middleware::ApiResponse;
use crate::state::AppState;

/**
 * POST /api/block - Place a single block
 *
 * Input:
 * ```json
 * { "world": "world", "x": 10, "y": 65, "z": 10, "material": "STONE" }
 * ```
 *
 * The request is validated here, on the HTTP side. The placement itself runs
 * on the game thread and this handler waits for its result (bounded by the
 * dispatch timeout), so the response reflects what the engine actually did.
 *
 * - 200 placed
 * - 400 invalid body / parameters, unknown world, engine refused
 * - 413 body over the configured limit
 * - 500 engine fault or panicking task
 * - 503 game thread stopped, 504 game thread too slow
 */
pub async fn block_post(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse, ApiError> {
    let body = body?;
    let request: BlockPlacementRequest = codec::decode(&body)
        .map_err(|e| ApiError::invalid_body(format!("Invalid request: {}", e), e.to_string()))?;

    let placement = request.validate()?;

    let task = placement.clone();
    let outcome = state
        .dispatcher
        .call("place_block", state.dispatch_timeout, move |engine| place_block(engine, &task))
        .await?;

    match outcome {
        Ok(position) => {
            debug!(world = %placement.world, %position, material = %placement.material, "block placed");
            Ok(ApiResponse::ok("Block placed successfully").with_data(json!({
                "world": placement.world,
                "x": position.x,
                "y": position.y,
                "z": position.z,
                "material": placement.material,
            })))
        }
        Err(e) if e.is_refusal() => {
            debug!(world = %placement.world, "block placement refused: {}", e);
            Err(ApiError::engine_refused("Failed to place block", e.to_string()))
        }
        Err(e) => {
            error!(world = %placement.world, "error placing block: {}", e);
            Err(ApiError::internal(e.to_string()))
        }
    }
}

/// Runs on the game thread: resolve the world, make sure the chunk is
/// loaded, then set the block
pub fn place_block(engine: &mut dyn GameEngine, placement: &BlockPlacement) -> Result<BlockPos, EngineError> {
    let world = placement.world.as_str();
    if !engine.has_world(world) {
        return Err(EngineError::WorldNotFound(world.to_string()));
    }

    let position = placement.position;
    let chunk = position.chunk();
    if !engine.is_chunk_loaded(world, chunk)? {
        engine.load_chunk(world, chunk)?;
    }

    if engine.set_block(world, position, placement.material)? {
        Ok(position)
    } else {
        Err(EngineError::PlacementRefused {
            pos: position,
            reason: "engine rejected the block".to_string(),
        })
    }
}
