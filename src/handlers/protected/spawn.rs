// handlers/protected/spawn.rs - POST /api/spawn handler

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
};
use tracing::{debug, warn};

use crate::api::{codec, EntitySpawnRequest};
use crate::error::ApiError;
use crate::game::{EngineError, EntityId, GameEngine};
use crate::middleware::ApiResponse;
use crate::state::AppState;

/// POST /api/spawn - Queue an entity spawn
///
/// Fire-and-forget: the 200 means the spawn was accepted and queued for the
/// game thread, not that it succeeded. Failures on the game thread (unknown
/// world, engine refusal) are only logged.
pub async fn spawn_post(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<ApiResponse, ApiError> {
    let body = body?;
    let request: EntitySpawnRequest = codec::decode(&body)
        .map_err(|e| ApiError::invalid_body(format!("Error: {}", e), e.to_string()))?;

    state.dispatcher.submit("spawn_entity", move |engine| {
        match spawn_entity(engine, &request) {
            Ok(id) => debug!(
                entity_id = %id,
                world = %request.world,
                entity_type = %request.entity_type,
                "entity spawned"
            ),
            Err(e) => warn!("Failed to spawn entity: {}", e),
        }
    })?;

    Ok(ApiResponse::ok("Entity spawn scheduled"))
}

/// Runs on the game thread
pub fn spawn_entity(engine: &mut dyn GameEngine, request: &EntitySpawnRequest) -> Result<EntityId, EngineError> {
    if !engine.has_world(&request.world) {
        return Err(EngineError::WorldNotFound(request.world.clone()));
    }
    engine.spawn_entity(&request.world, request.location(), request.entity_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{EntityType, InMemoryEngine};

    fn request(world: &str) -> EntitySpawnRequest {
        EntitySpawnRequest {
            world: world.to_string(),
            x: 0.0,
            y: 70.0,
            z: 0.0,
            entity_type: EntityType::Zombie,
        }
    }

    #[test]
    fn test_spawn_entity_in_known_world() {
        let mut engine = InMemoryEngine::with_worlds(["world"]);
        let id = spawn_entity(&mut engine, &request("world")).unwrap();
        let entities = engine.entities("world").unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, id);
        assert_eq!(entities[0].entity_type, EntityType::Zombie);
    }

    #[test]
    fn test_spawn_entity_unknown_world() {
        let mut engine = InMemoryEngine::with_worlds(["world"]);
        let err = spawn_entity(&mut engine, &request("")).unwrap_err();
        assert_eq!(err, EngineError::WorldNotFound(String::new()));
    }
}
