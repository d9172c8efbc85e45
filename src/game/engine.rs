//! The narrow interface through which the game thread touches world state,
//! plus an in-memory engine used by the standalone server and the tests.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EntityType, Material};

pub type EntityId = Uuid;

/// Lowest buildable block height (inclusive)
pub const MIN_BUILD_HEIGHT: i32 = -64;
/// Highest buildable block height (exclusive)
pub const MAX_BUILD_HEIGHT: i32 = 320;

/// Integer block coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Block containing the given point. Each component is floored, so
    /// `-0.5` lands in block `-1`.
    pub fn containing(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: x.floor() as i32,
            y: y.floor() as i32,
            z: z.floor() as i32,
        }
    }

    /// Like [`BlockPos::containing`], but `None` when a floored component
    /// does not fit in an `i32`
    pub fn try_containing(x: f64, y: f64, z: f64) -> Option<Self> {
        let range = f64::from(i32::MIN)..=f64::from(i32::MAX);
        [x, y, z]
            .iter()
            .all(|c| range.contains(&c.floor()))
            .then(|| Self::containing(x, y, z))
    }

    pub fn chunk(&self) -> ChunkPos {
        ChunkPos {
            x: self.x >> 4,
            z: self.z >> 4,
        }
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// 16x16 column of blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Location {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn block(&self) -> BlockPos {
        BlockPos::containing(self.x, self.y, self.z)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("world '{0}' not found")]
    WorldNotFound(String),

    #[error("block placement at {pos} refused: {reason}")]
    PlacementRefused { pos: BlockPos, reason: String },

    #[error("location {0} is outside the world")]
    OutOfBounds(Location),

    #[error("chunk {chunk} in world '{world}' is not loaded")]
    ChunkNotLoaded { world: String, chunk: ChunkPos },

    #[error("{0}")]
    Internal(String),
}

impl EngineError {
    /// Expected refusals (bad world, engine said no) as opposed to faults
    pub fn is_refusal(&self) -> bool {
        matches!(
            self,
            EngineError::WorldNotFound(_)
                | EngineError::PlacementRefused { .. }
                | EngineError::OutOfBounds(_)
        )
    }
}

/// Host engine operations. Only ever called from the game thread.
pub trait GameEngine: Send {
    fn has_world(&self, world: &str) -> bool;

    fn is_chunk_loaded(&self, world: &str, chunk: ChunkPos) -> Result<bool, EngineError>;

    fn load_chunk(&mut self, world: &str, chunk: ChunkPos) -> Result<(), EngineError>;

    /// Returns `Ok(false)` when the engine refuses the placement.
    fn set_block(&mut self, world: &str, pos: BlockPos, material: Material) -> Result<bool, EngineError>;

    fn block_at(&self, world: &str, pos: BlockPos) -> Result<Option<Material>, EngineError>;

    fn spawn_entity(
        &mut self,
        world: &str,
        location: Location,
        entity_type: EntityType,
    ) -> Result<EntityId, EngineError>;

    fn entities(&self, world: &str) -> Result<Vec<SpawnedEntity>, EngineError>;

    /// Advanced once per game-thread tick, before queued tasks run
    fn tick(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnedEntity {
    pub id: EntityId,
    pub entity_type: EntityType,
    pub location: Location,
    pub spawned_at_tick: u64,
}

#[derive(Debug, Default)]
struct WorldState {
    loaded_chunks: HashSet<ChunkPos>,
    blocks: HashMap<BlockPos, Material>,
    entities: Vec<SpawnedEntity>,
}

#[derive(Debug, Default)]
pub struct InMemoryEngine {
    worlds: HashMap<String, WorldState>,
    tick: u64,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_worlds<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut engine = Self::new();
        for name in names {
            engine.create_world(name);
        }
        engine
    }

    pub fn create_world(&mut self, name: impl Into<String>) {
        self.worlds.entry(name.into()).or_default();
    }

    pub fn world_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.worlds.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    fn world(&self, name: &str) -> Result<&WorldState, EngineError> {
        self.worlds
            .get(name)
            .ok_or_else(|| EngineError::WorldNotFound(name.to_string()))
    }

    fn world_mut(&mut self, name: &str) -> Result<&mut WorldState, EngineError> {
        self.worlds
            .get_mut(name)
            .ok_or_else(|| EngineError::WorldNotFound(name.to_string()))
    }
}

impl GameEngine for InMemoryEngine {
    fn has_world(&self, world: &str) -> bool {
        self.worlds.contains_key(world)
    }

    fn is_chunk_loaded(&self, world: &str, chunk: ChunkPos) -> Result<bool, EngineError> {
        Ok(self.world(world)?.loaded_chunks.contains(&chunk))
    }

    fn load_chunk(&mut self, world: &str, chunk: ChunkPos) -> Result<(), EngineError> {
        self.world_mut(world)?.loaded_chunks.insert(chunk);
        Ok(())
    }

    fn set_block(&mut self, world: &str, pos: BlockPos, material: Material) -> Result<bool, EngineError> {
        let state = self.world_mut(world)?;
        if !state.loaded_chunks.contains(&pos.chunk()) {
            return Err(EngineError::ChunkNotLoaded {
                world: world.to_string(),
                chunk: pos.chunk(),
            });
        }
        if !(MIN_BUILD_HEIGHT..MAX_BUILD_HEIGHT).contains(&pos.y) {
            return Ok(false);
        }

        if material == Material::Air {
            state.blocks.remove(&pos);
        } else {
            state.blocks.insert(pos, material);
        }
        Ok(true)
    }

    fn block_at(&self, world: &str, pos: BlockPos) -> Result<Option<Material>, EngineError> {
        Ok(self.world(world)?.blocks.get(&pos).copied())
    }

    fn spawn_entity(
        &mut self,
        world: &str,
        location: Location,
        entity_type: EntityType,
    ) -> Result<EntityId, EngineError> {
        let tick = self.tick;
        let state = self.world_mut(world)?;
        let block = match BlockPos::try_containing(location.x, location.y, location.z) {
            Some(block) if (MIN_BUILD_HEIGHT..MAX_BUILD_HEIGHT).contains(&block.y) => block,
            _ => return Err(EngineError::OutOfBounds(location)),
        };

        // Spawning pulls the chunk in, like the host engine does
        state.loaded_chunks.insert(block.chunk());

        let id = Uuid::new_v4();
        state.entities.push(SpawnedEntity {
            id,
            entity_type,
            location,
            spawned_at_tick: tick,
        });
        Ok(id)
    }

    fn entities(&self, world: &str) -> Result<Vec<SpawnedEntity>, EngineError> {
        Ok(self.world(world)?.entities.clone())
    }

    fn tick(&mut self) {
        self.tick += 1;
    }
}
