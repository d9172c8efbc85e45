use serde::{Deserialize, Serialize};

use super::codec::null_as_default;
use crate::error::ApiError;
use crate::game::{BlockPos, EntityType, Location, Material};

/// Body of `POST /api/block`
///
/// `world` and `material` stay as raw strings here so that missing or
/// unknown values surface as validation errors rather than parse errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPlacementRequest {
    #[serde(default)]
    pub world: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub z: f64,
    #[serde(default)]
    pub material: Option<String>,
}

/// A block request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPlacement {
    pub world: String,
    pub position: BlockPos,
    pub material: Material,
}

impl BlockPlacementRequest {
    pub fn new(world: impl Into<String>, x: f64, y: f64, z: f64, material: impl Into<String>) -> Self {
        Self {
            world: Some(world.into()),
            x,
            y,
            z,
            material: Some(material.into()),
        }
    }

    pub fn validate(&self) -> Result<BlockPlacement, ApiError> {
        let world = match self.world.as_deref() {
            Some(world) if !world.is_empty() => world,
            _ => return Err(ApiError::validation("world is required")),
        };

        let material_name = match self.material.as_deref() {
            Some(material) if !material.is_empty() => material,
            _ => return Err(ApiError::validation("material is required")),
        };

        let material = material_name
            .parse::<Material>()
            .map_err(|e| ApiError::validation(e.to_string()))?;

        if !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite()) {
            return Err(ApiError::validation("coordinates must be finite numbers"));
        }

        let position = BlockPos::try_containing(self.x, self.y, self.z)
            .ok_or_else(|| ApiError::validation("coordinates out of range"))?;

        Ok(BlockPlacement {
            world: world.to_string(),
            position,
            material,
        })
    }
}

/// Body of `POST /api/spawn`. Unknown entity types fail deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySpawnRequest {
    pub world: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub x: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub y: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub z: f64,
    pub entity_type: EntityType,
}

impl EntitySpawnRequest {
    pub fn location(&self) -> Location {
        Location::new(self.x, self.y, self.z)
    }
}
