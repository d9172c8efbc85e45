pub mod codec;
pub mod models;

pub use models::{BlockPlacement, BlockPlacementRequest, EntitySpawnRequest};
