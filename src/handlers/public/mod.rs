// handlers/public/mod.rs - Public handlers (no API key required)
pub mod health;

pub use health::health_get;
