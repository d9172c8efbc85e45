// handlers/protected/mod.rs - Protected handlers (X-API-Key required)
//
// Every route here sits behind middleware::api_key_middleware. Handlers never
// touch world state themselves; they queue work on the game thread through
// AppState::dispatcher.
pub mod block; // POST /api/block - place a block, wait for the result
pub mod spawn; // POST /api/spawn - queue a spawn, respond immediately

pub use block::block_post;
pub use spawn::spawn_post;
