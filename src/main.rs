use anyhow::Context;
use tracing_subscriber::EnvFilter;

use scripty_api::auth::KeyStore;
use scripty_api::game::{GameThread, InMemoryEngine};
use scripty_api::server;
use scripty_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up SCRIPTY_PORT, SCRIPTY_DATA_DIR, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = scripty_api::config::config();
    tracing::info!("Starting Scripty API in {:?} mode", config.environment);

    let key_store = KeyStore::new(&config.server.data_dir);
    let api_key = key_store
        .get_or_create_key()
        .context("failed to initialize API key")?;
    tracing::info!("API Key location: {}", key_store.notice_path().display());

    let engine = InMemoryEngine::with_worlds(config.game.worlds.iter().cloned());
    tracing::info!(worlds = ?engine.world_names(), "loaded worlds");

    let game_thread = GameThread::spawn(engine, config.game.tick_interval())
        .context("failed to start game thread")?;

    let state = AppState::new(api_key, game_thread.dispatcher(), config);
    let result = server::serve(config, state, server::shutdown_signal()).await;

    game_thread.shutdown();
    result.context("REST API server failed")?;
    Ok(())
}
