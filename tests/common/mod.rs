#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use scripty_api::auth::ApiKey;
use scripty_api::config::AppConfig;
use scripty_api::game::{
    BlockPos, ChunkPos, Dispatcher, EngineError, EntityId, EntityType, GameEngine, GameThread,
    InMemoryEngine, Location, Material, SpawnedEntity,
};
use scripty_api::server;
use scripty_api::state::AppState;

pub const TEST_KEY: &str = "abcDEF0123456789abcDEF0123456789";

/// Engine calls seen by the game thread, in order
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    LoadChunk(String, ChunkPos),
    SetBlock(String, BlockPos, Material),
    Spawn(String, EntityType),
}

pub type CallLog = Arc<Mutex<Vec<EngineCall>>>;

/// `InMemoryEngine` that records every mutating call
pub struct RecordingEngine {
    inner: InMemoryEngine,
    calls: CallLog,
    panic_on_set_block: bool,
}

impl RecordingEngine {
    pub fn new(worlds: &[&str], calls: CallLog) -> Self {
        Self {
            inner: InMemoryEngine::with_worlds(worlds.iter().copied()),
            calls,
            panic_on_set_block: false,
        }
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl GameEngine for RecordingEngine {
    fn has_world(&self, world: &str) -> bool {
        self.inner.has_world(world)
    }

    fn is_chunk_loaded(&self, world: &str, chunk: ChunkPos) -> Result<bool, EngineError> {
        self.inner.is_chunk_loaded(world, chunk)
    }

    fn load_chunk(&mut self, world: &str, chunk: ChunkPos) -> Result<(), EngineError> {
        self.record(EngineCall::LoadChunk(world.to_string(), chunk));
        self.inner.load_chunk(world, chunk)
    }

    fn set_block(&mut self, world: &str, pos: BlockPos, material: Material) -> Result<bool, EngineError> {
        self.record(EngineCall::SetBlock(world.to_string(), pos, material));
        if self.panic_on_set_block {
            panic!("engine exploded placing {material}");
        }
        self.inner.set_block(world, pos, material)
    }

    fn block_at(&self, world: &str, pos: BlockPos) -> Result<Option<Material>, EngineError> {
        self.inner.block_at(world, pos)
    }

    fn spawn_entity(
        &mut self,
        world: &str,
        location: Location,
        entity_type: EntityType,
    ) -> Result<EntityId, EngineError> {
        self.record(EngineCall::Spawn(world.to_string(), entity_type));
        self.inner.spawn_entity(world, location, entity_type)
    }

    fn entities(&self, world: &str) -> Result<Vec<SpawnedEntity>, EngineError> {
        self.inner.entities(world)
    }

    fn tick(&mut self) {
        self.inner.tick();
    }
}

pub struct TestAppBuilder {
    api_key: ApiKey,
    max_body_bytes: Option<usize>,
    worlds: Vec<&'static str>,
    tick_interval: Duration,
    dispatch_timeout: Duration,
    panic_on_set_block: bool,
}

impl TestAppBuilder {
    pub fn api_key(mut self, key: ApiKey) -> Self {
        self.api_key = key;
        self
    }

    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = Some(limit);
        self
    }

    pub fn worlds(mut self, worlds: &[&'static str]) -> Self {
        self.worlds = worlds.to_vec();
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }

    pub fn panic_on_set_block(mut self) -> Self {
        self.panic_on_set_block = true;
        self
    }

    pub fn build(self) -> TestApp {
        let calls: CallLog = Arc::default();
        let mut engine = RecordingEngine::new(&self.worlds, Arc::clone(&calls));
        engine.panic_on_set_block = self.panic_on_set_block;

        let game_thread = GameThread::spawn(engine, self.tick_interval).expect("spawn game thread");
        let dispatcher = game_thread.dispatcher();

        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        if let Some(limit) = self.max_body_bytes {
            config.api.max_request_size_bytes = limit;
        }
        let state = AppState::new(self.api_key, dispatcher.clone(), &config)
            .with_dispatch_timeout(self.dispatch_timeout);

        TestApp {
            router: server::app(state.clone()),
            state,
            dispatcher,
            calls,
            game_thread: Some(game_thread),
        }
    }
}

/// A router wired to a live game thread over a recording engine
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub dispatcher: Dispatcher,
    pub calls: CallLog,
    game_thread: Option<GameThread>,
}

impl TestApp {
    pub fn builder() -> TestAppBuilder {
        TestAppBuilder {
            api_key: ApiKey::new(TEST_KEY),
            max_body_bytes: None,
            worlds: vec!["world"],
            tick_interval: Duration::from_millis(5),
            dispatch_timeout: Duration::from_secs(5),
            panic_on_set_block: false,
        }
    }

    pub fn new() -> Self {
        Self::builder().build()
    }

    pub async fn send(&self, method: Method, path: &str, key: Option<&str>, body: &str) -> (StatusCode, Value) {
        send(&self.router, method, path, key, body).await
    }

    pub async fn post(&self, path: &str, body: &str) -> (StatusCode, Value) {
        self.send(Method::POST, path, Some(TEST_KEY), body).await
    }

    /// Stop the game thread the way the server does on shutdown
    pub fn stop_game_thread(&mut self) {
        if let Some(game_thread) = self.game_thread.take() {
            game_thread.shutdown();
        }
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn set_block_calls(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, EngineCall::SetBlock(..)))
            .count()
    }

    /// Wait until everything queued so far has run
    pub async fn flush(&self) {
        self.dispatcher
            .call("flush", Duration::from_secs(5), |_| ())
            .await
            .expect("flush game thread");
    }

    pub async fn block_at(&self, world: &'static str, pos: BlockPos) -> Option<Material> {
        self.dispatcher
            .call("block_at", Duration::from_secs(5), move |engine| engine.block_at(world, pos))
            .await
            .expect("query game thread")
            .expect("world exists")
    }

    pub async fn entities(&self, world: &'static str) -> Vec<SpawnedEntity> {
        self.dispatcher
            .call("entities", Duration::from_secs(5), move |engine| engine.entities(world))
            .await
            .expect("query game thread")
            .expect("world exists")
    }
}

pub async fn send(router: &Router, method: Method, path: &str, key: Option<&str>, body: &str) -> (StatusCode, Value) {
    let mut request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json");
    if let Some(key) = key {
        request = request.header("X-API-Key", key);
    }
    let request = request.body(Body::from(body.to_string())).unwrap();

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}
