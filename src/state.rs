use std::sync::Arc;
use std::time::Duration;

use crate::auth::ApiKey;
use crate::config::AppConfig;
use crate::game::Dispatcher;

/// Shared handler state. The key is fixed once the server starts.
#[derive(Clone)]
pub struct AppState {
    pub api_key: Arc<ApiKey>,
    pub dispatcher: Dispatcher,
    pub dispatch_timeout: Duration,
    pub max_body_bytes: usize,
    pub request_logging: bool,
}

impl AppState {
    pub fn new(api_key: ApiKey, dispatcher: Dispatcher, config: &AppConfig) -> Self {
        Self {
            api_key: Arc::new(api_key),
            dispatcher,
            dispatch_timeout: config.game.dispatch_timeout(),
            max_body_bytes: config.api.max_request_size_bytes,
            request_logging: config.api.enable_request_logging,
        }
    }

    pub fn with_dispatch_timeout(mut self, timeout: Duration) -> Self {
        self.dispatch_timeout = timeout;
        self
    }
}
