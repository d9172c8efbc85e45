use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub game: GameConfig,
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding `config.yml` and the `api-key.txt` notice file
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub tick_interval_ms: u64,
    /// How long a handler waits for the game thread before giving up with 504
    pub dispatch_timeout_ms: u64,
    pub worlds: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

impl GameConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SCRIPTY_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("SCRIPTY_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("SCRIPTY_DATA_DIR") {
            self.server.data_dir = PathBuf::from(v);
        }

        // Game thread overrides
        if let Ok(v) = env::var("SCRIPTY_TICK_INTERVAL_MS") {
            self.game.tick_interval_ms = v.parse().unwrap_or(self.game.tick_interval_ms);
        }
        if let Ok(v) = env::var("SCRIPTY_DISPATCH_TIMEOUT_MS") {
            self.game.dispatch_timeout_ms = v.parse().unwrap_or(self.game.dispatch_timeout_ms);
        }
        if let Ok(v) = env::var("SCRIPTY_WORLDS") {
            let worlds: Vec<String> = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !worlds.is_empty() {
                self.game.worlds = worlds;
            }
        }

        // API overrides
        if let Ok(v) = env::var("SCRIPTY_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("SCRIPTY_MAX_BODY_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 6060,
                data_dir: PathBuf::from("plugins/Scripty"),
            },
            game: GameConfig {
                tick_interval_ms: 50, // 20 TPS
                dispatch_timeout_ms: 5_000,
                worlds: default_worlds(),
            },
            api: ApiConfig {
                enable_request_logging: true,
                max_request_size_bytes: 64 * 1024, // 64KB
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 6060,
                data_dir: PathBuf::from("plugins/Scripty"),
            },
            game: GameConfig {
                tick_interval_ms: 50,
                dispatch_timeout_ms: 3_000,
                worlds: default_worlds(),
            },
            api: ApiConfig {
                enable_request_logging: false,
                max_request_size_bytes: 16 * 1024,
            },
        }
    }
}

fn default_worlds() -> Vec<String> {
    vec![
        "world".to_string(),
        "world_nether".to_string(),
        "world_the_end".to_string(),
    ]
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
