use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::auth::read_notice_key;

pub const API_KEY_ENV: &str = "SCRIPTY_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub protocol: String,
    pub api_key: Option<String>,
    pub default_world: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 6060,
            protocol: "http".to_string(),
            api_key: None,
            default_world: "world".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.protocol, self.host, self.port)
    }

    /// Explicit key first, then `SCRIPTY_API_KEY`, then the first readable
    /// notice file from [`candidate_key_files`]
    pub fn resolve_api_key(&self) -> anyhow::Result<String> {
        if let Some(key) = self.api_key.as_ref().filter(|k| !k.is_empty()) {
            return Ok(key.clone());
        }

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                return Ok(key);
            }
        }

        let candidates = candidate_key_files();
        if let Some(key) = discover_key_file(&candidates) {
            return Ok(key);
        }

        anyhow::bail!(
            "API key not found. Please either:\n\
             1. Pass --api-key\n\
             2. Set the {} environment variable\n\
             3. Place api-key.txt in the current directory\n\
             4. Place api-key.txt in plugins/Scripty/\n\
             5. Place api-key.txt in ~/.scripty/",
            API_KEY_ENV
        )
    }
}

/// Places an operator is likely to have copied the notice file to
pub fn candidate_key_files() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("api-key.txt"),
        PathBuf::from("plugins").join("Scripty").join("api-key.txt"),
    ];
    if let Ok(home) = std::env::var("HOME") {
        candidates.push(PathBuf::from(home).join(".scripty").join("api-key.txt"));
    }
    candidates
}

pub fn discover_key_file(candidates: &[PathBuf]) -> Option<String> {
    candidates
        .iter()
        .filter(|path| path.is_file())
        .find_map(|path| read_notice_key(path).ok().flatten())
}
