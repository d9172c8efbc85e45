use std::time::Duration;

use reqwest::StatusCode;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::config::ClientConfig;
use crate::api::{BlockPlacementRequest, EntitySpawnRequest};
use crate::middleware::{ApiResponse, API_KEY_HEADER};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid or missing API key")]
    Authentication,

    #[error("Server error: {0}")]
    Server(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Failed to connect to server at {0}")]
    Connection(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl ClientError {
    /// Stable code for `--json` output
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Authentication => "AUTHENTICATION",
            ClientError::Server(_) => "SERVER_ERROR",
            ClientError::Timeout(_) => "TIMEOUT",
            ClientError::Connection(_) => "CONNECTION",
            ClientError::Request(_) => "REQUEST",
        }
    }
}

/// Thin HTTP client for the two API endpoints
pub struct ScriptyClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    timeout: Duration,
}

impl ScriptyClient {
    pub fn new(config: &ClientConfig, api_key: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url())
            .map_err(|e| ClientError::Request(format!("invalid server address: {}", e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    pub async fn place_block(&self, request: &BlockPlacementRequest) -> Result<ApiResponse, ClientError> {
        self.post("api/block", request).await
    }

    pub async fn spawn_entity(&self, request: &EntitySpawnRequest) -> Result<ApiResponse, ClientError> {
        self.post("api/spawn", request).await
    }

    async fn post<T: Serialize>(&self, endpoint: &str, body: &T) -> Result<ApiResponse, ClientError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| ClientError::Request(e.to_string()))?;

        let response = self
            .http
            .post(url.clone())
            .header(API_KEY_HEADER, &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e, &url))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Authentication);
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.classify(e, &url))?;

        if !status.is_success() {
            return Err(ClientError::Server(error_message(status, &text)));
        }

        serde_json::from_str::<ApiResponse>(&text)
            .map_err(|e| ClientError::Request(format!("unexpected response body: {}", e)))
    }

    fn classify(&self, err: reqwest::Error, url: &Url) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(self.timeout.as_secs())
        } else if err.is_connect() {
            ClientError::Connection(url.to_string())
        } else {
            ClientError::Request(err.to_string())
        }
    }
}

/// Best human-readable error from a failed response body
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for field in ["error", "message"] {
            if let Some(message) = value.get(field).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    if body.trim().is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        body.trim().to_string()
    }
}
