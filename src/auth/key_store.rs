//! API key provisioning.
//!
//! The key lives in `<data_dir>/config.yml` under `api-key`. On first start a
//! fresh key is generated, saved there, and also written to
//! `<data_dir>/api-key.txt` so an operator can copy it out.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Local;
use once_cell::sync::OnceCell;
use rand::distributions::Alphanumeric;
use rand::rngs::OsRng;
use rand::{Rng, RngCore};
use serde_yaml::{Mapping, Value};
use tracing::{error, info, warn};

use super::ApiKey;

pub const KEY_LENGTH: usize = 32;
pub const CONFIG_FILE: &str = "config.yml";
pub const NOTICE_FILE: &str = "api-key.txt";
const CONFIG_KEY: &str = "api-key";
const NOTICE_PREFIX: &str = "API Key:";

#[derive(Debug, thiserror::Error)]
pub enum KeyStoreError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration in {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}

pub struct KeyStore {
    data_dir: PathBuf,
    resolved: OnceCell<ApiKey>,
}

impl KeyStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            resolved: OnceCell::new(),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    pub fn notice_path(&self) -> PathBuf {
        self.data_dir.join(NOTICE_FILE)
    }

    /// Return the persisted key, generating and persisting one on first use.
    ///
    /// The result is memoized, so the same key comes back for the lifetime of
    /// this store even if it could not be written to disk.
    pub fn get_or_create_key(&self) -> Result<ApiKey, KeyStoreError> {
        self.resolved
            .get_or_try_init(|| self.load_or_generate())
            .cloned()
    }

    fn load_or_generate(&self) -> Result<ApiKey, KeyStoreError> {
        let mut config = self.read_config()?;

        match config.get(CONFIG_KEY) {
            Some(Value::String(existing)) if !existing.is_empty() => {
                info!(path = %self.config_path().display(), "loaded API key from configuration");
                return Ok(ApiKey::new(existing.clone()));
            }
            Some(Value::String(_)) | Some(Value::Null) | None => {}
            Some(other) => {
                return Err(KeyStoreError::Config {
                    path: self.config_path(),
                    message: format!("'{}' must be a string, found {:?}", CONFIG_KEY, other),
                });
            }
        }

        let key = generate_key();
        config.insert(
            Value::String(CONFIG_KEY.to_string()),
            Value::String(key.as_str().to_string()),
        );

        if let Err(e) = self.write_config(&config) {
            error!("Could not save API key to configuration, it will change on restart: {}", e);
        }

        info!("Generated new API key. This key is required for all API requests.");

        match self.write_notice(&key) {
            Ok(path) => info!(path = %path.display(), "API key written to notice file"),
            Err(e) => warn!("Could not save API key to file: {}", e),
        }

        Ok(key)
    }

    fn read_config(&self) -> Result<Mapping, KeyStoreError> {
        let path = self.config_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Mapping::new()),
            Err(source) => return Err(KeyStoreError::Io { path, source }),
        };

        if content.trim().is_empty() {
            return Ok(Mapping::new());
        }

        match serde_yaml::from_str::<Value>(&content) {
            Ok(Value::Mapping(mapping)) => Ok(mapping),
            Ok(Value::Null) => Ok(Mapping::new()),
            Ok(_) => Err(KeyStoreError::Config {
                path,
                message: "top level must be a mapping".to_string(),
            }),
            Err(e) => Err(KeyStoreError::Config {
                path,
                message: e.to_string(),
            }),
        }
    }

    fn write_config(&self, config: &Mapping) -> Result<(), KeyStoreError> {
        let path = self.config_path();
        self.ensure_data_dir()?;

        let content = serde_yaml::to_string(config).map_err(|e| KeyStoreError::Config {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, content).map_err(|source| KeyStoreError::Io { path, source })
    }

    fn write_notice(&self, key: &ApiKey) -> Result<PathBuf, KeyStoreError> {
        let path = self.notice_path();
        self.ensure_data_dir()?;

        let content = format!(
            "{} {}\nGenerated: {}\nKeep this key secure and use it in your requests with the X-API-Key header.\n",
            NOTICE_PREFIX,
            key.as_str(),
            Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
        );
        fs::write(&path, content).map_err(|source| KeyStoreError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    fn ensure_data_dir(&self) -> Result<(), KeyStoreError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| KeyStoreError::Io {
            path: self.data_dir.clone(),
            source,
        })
    }
}

/// 256 random bits from the OS, base64url-encoded, reduced to exactly
/// `KEY_LENGTH` alphanumeric characters
pub fn generate_key() -> ApiKey {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);

    let mut token: String = URL_SAFE_NO_PAD
        .encode(bytes)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(KEY_LENGTH)
        .collect();

    // 43 encoded chars minus any '-' or '_' can fall short of 32
    while token.len() < KEY_LENGTH {
        token.push(OsRng.sample(Alphanumeric) as char);
    }

    ApiKey::new(token)
}

/// Extract the key from a notice file. Accepts the `API Key: <key>` layout
/// written by [`KeyStore`] or a file holding just the key.
pub fn read_notice_key(path: &Path) -> io::Result<Option<String>> {
    let content = fs::read_to_string(path)?;

    let from_prefix = content
        .lines()
        .find_map(|line| line.trim().strip_prefix(NOTICE_PREFIX))
        .map(str::trim);

    let key = match from_prefix {
        Some(key) => key,
        None => content.trim(),
    };

    if key.is_empty() || key.contains(char::is_whitespace) {
        return Ok(None);
    }
    Ok(Some(key.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("scripty-keystore-{}", Uuid::new_v4().simple()))
    }

    #[test]
    fn test_generated_key_shape() {
        for _ in 0..64 {
            let key = generate_key();
            assert_eq!(key.as_str().len(), KEY_LENGTH);
            assert!(key.as_str().chars().all(|c| c.is_ascii_alphanumeric()));
        }
        assert_ne!(generate_key().as_str(), generate_key().as_str());
    }

    #[test]
    fn test_key_is_persisted_and_reused_across_restarts() {
        let dir = temp_dir();

        let first = KeyStore::new(&dir).get_or_create_key().unwrap();
        let second = KeyStore::new(&dir).get_or_create_key().unwrap();
        assert_eq!(first.as_str(), second.as_str());

        let notice = read_notice_key(&dir.join(NOTICE_FILE)).unwrap();
        assert_eq!(notice.as_deref(), Some(first.as_str()));

        let config: Value = serde_yaml::from_str(&fs::read_to_string(dir.join(CONFIG_FILE)).unwrap()).unwrap();
        assert_eq!(config[CONFIG_KEY].as_str(), Some(first.as_str()));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_repeated_calls_return_same_key() {
        let dir = temp_dir();
        let store = KeyStore::new(&dir);
        let a = store.get_or_create_key().unwrap();
        let b = store.get_or_create_key().unwrap();
        assert_eq!(a.as_str(), b.as_str());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_existing_key_is_returned_unchanged() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "port: 6060\napi-key: handwritten-key\n").unwrap();

        let key = KeyStore::new(&dir).get_or_create_key().unwrap();
        assert_eq!(key.as_str(), "handwritten-key");
        assert!(!dir.join(NOTICE_FILE).exists());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_generation_preserves_other_settings() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "port: 7070\napi-key: ''\n").unwrap();

        let key = KeyStore::new(&dir).get_or_create_key().unwrap();
        let config: Value = serde_yaml::from_str(&fs::read_to_string(dir.join(CONFIG_FILE)).unwrap()).unwrap();
        assert_eq!(config["port"].as_u64(), Some(7070));
        assert_eq!(config[CONFIG_KEY].as_str(), Some(key.as_str()));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_corrupt_config_is_an_error() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "api-key: [unterminated\n").unwrap();

        let err = KeyStore::new(&dir).get_or_create_key().unwrap_err();
        assert!(matches!(err, KeyStoreError::Config { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_non_string_key_is_an_error() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(CONFIG_FILE), "api-key: 12345\n").unwrap();

        let err = KeyStore::new(&dir).get_or_create_key().unwrap_err();
        assert!(matches!(err, KeyStoreError::Config { .. }));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_notice_write_failure_is_not_fatal() {
        let dir = temp_dir();
        // A directory where the notice file should go makes the write fail
        fs::create_dir_all(dir.join(NOTICE_FILE)).unwrap();

        let store = KeyStore::new(&dir);
        let key = store.get_or_create_key().unwrap();
        assert_eq!(key.as_str().len(), KEY_LENGTH);
        assert_eq!(store.get_or_create_key().unwrap().as_str(), key.as_str());
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_read_notice_key_formats() {
        let dir = temp_dir();
        fs::create_dir_all(&dir).unwrap();

        let full = dir.join("full.txt");
        fs::write(&full, "API Key: abc123\nGenerated: 2024-01-01T00:00:00\nKeep this key secure.\n").unwrap();
        assert_eq!(read_notice_key(&full).unwrap().as_deref(), Some("abc123"));

        let bare = dir.join("bare.txt");
        fs::write(&bare, "  xyz789\n").unwrap();
        assert_eq!(read_notice_key(&bare).unwrap().as_deref(), Some("xyz789"));

        let junk = dir.join("junk.txt");
        fs::write(&junk, "not a key file at all\n").unwrap();
        assert_eq!(read_notice_key(&junk).unwrap(), None);

        fs::remove_dir_all(&dir).ok();
    }
}
