//! JSON in and out of the HTTP layer.
//!
//! Request bodies are lenient about nulls: a `null` number reads as its
//! default, a `null` string reads as absent. Responses always carry every
//! field, with explicit `null`s.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Parse a request body
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(body)
}

/// Serialize a response body
pub fn encode<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string(value)
}

/// `deserialize_with` helper: `null` becomes `T::default()`. Pair it with
/// `#[serde(default)]` so a missing field behaves the same.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
