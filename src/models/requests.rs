//! Request DTOs for the store API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

/// Returns an error message for an unusable key, None if valid.
fn validate_key(key: &str) -> Option<String> {
    if key.is_empty() {
        return Some("Key cannot be empty".to_string());
    }
    None
}

/// Request body for the SET operation (PUT /set)
///
/// # Fields
/// - `key`: The cache key to store the value under
/// - `value`: Any JSON value
/// - `ttl`: Optional TTL in seconds (0 = never expire, absent = store default)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    pub key: String,
    pub value: Value,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_key(&self.key)
    }
}

/// One key/value pair of an MSET request
#[derive(Debug, Clone, Deserialize)]
pub struct EntryRequest {
    pub key: String,
    pub value: Value,
}

/// Request body for the MSET operation (POST /mset)
///
/// `ttl` applies to every entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MsetRequest {
    pub entries: Vec<EntryRequest>,
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl MsetRequest {
    pub fn validate(&self) -> Option<String> {
        if self.entries.is_empty() {
            return Some("At least one entry is required".to_string());
        }
        self.entries.iter().find_map(|entry| validate_key(&entry.key))
    }
}

/// Request body for multi-key operations (POST /mget, POST /del)
#[derive(Debug, Clone, Deserialize)]
pub struct KeysRequest {
    pub keys: Vec<String>,
}

impl KeysRequest {
    pub fn validate(&self) -> Option<String> {
        self.keys.iter().find_map(|key| validate_key(key))
    }
}
