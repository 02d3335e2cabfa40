//! Response DTOs for the store API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::Value;

use crate::cache::{CacheStats, KeyTtl};

/// Response body for GET /get/:key
///
/// `value` is `null` when the key is absent or expired.
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Option<Value>,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for PUT /set
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    pub key: String,
    /// The value as stored
    pub value: Value,
}

impl SetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for POST /mset
#[derive(Debug, Clone, Serialize)]
pub struct MsetResponse {
    /// Stored values, in request order
    pub values: Vec<Value>,
}

/// Response body for POST /mget
#[derive(Debug, Clone, Serialize)]
pub struct MgetResponse {
    /// One slot per requested key, `null` for absent keys
    pub values: Vec<Option<Value>>,
}

/// Response body for DELETE /del/:key and POST /del
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub keys: Vec<String>,
}

impl DeleteResponse {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            message: format!("{} key(s) deleted", keys.len()),
            keys,
        }
    }
}

/// Response body for GET /keys
#[derive(Debug, Clone, Serialize)]
pub struct KeysResponse {
    pub keys: Vec<String>,
}

/// Response body for GET /ttl/:key
#[derive(Debug, Clone, Serialize)]
pub struct TtlResponse {
    pub key: String,
    /// One of `missing`, `no_expiry`, `expires`
    pub status: &'static str,
    /// Expiry instant in ISO 8601 format, only when `status` is `expires`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl TtlResponse {
    pub fn new(key: impl Into<String>, ttl: KeyTtl) -> Self {
        let (status, expires_at) = match ttl {
            KeyTtl::Missing => ("missing", None),
            KeyTtl::NoExpiry => ("no_expiry", None),
            KeyTtl::ExpiresAt(at) => ("expires", Some(at.to_rfc3339())),
        };
        Self {
            key: key.into(),
            status,
            expires_at,
        }
    }
}

/// Generic acknowledgement body (POST /reset)
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Name of the store backend
    pub store: &'static str,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(store: &'static str) -> Self {
        Self {
            status: "healthy".to_string(),
            store,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
