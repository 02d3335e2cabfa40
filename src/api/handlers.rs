//! API Handlers
//!
//! HTTP request handlers that forward to the shared store.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, KeysRequest, KeysResponse, MessageResponse,
    MgetResponse, MsetRequest, MsetResponse, SetRequest, SetResponse, StatsResponse, TtlResponse,
};
use crate::store::{CallOptions, Store};

/// Application state shared across all handlers.
///
/// `Store` is internally synchronized and cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub store: Store<Value>,
}

impl AppState {
    pub fn new(store: Store<Value>) -> Self {
        Self { store }
    }

    /// Creates a new AppState with a store built from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Store::new(config.store_config()))
    }
}

fn check(validation: Option<String>) -> Result<()> {
    match validation {
        Some(message) => Err(CacheError::InvalidRequest(message)),
        None => Ok(()),
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    check(req.validate())?;

    let stored = state
        .store
        .set(req.key.clone(), req.value, CallOptions { ttl: req.ttl })?
        .await;

    Ok(Json(SetResponse::new(req.key, stored)))
}

/// Handler for POST /mset
pub async fn mset_handler(
    State(state): State<AppState>,
    Json(req): Json<MsetRequest>,
) -> Result<Json<MsetResponse>> {
    check(req.validate())?;

    let pairs = req.entries.into_iter().map(|entry| (entry.key, entry.value));
    let values = state.store.mset(pairs, CallOptions { ttl: req.ttl })?.await;

    Ok(Json(MsetResponse { values }))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<GetResponse> {
    let value = state.store.get(&key, ()).await;
    Json(GetResponse::new(key, value))
}

/// Handler for POST /mget
pub async fn mget_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<MgetResponse>> {
    check(req.validate())?;

    let values = state.store.mget(req.keys, ()).await;
    Ok(Json(MgetResponse { values }))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    state.store.del(key.as_str(), ()).await;
    Json(DeleteResponse::new(vec![key]))
}

/// Handler for POST /del
pub async fn delete_many_handler(
    State(state): State<AppState>,
    Json(req): Json<KeysRequest>,
) -> Result<Json<DeleteResponse>> {
    check(req.validate())?;

    state.store.del(req.keys.as_slice(), ()).await;
    Ok(Json(DeleteResponse::new(req.keys)))
}

/// Handler for POST /reset
pub async fn reset_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.store.reset().await;
    Json(MessageResponse::new("Store reset"))
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let mut keys = state.store.keys().await;
    keys.sort();
    Json(KeysResponse { keys })
}

/// Handler for GET /ttl/:key
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<TtlResponse> {
    let ttl = state.store.ttl(&key);
    Json(TtlResponse::new(key, ttl))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store.stats()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.store.name()))
}
