//! Expiring Store - a uniform cache-store adapter
//!
//! Wraps an in-memory map with per-entry TTL behind set/get/mset/mget/del/
//! reset/keys/ttl, delivering results as futures, plain values or callbacks.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheValue, KeyTtl, Shared};
pub use config::{Config, StoreConfig};
pub use error::{CacheError, Result};
pub use store::{CallOptions, DeliveryMode, KeyList, Reply, Store};
pub use tasks::spawn_sweeper;
