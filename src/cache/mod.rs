//! Cache Module
//!
//! Provides the in-memory map with per-entry TTL that backs the store.

mod entry;
mod map;
mod stats;
mod value;


// Re-export public types
pub use entry::CacheEntry;
pub use map::{ExpiringMap, KeyTtl};
pub use stats::CacheStats;
pub use value::{clone_if_composite, CacheValue, Shared};
