//! Expiring Map Module
//!
//! Thread-safe key-value storage with per-entry expiry, a key cap and
//! hit/miss statistics. This is the backend the store adapter drives.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheEntry, CacheStats, CacheValue};
use crate::config::MapConfig;
use crate::error::{CacheError, Result};

// == Key TTL ==
/// Expiry status of a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTtl {
    /// The key does not exist (or has already expired)
    Missing,
    /// The key exists and never expires
    NoExpiry,
    /// The key exists and expires at the given instant
    ExpiresAt(DateTime<Utc>),
}

impl KeyTtl {
    /// Expiries past chrono's range are reported as its latest instant.
    fn from_millis(expires_at: Option<u64>) -> Self {
        match expires_at {
            None => KeyTtl::NoExpiry,
            Some(ms) => KeyTtl::ExpiresAt(
                i64::try_from(ms)
                    .ok()
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            ),
        }
    }

    /// Returns true if the key exists.
    pub fn exists(&self) -> bool {
        !matches!(self, KeyTtl::Missing)
    }
}

#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
}

// == Expiring Map ==
/// In-memory map whose entries may carry an absolute expiry time.
///
/// Expired entries are never returned. They are dropped lazily on access, or
/// in bulk by [`ExpiringMap::purge_expired`], unless `delete_on_expire` is off.
#[derive(Debug)]
pub struct ExpiringMap<V> {
    inner: RwLock<Inner<V>>,
    /// TTL applied when a put carries none
    std_ttl: Option<Duration>,
    max_keys: Option<usize>,
    use_clones: bool,
    delete_on_expire: bool,
}

impl<V: CacheValue> ExpiringMap<V> {
    // == Constructor ==
    /// Creates an empty map.
    ///
    /// # Arguments
    /// * `config` - Key cap, clone-on-read and expiry handling
    /// * `std_ttl` - Default TTL for puts that do not specify one
    pub fn new(config: &MapConfig, std_ttl: Option<Duration>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
            }),
            std_ttl,
            max_keys: config.max_keys,
            use_clones: config.use_clones,
            delete_on_expire: config.delete_on_expire,
        }
    }

    // == Put ==
    /// Inserts or overwrites `key`.
    ///
    /// `ttl` of `None` applies the map's standard TTL; a zero TTL never expires.
    /// Fails with [`CacheError::CacheFull`] when a new key would exceed `max_keys`.
    pub fn put(&self, key: String, value: V, ttl: Option<Duration>) -> Result<()> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;

        let is_new = !inner.entries.contains_key(&key);
        if let Some(max_keys) = self.max_keys.filter(|_| is_new) {
            if inner.entries.len() >= max_keys {
                self.drop_expired(inner);
            }
            if inner.entries.len() >= max_keys {
                warn!(key = %key, max_keys, "rejecting put: cache is full");
                return Err(CacheError::CacheFull(key));
            }
        }

        let entry = CacheEntry::new(value, ttl.or(self.std_ttl));
        debug!(key = %key, expires_at = ?entry.expires_at, "put");
        inner.entries.insert(key, entry);
        inner.stats.set_total_entries(inner.entries.len());

        Ok(())
    }

    // == Fetch ==
    /// Returns the live value for `key`, or `None` if missing or expired.
    pub fn fetch(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let now = current_timestamp_ms();

        let expired = inner
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));
        let value = if expired {
            self.expire_key(inner, key);
            None
        } else {
            inner.entries.get(key).map(|entry| self.read_value(&entry.value))
        };

        match value {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        value
    }

    // == Remove ==
    /// Removes `key`. Returns true if an entry was present.
    pub fn remove(&self, key: &str) -> bool {
        let mut inner = self.inner.write();
        let removed = inner.entries.remove(key).is_some();
        let len = inner.entries.len();
        inner.stats.set_total_entries(len);
        debug!(key, removed, "remove");
        removed
    }

    // == Clear ==
    /// Removes every entry and zeroes the statistics.
    pub fn clear(&self) {
        let mut inner = self.inner.write();
        let dropped = inner.entries.len();
        inner.entries.clear();
        inner.stats.reset();
        debug!(dropped, "clear");
    }

    // == List Keys ==
    /// Returns every live key, in no particular order.
    pub fn list_keys(&self) -> Vec<String> {
        let inner = self.inner.read();
        let now = current_timestamp_ms();
        inner
            .entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Expiry Of ==
    /// Reports whether `key` exists and when it expires.
    pub fn expiry_of(&self, key: &str) -> KeyTtl {
        let mut guard = self.inner.write();
        let inner = &mut *guard;
        let now = current_timestamp_ms();

        match inner.entries.get(key).map(|entry| entry.expires_at) {
            Some(expires_at) if expires_at.is_some_and(|at| now >= at) => {
                self.expire_key(inner, key);
                KeyTtl::Missing
            }
            Some(expires_at) => KeyTtl::from_millis(expires_at),
            None => KeyTtl::Missing,
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries. Returns the number removed.
    pub fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write();
        self.drop_expired(&mut guard)
    }

    // == Stats ==
    /// Returns current statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    fn read_value(&self, value: &V) -> V {
        if self.use_clones {
            value.deep_clone()
        } else {
            value.clone()
        }
    }

    fn expire_key(&self, inner: &mut Inner<V>, key: &str) {
        if self.delete_on_expire && inner.entries.remove(key).is_some() {
            inner.stats.record_expirations(1);
            inner.stats.set_total_entries(inner.entries.len());
            debug!(key, "expired");
        }
    }

    fn drop_expired(&self, inner: &mut Inner<V>) -> usize {
        if !self.delete_on_expire {
            return 0;
        }
        let now = current_timestamp_ms();
        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - inner.entries.len();

        inner.stats.record_expirations(removed);
        inner.stats.set_total_entries(inner.entries.len());
        removed
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Shared;
    use std::thread::sleep;

    fn map_with(config: MapConfig) -> ExpiringMap<String> {
        ExpiringMap::new(&config, None)
    }

    fn short() -> Option<Duration> {
        Some(Duration::from_millis(30))
    }

    #[test]
    fn test_put_and_fetch() {
        let map = map_with(MapConfig::default());

        map.put("key1".to_string(), "value1".to_string(), None).unwrap();

        assert_eq!(map.fetch("key1"), Some("value1".to_string()));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_fetch_missing_is_none() {
        let map = map_with(MapConfig::default());
        assert_eq!(map.fetch("nonexistent"), None);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let map = map_with(MapConfig::default());

        map.put("key1".to_string(), "value1".to_string(), None).unwrap();
        map.put("key1".to_string(), "value2".to_string(), None).unwrap();

        assert_eq!(map.fetch("key1"), Some("value2".to_string()));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let map = map_with(MapConfig::default());
        map.put("key1".to_string(), "value1".to_string(), None).unwrap();

        assert!(map.remove("key1"));
        assert!(!map.remove("key1"));
        assert!(map.is_empty());
    }

    #[test]
    fn test_expired_entry_is_invisible_and_dropped() {
        let map = map_with(MapConfig::default());
        map.put("key1".to_string(), "value1".to_string(), short()).unwrap();

        sleep(Duration::from_millis(60));

        assert!(map.list_keys().is_empty());
        assert_eq!(map.fetch("key1"), None);
        assert_eq!(map.len(), 0);
        assert_eq!(map.stats().expirations, 1);
    }

    #[test]
    fn test_std_ttl_applies_when_put_has_none() {
        let map: ExpiringMap<u32> =
            ExpiringMap::new(&MapConfig::default(), Some(Duration::from_secs(100)));
        map.put("a".to_string(), 1, None).unwrap();
        map.put("b".to_string(), 2, Some(Duration::ZERO)).unwrap();

        assert!(matches!(map.expiry_of("a"), KeyTtl::ExpiresAt(_)));
        assert_eq!(map.expiry_of("b"), KeyTtl::NoExpiry);
    }

    #[test]
    fn test_expiry_of_distinguishes_outcomes() {
        let map = map_with(MapConfig::default());
        map.put("forever".to_string(), "v".to_string(), None).unwrap();
        map.put("timed".to_string(), "v".to_string(), Some(Duration::from_secs(60)))
            .unwrap();

        assert_eq!(map.expiry_of("nonexistent"), KeyTtl::Missing);
        assert_eq!(map.expiry_of("forever"), KeyTtl::NoExpiry);
        match map.expiry_of("timed") {
            KeyTtl::ExpiresAt(at) => assert!(at > Utc::now()),
            other => panic!("expected expiry, got {:?}", other),
        }
    }

    #[test]
    fn test_far_future_expiry_clamps_to_latest_instant() {
        let map = map_with(MapConfig::default());
        let ttl = Some(Duration::from_secs(1_000_000_000_000_000));
        map.put("far".to_string(), "v".to_string(), ttl).unwrap();

        assert_eq!(map.fetch("far"), Some("v".to_string()));
        assert_eq!(map.expiry_of("far"), KeyTtl::ExpiresAt(DateTime::<Utc>::MAX_UTC));
    }

    #[test]
    fn test_expiry_of_beyond_i64_millis_clamps() {
        assert_eq!(
            KeyTtl::from_millis(Some(u64::MAX)),
            KeyTtl::ExpiresAt(DateTime::<Utc>::MAX_UTC)
        );
    }

    #[test]
    fn test_max_keys_rejects_new_keys_only() {
        let map = map_with(MapConfig {
            max_keys: Some(2),
            ..MapConfig::default()
        });
        map.put("a".to_string(), "1".to_string(), None).unwrap();
        map.put("b".to_string(), "2".to_string(), None).unwrap();

        let result = map.put("c".to_string(), "3".to_string(), None);
        assert_eq!(result, Err(CacheError::CacheFull("c".to_string())));

        map.put("a".to_string(), "updated".to_string(), None).unwrap();
        assert_eq!(map.fetch("a"), Some("updated".to_string()));
    }

    #[test]
    fn test_max_keys_reclaims_expired_slots() {
        let map = map_with(MapConfig {
            max_keys: Some(1),
            ..MapConfig::default()
        });
        map.put("a".to_string(), "1".to_string(), short()).unwrap();
        sleep(Duration::from_millis(60));

        assert!(map.put("b".to_string(), "2".to_string(), None).is_ok());
        assert_eq!(map.list_keys(), vec!["b".to_string()]);
    }

    #[test]
    fn test_purge_expired() {
        let map = map_with(MapConfig::default());
        map.put("key1".to_string(), "value1".to_string(), short()).unwrap();
        map.put("key2".to_string(), "value2".to_string(), Some(Duration::from_secs(10)))
            .unwrap();

        sleep(Duration::from_millis(60));

        assert_eq!(map.purge_expired(), 1);
        assert_eq!(map.len(), 1);
        assert!(map.fetch("key2").is_some());
    }

    #[test]
    fn test_keep_expired_entries_when_delete_on_expire_is_off() {
        let map = map_with(MapConfig {
            delete_on_expire: false,
            ..MapConfig::default()
        });
        map.put("key1".to_string(), "value1".to_string(), short()).unwrap();
        sleep(Duration::from_millis(60));

        assert_eq!(map.purge_expired(), 0);
        assert_eq!(map.fetch("key1"), None);
        assert!(map.list_keys().is_empty());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_clear_resets_entries_and_stats() {
        let map = map_with(MapConfig::default());
        map.put("key1".to_string(), "value1".to_string(), None).unwrap();
        map.fetch("key1");
        map.fetch("missing");

        map.clear();

        assert!(map.is_empty());
        assert_eq!(map.stats(), CacheStats::default());
    }

    #[test]
    fn test_stats_count_hits_and_misses() {
        let map = map_with(MapConfig::default());
        map.put("key1".to_string(), "value1".to_string(), None).unwrap();
        map.fetch("key1");
        map.fetch("nonexistent");

        let stats = map.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_use_clones_controls_read_sharing() {
        let cloning: ExpiringMap<Shared<u32>> = ExpiringMap::new(&MapConfig::default(), None);
        let sharing: ExpiringMap<Shared<u32>> = ExpiringMap::new(
            &MapConfig {
                use_clones: false,
                ..MapConfig::default()
            },
            None,
        );
        let value = Shared::new(1);
        cloning.put("k".to_string(), value.clone(), None).unwrap();
        sharing.put("k".to_string(), value.clone(), None).unwrap();

        assert!(!cloning.fetch("k").unwrap().ptr_eq(&value));
        assert!(sharing.fetch("k").unwrap().ptr_eq(&value));
    }
}
