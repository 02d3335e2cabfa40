//! Store Adapter
//!
//! Uniform cache-store interface over an [`ExpiringMap`].

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{clone_if_composite, CacheStats, CacheValue, ExpiringMap, KeyTtl};
use crate::config::StoreConfig;
use crate::error::Result;
use crate::store::delivery::{defer, Reply};
use crate::store::{CallOptions, KeyList};
use crate::tasks::spawn_sweeper;

/// Identifies this backend to whatever orchestrates several stores.
pub const STORE_NAME: &str = "expiring-map";

// == Store ==
/// Cache store adapter.
///
/// Every operation except [`Store::ttl`] comes in two styles. The plain
/// method returns a [`Reply`]: a resolved future or, when the store was
/// configured without promises, the value itself. The `*_then` method hands
/// the same result to a callback that runs on a later task and returns
/// nothing. Callbacks always receive `Ok`. Failures raised by the map, such
/// as a full cache, are returned from the call itself before anything is
/// delivered.
///
/// Cloning a `Store` yields another handle to the same entries.
#[derive(Debug, Clone)]
pub struct Store<V> {
    map: Arc<ExpiringMap<V>>,
    config: StoreConfig,
}

impl<V: CacheValue> Store<V> {
    // == Constructor ==
    /// Creates a store with its own, empty map.
    ///
    /// Callbacks are spawned on the tokio runtime current at the time of the
    /// call; without one, each callback gets its own thread.
    pub fn new(config: StoreConfig) -> Self {
        let std_ttl = config.default_ttl.map(Duration::from_secs);
        let map = ExpiringMap::new(&config.map, std_ttl);
        info!(
            default_ttl = ?config.default_ttl,
            clone_before_set = config.clone_before_set,
            delivery = ?config.delivery,
            "store created"
        );

        Self {
            map: Arc::new(map),
            config,
        }
    }

    pub fn name(&self) -> &'static str {
        STORE_NAME
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn stats(&self) -> CacheStats {
        self.map.stats()
    }

    // == Sweeper ==
    /// Starts the background task that drops expired entries every
    /// `check_period` seconds. Returns None when the period is 0.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start_sweeper(&self) -> Option<JoinHandle<()>> {
        match self.config.map.check_period {
            0 => None,
            period => Some(spawn_sweeper(Arc::clone(&self.map), period)),
        }
    }

    // == Set ==
    /// Stores `value` under `key`. Resolves to the value as stored.
    ///
    /// TTL comes from `opts` if given (0 = never expire), else the store default.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: V,
        opts: impl Into<CallOptions>,
    ) -> Result<Reply<V>> {
        let stored = self.store_one(key.into(), value, self.resolve_ttl(&opts.into()))?;
        Ok(self.reply(stored))
    }

    /// Like [`Store::set`], acknowledging with `Ok(true)` through `callback`.
    pub fn set_then<F>(
        &self,
        key: impl Into<String>,
        value: V,
        opts: impl Into<CallOptions>,
        callback: F,
    ) -> Result<()>
    where
        F: FnOnce(Result<bool>) + Send + 'static,
    {
        self.store_one(key.into(), value, self.resolve_ttl(&opts.into()))?;
        defer(true, callback);
        Ok(())
    }

    // == Multi Set ==
    /// Stores each pair left to right with the shared `opts`.
    ///
    /// Each write is visible as soon as it is made. If the map rejects a pair,
    /// earlier pairs stay stored and the error is returned.
    pub fn mset<K, I>(&self, pairs: I, opts: impl Into<CallOptions>) -> Result<Reply<Vec<V>>>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let values = self.store_many(pairs, &opts.into())?;
        Ok(self.reply(values))
    }

    pub fn mset_then<K, I, F>(
        &self,
        pairs: I,
        opts: impl Into<CallOptions>,
        callback: F,
    ) -> Result<()>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        F: FnOnce(Result<Vec<V>>) + Send + 'static,
    {
        let values = self.store_many(pairs, &opts.into())?;
        defer(values, callback);
        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`, or None.
    ///
    /// Options are accepted for interface parity and have no effect on reads.
    pub fn get(&self, key: &str, _opts: impl Into<CallOptions>) -> Reply<Option<V>> {
        self.reply(self.map.fetch(key))
    }

    pub fn get_then<F>(&self, key: &str, _opts: impl Into<CallOptions>, callback: F)
    where
        F: FnOnce(Result<Option<V>>) + Send + 'static,
    {
        defer(self.map.fetch(key), callback);
    }

    // == Multi Get ==
    /// Returns one slot per requested key, in request order.
    pub fn mget(
        &self,
        keys: impl Into<KeyList>,
        _opts: impl Into<CallOptions>,
    ) -> Reply<Vec<Option<V>>> {
        self.reply(self.fetch_many(keys.into()))
    }

    pub fn mget_then<F>(&self, keys: impl Into<KeyList>, _opts: impl Into<CallOptions>, callback: F)
    where
        F: FnOnce(Result<Vec<Option<V>>>) + Send + 'static,
    {
        defer(self.fetch_many(keys.into()), callback);
    }

    // == Delete ==
    /// Removes one key or many. Missing keys are ignored.
    pub fn del(&self, keys: impl Into<KeyList>, _opts: impl Into<CallOptions>) -> Reply<()> {
        self.remove_many(keys.into());
        self.reply(())
    }

    pub fn del_then<F>(&self, keys: impl Into<KeyList>, _opts: impl Into<CallOptions>, callback: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        self.remove_many(keys.into());
        defer((), callback);
    }

    // == Reset ==
    /// Removes every entry.
    pub fn reset(&self) -> Reply<()> {
        self.map.clear();
        self.reply(())
    }

    pub fn reset_then<F>(&self, callback: F)
    where
        F: FnOnce(Result<()>) + Send + 'static,
    {
        self.map.clear();
        defer((), callback);
    }

    // == Keys ==
    /// Returns every live key, in no particular order.
    pub fn keys(&self) -> Reply<Vec<String>> {
        self.reply(self.map.list_keys())
    }

    pub fn keys_then<F>(&self, callback: F)
    where
        F: FnOnce(Result<Vec<String>>) + Send + 'static,
    {
        defer(self.map.list_keys(), callback);
    }

    // == TTL ==
    /// Reports whether `key` exists and when it expires. Always synchronous.
    pub fn ttl(&self, key: &str) -> KeyTtl {
        self.map.expiry_of(key)
    }

    fn reply<T>(&self, value: T) -> Reply<T> {
        Reply::new(self.config.delivery, value)
    }

    fn resolve_ttl(&self, opts: &CallOptions) -> Option<Duration> {
        opts.ttl
            .or(self.config.default_ttl)
            .map(Duration::from_secs)
    }

    /// With `clone_before_set`, the map and the caller each get their own copy.
    fn store_one(&self, key: String, value: V, ttl: Option<Duration>) -> Result<V> {
        if !self.config.clone_before_set {
            self.map.put(key, value.clone(), ttl)?;
            return Ok(value);
        }
        self.map.put(key, clone_if_composite(value.clone()), ttl)?;
        Ok(clone_if_composite(value))
    }

    fn store_many<K, I>(&self, pairs: I, opts: &CallOptions) -> Result<Vec<V>>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let ttl = self.resolve_ttl(opts);
        let values = pairs
            .into_iter()
            .map(|(key, value)| self.store_one(key.into(), value, ttl))
            .collect::<Result<Vec<_>>>()?;
        debug!(count = values.len(), "mset");
        Ok(values)
    }

    fn fetch_many(&self, keys: KeyList) -> Vec<Option<V>> {
        keys.iter().map(|key| self.map.fetch(key)).collect()
    }

    fn remove_many(&self, keys: KeyList) {
        let removed = keys.iter().filter(|key| self.map.remove(key)).count();
        debug!(requested = keys.len(), removed, "del");
    }
}

impl<V: CacheValue> Default for Store<V> {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}
