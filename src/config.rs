//! Configuration Module
//!
//! Handles loading and managing store and server configuration from
//! environment variables.

use std::env;
use std::str::FromStr;

use crate::store::DeliveryMode;

// == Map Config ==
/// Settings passed through to the expiring map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapConfig {
    /// Seconds between background sweeps of expired entries (0 = no sweeper)
    pub check_period: u64,
    /// Maximum number of keys, None = unlimited
    pub max_keys: Option<usize>,
    /// Whether reads return deep copies of stored values
    pub use_clones: bool,
    /// Whether expired entries are deleted when found
    pub delete_on_expire: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            check_period: 600,
            max_keys: None,
            use_clones: true,
            delete_on_expire: true,
        }
    }
}

// == Store Config ==
/// Construction-time settings of a [`Store`](crate::store::Store).
///
/// Fixed once the store is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// TTL in seconds for entries set without one, None = never expire
    pub default_ttl: Option<u64>,
    /// Whether composite values are deep-copied before they are stored
    pub clone_before_set: bool,
    /// How results reach callers that pass no callback
    pub delivery: DeliveryMode,
    /// Pass-through settings for the underlying map
    pub map: MapConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            default_ttl: None,
            clone_before_set: true,
            delivery: DeliveryMode::Future,
            map: MapConfig::default(),
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl = Some(seconds);
        self
    }

    pub fn clone_before_set(mut self, enabled: bool) -> Self {
        self.clone_before_set = enabled;
        self
    }

    /// Disables future-style results; calls without a callback return values directly.
    pub fn no_promises(mut self) -> Self {
        self.delivery = DeliveryMode::Direct;
        self
    }

    pub fn delivery(mut self, delivery: DeliveryMode) -> Self {
        self.delivery = delivery;
        self
    }

    pub fn check_period(mut self, seconds: u64) -> Self {
        self.map.check_period = seconds;
        self
    }

    pub fn max_keys(mut self, max_keys: usize) -> Self {
        self.map.max_keys = Some(max_keys);
        self
    }

    pub fn use_clones(mut self, enabled: bool) -> Self {
        self.map.use_clones = enabled;
        self
    }

    pub fn delete_on_expire(mut self, enabled: bool) -> Self {
        self.map.delete_on_expire = enabled;
        self
    }
}

// == Server Config ==
/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: Option<u64>,
    /// Background sweep interval in seconds
    pub check_period: u64,
    /// Maximum number of keys the store accepts
    pub max_keys: Option<usize>,
    pub clone_before_set: bool,
    pub use_clones: bool,
    pub delete_on_expire: bool,
    /// Return values directly instead of futures
    pub no_promises: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: none)
    /// - `CHECK_PERIOD` - Sweep frequency in seconds (default: 600)
    /// - `MAX_KEYS` - Maximum number of keys (default: unlimited)
    /// - `CLONE_BEFORE_SET` - Copy composite values on write (default: true)
    /// - `USE_CLONES` - Copy values on read (default: true)
    /// - `DELETE_ON_EXPIRE` - Drop expired entries (default: true)
    /// - `STORE_NO_PROMISES` - Return plain values instead of futures (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            default_ttl: parse_var("DEFAULT_TTL"),
            check_period: parse_var("CHECK_PERIOD").unwrap_or(defaults.check_period),
            max_keys: parse_var("MAX_KEYS"),
            clone_before_set: parse_var("CLONE_BEFORE_SET").unwrap_or(defaults.clone_before_set),
            use_clones: parse_var("USE_CLONES").unwrap_or(defaults.use_clones),
            delete_on_expire: parse_var("DELETE_ON_EXPIRE").unwrap_or(defaults.delete_on_expire),
            no_promises: parse_var("STORE_NO_PROMISES").unwrap_or(defaults.no_promises),
        }
    }

    /// Builds the store configuration described by these settings.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            default_ttl: self.default_ttl,
            clone_before_set: self.clone_before_set,
            delivery: if self.no_promises {
                DeliveryMode::Direct
            } else {
                DeliveryMode::Future
            },
            map: MapConfig {
                check_period: self.check_period,
                max_keys: self.max_keys,
                use_clones: self.use_clones,
                delete_on_expire: self.delete_on_expire,
            },
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            default_ttl: None,
            check_period: 600,
            max_keys: None,
            clone_before_set: true,
            use_clones: true,
            delete_on_expire: true,
            no_promises: false,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
