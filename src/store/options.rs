//! Call Arguments
//!
//! Per-call options and key lists accepted by store operations.

// == Call Options ==
/// Options accepted by every keyed store operation.
///
/// Only writes read `ttl`; reads and deletes accept options without using them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
    /// TTL in seconds. `Some(0)` means "never expire" and overrides the
    /// store default; `None` falls back to it.
    pub ttl: Option<u64>,
}

impl CallOptions {
    pub fn with_ttl(seconds: u64) -> Self {
        Self { ttl: Some(seconds) }
    }
}

impl From<()> for CallOptions {
    fn from(_: ()) -> Self {
        Self::default()
    }
}

/// A bare number is a TTL in seconds.
impl From<u64> for CallOptions {
    fn from(seconds: u64) -> Self {
        Self::with_ttl(seconds)
    }
}

impl From<Option<u64>> for CallOptions {
    fn from(ttl: Option<u64>) -> Self {
        Self { ttl }
    }
}

// == Key List ==
/// One or more keys, in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyList(Vec<String>);

impl KeyList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl IntoIterator for KeyList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl From<&str> for KeyList {
    fn from(key: &str) -> Self {
        Self(vec![key.to_string()])
    }
}

impl From<String> for KeyList {
    fn from(key: String) -> Self {
        Self(vec![key])
    }
}

impl From<&String> for KeyList {
    fn from(key: &String) -> Self {
        Self(vec![key.clone()])
    }
}

impl From<Vec<String>> for KeyList {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl From<Vec<&str>> for KeyList {
    fn from(keys: Vec<&str>) -> Self {
        Self(keys.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for KeyList {
    fn from(keys: &[&str]) -> Self {
        Self(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl From<&[String]> for KeyList {
    fn from(keys: &[String]) -> Self {
        Self(keys.to_vec())
    }
}

impl<const N: usize> From<[&str; N]> for KeyList {
    fn from(keys: [&str; N]) -> Self {
        Self(keys.iter().map(|k| k.to_string()).collect())
    }
}

impl FromIterator<String> for KeyList {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
