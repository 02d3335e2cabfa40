//! Cache Value Module
//!
//! Defines the duplication capability every stored value must provide.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

// == Cache Value Trait ==
/// A value that can live in the cache.
///
/// `Clone` may share state (as `Arc` does); `deep_clone` must not. Composite
/// values are deep-cloned before storage and on read, scalars pass through.
pub trait CacheValue: Clone + Send + Sync + 'static {
    /// Returns true if the value holds data a caller could still mutate.
    fn is_composite(&self) -> bool;

    /// Returns a copy that shares no mutable state with `self`.
    fn deep_clone(&self) -> Self {
        self.clone()
    }
}

/// Copies `value` if it is composite, otherwise returns it untouched.
pub fn clone_if_composite<V: CacheValue>(value: V) -> V {
    if value.is_composite() {
        value.deep_clone()
    } else {
        value
    }
}

macro_rules! scalar_values {
    ($($ty:ty),* $(,)?) => {
        $(
            impl CacheValue for $ty {
                fn is_composite(&self) -> bool {
                    false
                }
            }
        )*
    };
}

scalar_values!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, &'static str,
);

impl<T: CacheValue> CacheValue for Option<T> {
    fn is_composite(&self) -> bool {
        self.as_ref().is_some_and(CacheValue::is_composite)
    }

    fn deep_clone(&self) -> Self {
        self.as_ref().map(CacheValue::deep_clone)
    }
}

impl<T: CacheValue> CacheValue for Vec<T> {
    fn is_composite(&self) -> bool {
        true
    }

    fn deep_clone(&self) -> Self {
        self.iter().map(CacheValue::deep_clone).collect()
    }
}

impl<T: CacheValue> CacheValue for HashMap<String, T> {
    fn is_composite(&self) -> bool {
        true
    }

    fn deep_clone(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.clone(), v.deep_clone()))
            .collect()
    }
}

impl<T: CacheValue> CacheValue for BTreeMap<String, T> {
    fn is_composite(&self) -> bool {
        true
    }

    fn deep_clone(&self) -> Self {
        self.iter()
            .map(|(k, v)| (k.clone(), v.deep_clone()))
            .collect()
    }
}

impl CacheValue for serde_json::Value {
    fn is_composite(&self) -> bool {
        matches!(self, Self::Array(_) | Self::Object(_))
    }
}

// == Shared ==
/// A shared, mutable value handle.
///
/// Cloning the handle shares the inner value; `deep_clone` copies it into a
/// fresh handle. This is the shape where clone-before-set matters: without it,
/// writes through the caller's handle show up in later reads.
pub struct Shared<T>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Mutates the inner value in place.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.0.write());
    }

    /// Returns true if both handles point at the same allocation.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> Shared<T> {
    /// Returns a copy of the inner value.
    pub fn snapshot(&self) -> T {
        self.0.read().clone()
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Shared").field(&*self.0.read()).finish()
    }
}

impl<T: PartialEq> PartialEq for Shared<T> {
    fn eq(&self, other: &Self) -> bool {
        *self.0.read() == *other.0.read()
    }
}

impl<T: Clone + Send + Sync + 'static> CacheValue for Shared<T> {
    fn is_composite(&self) -> bool {
        true
    }

    fn deep_clone(&self) -> Self {
        Self::new(self.snapshot())
    }
}
