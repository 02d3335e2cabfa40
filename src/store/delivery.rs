//! Result Delivery
//!
//! A store hands results back in one of two ways: through a callback run on a
//! later task, or as the return value of the call. Return values are either a
//! resolved future or the plain value, depending on the store's [`DeliveryMode`].

use std::fmt;
use std::future::{ready, IntoFuture, Ready};

use tokio::runtime::Handle;

use crate::error::Result;

// == Delivery Mode ==
/// How results reach callers that pass no callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Calls return an already-resolved future
    #[default]
    Future,
    /// Calls return the value itself
    Direct,
}

// == Reply ==
/// The value returned by a store call made without a callback.
///
/// Awaiting a `Reply` works in either mode, so callers that only `.await`
/// never need to look at the variant.
pub enum Reply<T> {
    /// Returned in [`DeliveryMode::Direct`]
    Ready(T),
    /// Returned in [`DeliveryMode::Future`]; never fails
    Future(Ready<T>),
}

impl<T> Reply<T> {
    pub(crate) fn new(mode: DeliveryMode, value: T) -> Self {
        match mode {
            DeliveryMode::Direct => Reply::Ready(value),
            DeliveryMode::Future => Reply::Future(ready(value)),
        }
    }

    pub fn is_future(&self) -> bool {
        matches!(self, Reply::Future(_))
    }

    /// Returns the value of a direct reply, or None for a future.
    pub fn into_ready(self) -> Option<T> {
        match self {
            Reply::Ready(value) => Some(value),
            Reply::Future(_) => None,
        }
    }
}

impl<T> IntoFuture for Reply<T> {
    type Output = T;
    type IntoFuture = Ready<T>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            Reply::Ready(value) => ready(value),
            Reply::Future(future) => future,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Reply<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Reply::Future(_) => f.write_str("Future(..)"),
        }
    }
}

// == Scheduler ==
/// Where a completion callback runs.
///
/// Chosen per call, not per store: a store can outlive the runtime it was
/// built on, and a handle to a shut-down runtime drops spawned tasks.
#[derive(Debug, Clone)]
pub(crate) enum Scheduler {
    Runtime(Handle),
    Thread,
}

impl Scheduler {
    /// The runtime the caller is on, or a fresh thread when there is none.
    pub(crate) fn current() -> Self {
        match Handle::try_current() {
            Ok(handle) => Scheduler::Runtime(handle),
            Err(_) => Scheduler::Thread,
        }
    }

    fn run<T, F>(self, value: T, callback: F)
    where
        T: Send + 'static,
        F: FnOnce(Result<T>) + Send + 'static,
    {
        match self {
            Scheduler::Runtime(handle) => {
                handle.spawn(async move { callback(Ok(value)) });
            }
            Scheduler::Thread => {
                std::thread::spawn(move || callback(Ok(value)));
            }
        }
    }
}

/// Queues `callback(Ok(value))` to run after the current call returns.
pub(crate) fn defer<T, F>(value: T, callback: F)
where
    T: Send + 'static,
    F: FnOnce(Result<T>) + Send + 'static,
{
    Scheduler::current().run(value, callback);
}
