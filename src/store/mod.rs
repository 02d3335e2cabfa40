//! Store Module
//!
//! The cache-store adapter: option handling, clone-before-set, TTL
//! resolution and callback/future result delivery over an expiring map.

mod adapter;
mod delivery;
mod options;


pub use adapter::{Store, STORE_NAME};
pub use delivery::{DeliveryMode, Reply};
pub use options::{CallOptions, KeyList};
