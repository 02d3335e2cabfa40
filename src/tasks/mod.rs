//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a store.
//!
//! # Tasks
//! - Sweeper: Removes expired map entries every check period

mod sweeper;

pub use sweeper::spawn_sweeper;
