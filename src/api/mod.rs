//! API Module
//!
//! HTTP handlers and routing that expose one store over a REST API.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
