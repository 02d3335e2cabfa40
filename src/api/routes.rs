//! API Routes
//!
//! Configures the Axum router with all store endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, delete_many_handler, get_handler, health_handler, keys_handler, mget_handler,
    mset_handler, reset_handler, set_handler, stats_handler, ttl_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a value
/// - `POST /mset` - Store several values with shared options
/// - `GET /get/:key` - Retrieve a value (`null` when absent)
/// - `POST /mget` - Retrieve several values in request order
/// - `DELETE /del/:key` - Delete one key
/// - `POST /del` - Delete several keys
/// - `POST /reset` - Remove every entry
/// - `GET /keys` - List live keys
/// - `GET /ttl/:key` - Expiry status of a key
/// - `GET /stats` - Hit/miss statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/mset", post(mset_handler))
        .route("/get/:key", get(get_handler))
        .route("/mget", post(mget_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/del", post(delete_many_handler))
        .route("/reset", post(reset_handler))
        .route("/keys", get(keys_handler))
        .route("/ttl/:key", get(ttl_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
