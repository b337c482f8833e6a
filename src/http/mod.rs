//! HTTP Module
//!
//! The transport adapter: peer pool and fetcher speaking the inter-node
//! protocol, plus the node's axum router.
//!
//! # Endpoints
//! - `GET /_shardcache/:group/:key` - inter-node cache protocol
//! - `GET /api/:group/:key` - client entrypoint
//! - `GET /stats` - per-group cache statistics
//! - `GET /health` - health check endpoint

pub mod handlers;
pub mod pool;
pub mod routes;

pub use handlers::AppState;
pub use pool::{HttpPeer, HttpPool, DEFAULT_BASE_PATH, DEFAULT_REPLICAS};
pub use routes::create_router;
