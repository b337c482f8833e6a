//! Shardcache - A distributed read-through cache
//!
//! Peer nodes shard cached values by consistent hashing; each node holds
//! a bounded local store and forwards misses to the key's owning node
//! before falling back to the backend loader. Concurrent identical loads
//! are coalesced into one execution.

pub mod cache;
pub mod config;
pub mod error;
pub mod flight;
pub mod group;
pub mod http;
pub mod models;
pub mod peers;
pub mod ring;

pub use cache::ByteView;
pub use config::Config;
pub use error::CacheError;
pub use group::{Group, GroupRegistry, Loader};
pub use http::{create_router, AppState, HttpPool};
pub use ring::HashRing;
