//! Cache Module
//!
//! Bounded in-memory storage: immutable byte views, a byte-budget LRU
//! store, and the locked wrapper groups read through.

mod byteview;
mod recency;
mod stats;
mod store;
mod sync;


// Re-export public types
pub use byteview::{ByteView, SizedValue};
pub use recency::RecencyList;
pub use stats::CacheStats;
pub use store::{ByteStore, EvictionHook};
pub use sync::SyncCache;
