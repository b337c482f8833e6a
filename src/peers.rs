//! Peer Capability Traits
//!
//! The seam between the cache core and whatever transport connects the
//! nodes. A transport adapter implements both traits; the core only ever
//! sees keys in and bytes out.

use std::sync::Arc;

use async_trait::async_trait;

// == Peer Fetcher ==
/// Handle to a single remote peer.
#[async_trait]
pub trait PeerFetcher: Send + Sync {
    /// Fetches the raw value bytes for `key` within the named group.
    ///
    /// All wire encoding belongs to the implementation.
    async fn fetch(&self, group: &str, key: &str) -> anyhow::Result<Vec<u8>>;
}

// == Peer Picker ==
/// Resolves a key to the remote peer that owns it.
#[async_trait]
pub trait PeerPicker: Send + Sync {
    /// Returns the owning peer, or `None` when the key has no remote
    /// owner (self-owned, or no peers configured) and must be handled
    /// locally.
    async fn pick(&self, key: &str) -> Option<Arc<dyn PeerFetcher>>;
}
