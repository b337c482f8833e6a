//! Cache Group Module
//!
//! A group is a named cache namespace binding a backend loader, a bounded
//! local cache, an optional peer picker, and a single-flight coalescer.
//! The registry maps namespace names to groups for the life of the
//! process.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::{ByteView, CacheStats, SyncCache};
use crate::error::{CacheError, Result};
use crate::flight::SingleFlight;
use crate::peers::{PeerFetcher, PeerPicker};

// == Loader ==
/// Backend load capability, invoked only on a full local+peer miss.
#[async_trait]
pub trait Loader: Send + Sync {
    /// Loads the value for `key` from the authoritative data source.
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

/// Any async closure taking the key and returning bytes is a loader, so
/// plain functions and loader objects are interchangeable.
#[async_trait]
impl<F, Fut> Loader for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Vec<u8>>> + Send,
{
    async fn load(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self)(key.to_string()).await
    }
}

// == Group ==
/// A cache namespace.
///
/// `get` reads through: local cache, then the key's owning peer, then the
/// backend loader. Values loaded from the backend are cached locally;
/// values served by a peer are not, since the peer is the node that owns
/// them.
pub struct Group {
    name: String,
    loader: Arc<dyn Loader>,
    local: SyncCache,
    /// Set at most once via `register_peers`
    peers: OnceLock<Arc<dyn PeerPicker>>,
    flights: SingleFlight,
}

impl Group {
    fn new(name: &str, max_bytes: u64, loader: Arc<dyn Loader>) -> Self {
        Self {
            name: name.to_string(),
            loader,
            local: SyncCache::new(max_bytes),
            peers: OnceLock::new(),
            flights: SingleFlight::new(),
        }
    }

    /// The group's namespace name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // == Get ==
    /// Returns the value for `key`, loading it on a local miss.
    ///
    /// Concurrent callers for the same key share one load execution.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::EmptyKey);
        }

        if let Some(view) = self.local.get(key).await {
            debug!(group = %self.name, key, "cache hit");
            return Ok(view);
        }

        self.flights.run(key, || self.load(key)).await
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(picker) = self.peers.get() {
            if let Some(peer) = picker.pick(key).await {
                match self.load_from_peer(peer.as_ref(), key).await {
                    Ok(view) => return Ok(view),
                    Err(err) => {
                        warn!(group = %self.name, key, %err, "falling back to backend loader");
                    }
                }
            }
        }
        self.load_locally(key).await
    }

    async fn load_from_peer(&self, peer: &dyn PeerFetcher, key: &str) -> Result<ByteView> {
        let bytes = peer
            .fetch(&self.name, key)
            .await
            .map_err(|err| CacheError::PeerUnavailable(format!("{err:#}")))?;
        debug!(group = %self.name, key, "loaded from peer");
        // The owning node keeps the cached copy; nothing is stored here.
        Ok(ByteView::from(bytes))
    }

    async fn load_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = self
            .loader
            .load(key)
            .await
            .map_err(|err| CacheError::backend(key, &err))?;
        debug!(group = %self.name, key, "loaded from backend");

        let view = ByteView::from(bytes);
        self.local.add(key, view.clone()).await;
        Ok(view)
    }

    // == Register Peers ==
    /// Wires the peer picker into the group.
    ///
    /// # Panics
    /// Panics when called a second time; double registration is a
    /// configuration error, not a runtime condition.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) {
        if self.peers.set(picker).is_err() {
            panic!(
                "register_peers called more than once on group '{}'",
                self.name
            );
        }
    }

    // == Stats ==
    /// Snapshot of the group's local-cache counters.
    pub async fn stats(&self) -> CacheStats {
        self.local.stats().await
    }
}

// == Group Registry ==
/// Process-wide mapping from namespace name to group.
///
/// Constructed once at startup and passed by reference to every
/// integration point. Groups are created by `new_group` and live for the
/// rest of the process; there is no removal.
#[derive(Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group under `name` with a fresh cache of capacity
    /// `max_bytes`, replacing any previous group of the same name.
    pub async fn new_group(
        &self,
        name: &str,
        max_bytes: u64,
        loader: impl Loader + 'static,
    ) -> Arc<Group> {
        let group = Arc::new(Group::new(name, max_bytes, Arc::new(loader)));
        self.groups
            .write()
            .await
            .insert(name.to_string(), group.clone());
        group
    }

    // == Get Group ==
    /// Pure lookup; never mutates.
    pub async fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().await.get(name).cloned()
    }

    /// Names of all registered groups, for the stats surface.
    pub async fn group_names(&self) -> Vec<String> {
        self.groups.read().await.keys().cloned().collect()
    }
}
