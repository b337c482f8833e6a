//! HTTP Peer Pool Module
//!
//! Transport adapter wiring the peer capabilities over HTTP: a pool that
//! maps keys to peer base URLs through the hash ring, and a fetcher that
//! speaks the inter-node GET protocol.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::peers::{PeerFetcher, PeerPicker};
use crate::ring::HashRing;

/// Path prefix of the inter-node cache protocol.
pub const DEFAULT_BASE_PATH: &str = "/_shardcache/";

/// Virtual nodes per peer on the ring.
pub const DEFAULT_REPLICAS: usize = 50;

// == HTTP Peer ==
/// Handle to one remote node, fetching values via
/// `GET {base_url}{group}/{key}`.
pub struct HttpPeer {
    base_url: String,
    client: reqwest::Client,
}

#[async_trait]
impl PeerFetcher for HttpPeer {
    async fn fetch(&self, group: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        let url = format!(
            "{}{}/{}",
            self.base_url,
            urlencoding::encode(group),
            urlencoding::encode(key)
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("requesting {url}"))?;
        anyhow::ensure!(
            response.status().is_success(),
            "peer returned {}",
            response.status()
        );
        let bytes = response
            .bytes()
            .await
            .context("reading peer response body")?;
        Ok(bytes.to_vec())
    }
}

struct PoolState {
    ring: HashRing,
    fetchers: HashMap<String, Arc<HttpPeer>>,
}

// == HTTP Pool ==
/// Peer picker over a pool of HTTP nodes.
///
/// `set_peers` replaces the ring and the fetcher table wholesale; there
/// is no incremental removal. Keys the ring assigns to this node itself
/// resolve to `None`, meaning "handle locally".
pub struct HttpPool {
    /// This node's own peer URL, e.g. "http://127.0.0.1:8081"
    self_addr: String,
    base_path: String,
    replicas: usize,
    client: reqwest::Client,
    state: RwLock<PoolState>,
}

impl HttpPool {
    // == Constructors ==
    /// Creates a pool identified by this node's own base URL.
    pub fn new(self_addr: &str) -> Self {
        Self::with_replicas(self_addr, DEFAULT_REPLICAS)
    }

    /// Creates a pool with a custom virtual-node count.
    pub fn with_replicas(self_addr: &str, replicas: usize) -> Self {
        Self {
            self_addr: self_addr.to_string(),
            base_path: DEFAULT_BASE_PATH.to_string(),
            replicas,
            client: reqwest::Client::new(),
            state: RwLock::new(PoolState {
                ring: HashRing::new(replicas),
                fetchers: HashMap::new(),
            }),
        }
    }

    // == Set Peers ==
    /// Replaces the pool's peer list, discarding the old ring and
    /// fetchers. The list should include this node's own address so the
    /// ring can assign keys to it.
    pub async fn set_peers<I, S>(&self, peers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let peers: Vec<String> = peers.into_iter().map(|p| p.as_ref().to_string()).collect();

        let mut ring = HashRing::new(self.replicas);
        ring.add(&peers);

        let mut fetchers = HashMap::with_capacity(peers.len());
        for peer in &peers {
            fetchers.insert(
                peer.clone(),
                Arc::new(HttpPeer {
                    base_url: format!("{}{}", peer, self.base_path),
                    client: self.client.clone(),
                }),
            );
        }

        *self.state.write().await = PoolState { ring, fetchers };
        debug!(self_addr = %self.self_addr, peers = peers.len(), "peer set replaced");
    }
}

#[async_trait]
impl PeerPicker for HttpPool {
    async fn pick(&self, key: &str) -> Option<Arc<dyn PeerFetcher>> {
        let state = self.state.read().await;
        let owner = state.ring.locate(key)?;
        if owner == self.self_addr {
            return None;
        }
        debug!(peer = owner, key, "picked remote owner");
        state
            .fetchers
            .get(owner)
            .map(|fetcher| fetcher.clone() as Arc<dyn PeerFetcher>)
    }
}
