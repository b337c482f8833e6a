//! Configuration Module
//!
//! Handles loading node configuration from environment variables.

use std::env;
use std::net::SocketAddr;

use anyhow::Context;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// This node's own peer URL (identity on the ring)
    pub node_addr: String,
    /// Every node in the cluster, this one included
    pub peer_addrs: Vec<String>,
    /// Byte budget per cache group (0 = unbounded)
    pub max_cache_bytes: u64,
    /// Virtual nodes per peer on the hash ring
    pub ring_replicas: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NODE_ADDR` - this node's URL (default: `http://127.0.0.1:8080`)
    /// - `PEER_ADDRS` - comma-separated peer URLs (default: just this node)
    /// - `MAX_CACHE_BYTES` - byte budget per group (default: 1048576)
    /// - `RING_REPLICAS` - virtual nodes per peer (default: 50)
    pub fn from_env() -> Self {
        let node_addr =
            env::var("NODE_ADDR").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let peer_addrs = env::var("PEER_ADDRS")
            .ok()
            .map(|raw| split_peers(&raw))
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![node_addr.clone()]);

        Self {
            node_addr,
            peer_addrs,
            max_cache_bytes: env::var("MAX_CACHE_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1 << 20),
            ring_replicas: env::var("RING_REPLICAS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(50),
        }
    }

    /// Socket address to bind, derived from `node_addr`.
    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let host_port = self
            .node_addr
            .trim_start_matches("http://")
            .trim_start_matches("https://")
            .trim_end_matches('/');
        host_port
            .parse()
            .with_context(|| format!("NODE_ADDR '{}' is not an ip:port URL", self.node_addr))
    }
}

impl Default for Config {
    fn default() -> Self {
        let node_addr = "http://127.0.0.1:8080".to_string();
        Self {
            peer_addrs: vec![node_addr.clone()],
            node_addr,
            max_cache_bytes: 1 << 20,
            ring_replicas: 50,
        }
    }
}

fn split_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.node_addr, "http://127.0.0.1:8080");
        assert_eq!(config.peer_addrs, vec!["http://127.0.0.1:8080"]);
        assert_eq!(config.max_cache_bytes, 1 << 20);
        assert_eq!(config.ring_replicas, 50);
    }

    #[test]
    fn test_split_peers() {
        let peers = split_peers("http://a:1, http://b:2 ,,http://c:3");
        assert_eq!(peers, vec!["http://a:1", "http://b:2", "http://c:3"]);
    }

    #[test]
    fn test_listen_addr_strips_scheme() {
        let config = Config {
            node_addr: "http://127.0.0.1:8081".to_string(),
            ..Config::default()
        };
        let addr = config.listen_addr().unwrap();
        assert_eq!(addr.port(), 8081);
    }

    #[test]
    fn test_listen_addr_rejects_hostnames() {
        let config = Config {
            node_addr: "http://localhost:8081".to_string(),
            ..Config::default()
        };
        assert!(config.listen_addr().is_err());
    }
}
