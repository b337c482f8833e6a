//! Shardcache - A distributed read-through cache node
//!
//! Serves one node of the cluster: the inter-node cache protocol, the
//! client API, and a demo "scores" group backed by an in-memory source
//! table.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::signal;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shardcache::group::Loader;
use shardcache::{create_router, AppState, Config, GroupRegistry, HttpPool};

/// Backend loader over a small in-memory table standing in for the
/// authoritative data source.
fn demo_loader() -> impl Loader + 'static {
    let source: Arc<HashMap<&str, &str>> = Arc::new(HashMap::from([
        ("Tom", "630"),
        ("Jack", "589"),
        ("Sam", "567"),
    ]));

    move |key: String| {
        let source = source.clone();
        async move {
            debug!(key, "querying source table");
            source
                .get(key.as_str())
                .map(|value| value.as_bytes().to_vec())
                .ok_or_else(|| anyhow::anyhow!("{key} not exist"))
        }
    }
}

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the group registry and the demo cache group
/// 4. Wire the HTTP peer pool (ring + fetchers) into the group
/// 5. Start the HTTP server on the node address
/// 6. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardcache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting shardcache node");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: node_addr={}, peers={}, max_cache_bytes={}, ring_replicas={}",
        config.node_addr,
        config.peer_addrs.len(),
        config.max_cache_bytes,
        config.ring_replicas
    );

    // Build the registry and the demo group
    let registry = Arc::new(GroupRegistry::new());
    let group = registry
        .new_group("scores", config.max_cache_bytes, demo_loader())
        .await;

    // Wire the peer pool into the group
    let pool = Arc::new(HttpPool::with_replicas(
        &config.node_addr,
        config.ring_replicas,
    ));
    pool.set_peers(&config.peer_addrs).await;
    group.register_peers(pool);
    info!("Peer pool wired: {} node(s)", config.peer_addrs.len());

    // Create router with all endpoints
    let app = create_router(AppState::new(registry));

    // Bind to the node address
    let addr = config.listen_addr().expect("invalid NODE_ADDR");
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Node listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Node shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
