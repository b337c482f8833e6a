//! HTTP Routes
//!
//! Configures the Axum router for a cache node.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    api_get_handler, health_handler, malformed_peer_path_handler, peer_get_handler, stats_handler,
    AppState,
};
use super::pool::DEFAULT_BASE_PATH;

/// Creates the node's router.
///
/// # Endpoints
/// - `GET /_shardcache/:group/:key` - inter-node cache protocol
/// - `GET /api/:group/:key` - client entrypoint
/// - `GET /stats` - per-group cache statistics
/// - `GET /health` - health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let peer_routes = Router::new()
        .route("/:group/:key", get(peer_get_handler))
        .fallback(malformed_peer_path_handler);

    Router::new()
        .nest(DEFAULT_BASE_PATH.trim_end_matches('/'), peer_routes)
        .route("/api/:group/:key", get(api_get_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupRegistry;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn create_test_app() -> Router {
        let registry = Arc::new(GroupRegistry::new());
        registry
            .new_group("scores", 2 << 10, |key: String| async move {
                match key.as_str() {
                    "Tom" => Ok(b"630".to_vec()),
                    _ => anyhow::bail!("{key} not exist"),
                }
            })
            .await;
        create_router(AppState::new(registry))
    }

    async fn get_uri(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn test_peer_protocol_endpoint() {
        let app = create_test_app().await;

        let (status, body) = get_uri(app, "/_shardcache/scores/Tom").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"630");
    }

    #[tokio::test]
    async fn test_peer_protocol_unknown_group() {
        let app = create_test_app().await;

        let (status, _) = get_uri(app, "/_shardcache/players/Tom").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_peer_protocol_malformed_path() {
        let app = create_test_app().await;

        let (status, _) = get_uri(app, "/_shardcache/scores").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_endpoint() {
        let app = create_test_app().await;

        let (status, body) = get_uri(app, "/api/scores/Tom").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"630");
    }

    #[tokio::test]
    async fn test_api_endpoint_loader_error() {
        let app = create_test_app().await;

        let (status, _) = get_uri(app, "/api/scores/unknown").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app().await;

        let (status, body) = get_uri(app, "/stats").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["groups"][0]["group"], "scores");
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let (status, _) = get_uri(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
    }
}
