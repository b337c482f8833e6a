//! HTTP Handlers
//!
//! Request handlers for the node's HTTP surface: the inter-node cache
//! protocol, the client API, stats and health.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::group::GroupRegistry;
use crate::models::{ErrorResponse, GroupStatsResponse, HealthResponse, StatsResponse};

// == App State ==
/// Shared state behind every handler: the process-wide group registry.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<GroupRegistry>,
}

impl AppState {
    /// Creates state over an existing registry.
    pub fn new(registry: Arc<GroupRegistry>) -> Self {
        Self { registry }
    }
}

/// Looks up the group and serves the value as an octet-stream body.
///
/// Shared by the peer protocol and the client API: 404 for an unknown
/// group, the error's own status mapping otherwise.
async fn serve_value(state: &AppState, group: &str, key: &str) -> Response {
    let Some(group) = state.registry.get_group(group).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new(format!("no such group '{group}'"))),
        )
            .into_response();
    };

    match group.get(key).await {
        Ok(view) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            view.to_vec(),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Handler for GET /_shardcache/:group/:key (peer protocol)
pub async fn peer_get_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Response {
    serve_value(&state, &group, &key).await
}

/// Handler for GET /api/:group/:key (client entrypoint)
pub async fn api_get_handler(
    State(state): State<AppState>,
    Path((group, key)): Path<(String, String)>,
) -> Response {
    serve_value(&state, &group, &key).await
}

/// Fallback under the peer base path: anything that is not
/// `/<group>/<key>` is a malformed peer request.
pub async fn malformed_peer_path_handler() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "bad request, expected /<base-path>/<group>/<key>",
        )),
    )
        .into_response()
}

/// Handler for GET /stats
///
/// Returns the local-cache counters of every registered group.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let mut rows = Vec::new();
    let mut names = state.registry.group_names().await;
    names.sort();
    for name in names {
        if let Some(group) = state.registry.get_group(&name).await {
            rows.push(GroupStatsResponse::new(name, &group.stats().await));
        }
    }
    Json(StatsResponse { groups: rows })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
