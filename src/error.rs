//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type threaded back to `Group::get` callers.
///
/// The enum is `Clone` because a coalesced load hands the leader's result,
/// error included, to every follower.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// An empty key was passed to a lookup
    #[error("key is required")]
    EmptyKey,

    /// The backend loader failed and no peer supplied the value
    #[error("backend load failed for '{key}': {reason}")]
    Backend { key: String, reason: String },

    /// A remote peer fetch failed; recovered internally by falling back
    /// to the backend loader
    #[error("peer fetch failed: {0}")]
    PeerUnavailable(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Builds a `Backend` error from the loader's underlying failure,
    /// preserving its cause chain as text.
    pub fn backend(key: impl Into<String>, source: &anyhow::Error) -> Self {
        CacheError::Backend {
            key: key.into(),
            reason: format!("{source:#}"),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::EmptyKey => StatusCode::BAD_REQUEST,
            CacheError::Backend { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::PeerUnavailable(_) => StatusCode::BAD_GATEWAY,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_keeps_cause_text() {
        let cause = anyhow::anyhow!("connection refused").context("querying source db");
        let err = CacheError::backend("Tom", &cause);

        let rendered = err.to_string();
        assert!(rendered.contains("Tom"));
        assert!(rendered.contains("querying source db"));
        assert!(rendered.contains("connection refused"));
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = CacheError::PeerUnavailable("peer returned 500".to_string());
        assert_eq!(err.clone(), err);
    }
}
