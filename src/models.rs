//! Response DTOs for the node's HTTP surface
//!
//! Value bytes travel as raw octet-stream bodies; these types cover the
//! JSON side (stats, health, errors).

use serde::Serialize;

use crate::cache::CacheStats;

/// Per-group slice of the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct GroupStatsResponse {
    /// Group namespace name
    pub group: String,
    /// Number of local-cache hits
    pub hits: u64,
    /// Number of local-cache misses
    pub misses: u64,
    /// Number of entries evicted under the byte budget
    pub evictions: u64,
    /// Current number of entries in the local store
    pub entries: usize,
    /// Bytes currently accounted for (keys + values)
    pub used_bytes: u64,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl GroupStatsResponse {
    /// Creates a per-group stats row from a stats snapshot
    pub fn new(group: impl Into<String>, stats: &CacheStats) -> Self {
        Self {
            group: group.into(),
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            entries: stats.entries,
            used_bytes: stats.used_bytes,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// One row per registered group
    pub groups: Vec<GroupStatsResponse>,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
