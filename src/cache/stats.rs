//! Cache Statistics Module
//!
//! Tracks per-group cache performance metrics.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of a group's local-cache behavior.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
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
}

impl CacheStats {
    // == Constructor ==
    /// Creates stats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }
}
