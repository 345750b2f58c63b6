//! Adjacency cache counters.
//!
//! All counters use relaxed ordering since they are advisory and do not
//! synchronize with other operations.

use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters owned by the memoizing cache strategy.
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
    full_clears: AtomicU64,
}

impl CacheStats {
    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_invalidations(&self, dropped: u64) {
        self.invalidations.fetch_add(dropped, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_full_clear(&self) {
        self.full_clears.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            full_clears: self.full_clears.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the adjacency cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    /// Adjacency queries answered from the cache.
    pub hits: u64,
    /// Adjacency queries computed from the underlying graph.
    pub misses: u64,
    /// Cached entries dropped because an edge touching them changed.
    pub invalidations: u64,
    /// Whole-cache clears caused by vertex removal.
    pub full_clears: u64,
}

impl CacheStatsSnapshot {
    /// Fraction of adjacency queries served from the cache (0.0 when idle).
    #[must_use]
    // Reason: advisory ratio; counts beyond 2^52 lose precision harmlessly.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            return 0.0;
        }
        self.hits as f64 / total as f64
    }
}
