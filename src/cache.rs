//! In-memory response cache for catalog queries.
//!
//! Keys are canonical query fingerprints; values are whole catalog pages.
//! Entries live for the process lifetime, bounded by TTL eviction on
//! lookup plus an explicit sweep. Nothing is persisted: the cache exists
//! to absorb repeat queries inside the rate-limit window, not to survive
//! restarts.

use std::fmt::Display;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::catalog::CatalogPage;

/// Cached catalog page with its insertion time.
#[derive(Debug, Clone)]
struct CacheEntry {
    page: CatalogPage,
    inserted_at: Instant,
}

/// Thread-safe TTL cache of catalog responses.
#[derive(Debug)]
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    /// Creates a cache with the given TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns the cached page for a fingerprint if it is still fresh.
    /// An expired entry is removed on the way out.
    pub fn get(&self, fingerprint: &str) -> Option<CatalogPage> {
        let expired = match self.entries.get(fingerprint) {
            Some(entry) => {
                if entry.inserted_at.elapsed() < self.ttl {
                    return Some(entry.page.clone());
                }
                true
            }
            None => false,
        };

        if expired {
            self.entries.remove(fingerprint);
        }
        None
    }

    /// Stores a page under a fingerprint, stamping it with the current
    /// time.
    pub fn insert(&self, fingerprint: String, page: CatalogPage) {
        self.entries.insert(
            fingerprint,
            CacheEntry {
                page,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Removes every expired entry, returning how many were dropped.
    pub fn cleanup_expired(&self) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(
                "Cleaned up {} expired response cache entries ({} remaining)",
                removed,
                self.entries.len()
            );
        }
        removed
    }

    /// Snapshot of entry counts.
    pub fn stats(&self) -> CacheStats {
        let total = self.entries.len();
        let expired = self
            .entries
            .iter()
            .filter(|e| e.inserted_at.elapsed() >= self.ttl)
            .count();
        CacheStats {
            total_entries: total,
            expired_entries: expired,
            valid_entries: total.saturating_sub(expired),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Entry counts reported by [`ResponseCache::stats`].
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub valid_entries: usize,
}

impl Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CacheStats {{ total: {}, expired: {}, valid: {} }}",
            self.total_entries, self.expired_entries, self.valid_entries
        )
    }
}
