//! Rate-limited, cached front door to a catalog client.
//!
//! All outbound traffic for a process funnels through one
//! [`CachedCatalog`]: a fresh cache hit short-circuits, everything else
//! queues FIFO on a single async mutex, sleeps out the remaining
//! interval, and only then hits the wire. The interval clock is stamped
//! *before* the request so concurrent callers space their requests
//! correctly, and a cancelled request never leaves the clock in the
//! future.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{CatalogPage, CatalogQuery, CpeCatalog};
use crate::cache::{CacheStats, ResponseCache};
use crate::error::DiscoveryError;

/// Enforces a minimum interval between outbound requests.
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    /// Sleeps until the interval since the previous request has passed,
    /// then stamps the clock for the next caller.
    async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}

/// Catalog decorator adding the process-wide response cache and rate
/// limiter in front of any [`CpeCatalog`].
pub struct CachedCatalog<C> {
    inner: C,
    cache: ResponseCache,
    limiter: Mutex<RateLimiter>,
}

impl<C: CpeCatalog> CachedCatalog<C> {
    /// Wraps a catalog client.
    pub fn new(inner: C, min_interval: Duration, cache_ttl: Duration) -> Self {
        Self {
            inner,
            cache: ResponseCache::new(cache_ttl),
            limiter: Mutex::new(RateLimiter::new(min_interval)),
        }
    }

    /// Cache entry counts, for operational visibility.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drops expired cache entries.
    pub fn evict_expired(&self) -> usize {
        self.cache.cleanup_expired()
    }
}

impl<C: CpeCatalog> CpeCatalog for CachedCatalog<C> {
    async fn search(&self, query: &CatalogQuery) -> Result<CatalogPage, DiscoveryError> {
        let fingerprint = query.fingerprint();

        if let Some(page) = self.cache.get(&fingerprint) {
            tracing::debug!(%fingerprint, "catalog cache hit");
            return Ok(page);
        }

        // The lock is held across the fetch: callers with the same
        // fingerprint must not trigger a second outbound request inside
        // the TTL, and everyone else queues FIFO behind the interval
        // clock anyway.
        let mut limiter = self.limiter.lock().await;

        // A caller ahead of us in the queue may have fetched this exact
        // query while we waited.
        if let Some(page) = self.cache.get(&fingerprint) {
            tracing::debug!(%fingerprint, "catalog cache hit after queueing");
            return Ok(page);
        }

        limiter.wait().await;

        tracing::debug!(%fingerprint, "catalog fetch");
        let page = self.inner.search(query).await?;
        self.cache.insert(fingerprint, page.clone());

        Ok(page)
    }
}
