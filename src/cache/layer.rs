//! Result cache: get-or-compute over a tag-scoped byte store.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bytes::Bytes;
use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::keys::{CacheKey, EDITIONS_TAG};
use super::store::CacheStore;

/// Serves computed results from the store, recomputing on miss.
///
/// Shared process-wide: constructed once at startup and injected into every
/// request handler. An unavailable backing store degrades the layer to
/// always-compute; requests keep being served.
pub struct ResultCache {
    store: Arc<dyn CacheStore>,
    config: CacheConfig,
    degraded: AtomicBool,
}

impl ResultCache {
    pub fn new(store: Arc<dyn CacheStore>, config: CacheConfig) -> Self {
        Self {
            store,
            config,
            degraded: AtomicBool::new(false),
        }
    }

    /// Return the cached result under `key`, or compute, store, and return it.
    ///
    /// A cache write failure never fails the request. A compute error is
    /// returned as-is and nothing is stored, so a not-found can never be
    /// masked by a cached entry. Concurrent cold misses may recompute
    /// redundantly; invalidation is rare enough that no in-flight
    /// deduplication is attempted.
    pub async fn get_or_compute<T, E, F, Fut>(&self, key: CacheKey, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if self.config.enabled {
            match self.store.get(EDITIONS_TAG, &key) {
                Ok(Some(payload)) => match serde_json::from_slice(&payload) {
                    Ok(value) => {
                        counter!("periodika_cache_hit_total", "namespace" => key.namespace())
                            .increment(1);
                        return Ok(value);
                    }
                    Err(error) => {
                        // Undecodable payloads read as misses.
                        warn!(
                            namespace = key.namespace(),
                            error = %error,
                            "Discarding undecodable cache payload"
                        );
                    }
                },
                Ok(None) => {}
                Err(error) => self.report_unavailable(&error),
            }
            counter!("periodika_cache_miss_total", "namespace" => key.namespace()).increment(1);
        }

        let value = compute().await?;

        if self.config.enabled {
            match serde_json::to_vec(&value) {
                Ok(encoded) => {
                    match self
                        .store
                        .put(EDITIONS_TAG, key, Bytes::from(encoded), self.config.ttl())
                    {
                        Ok(()) => {
                            counter!("periodika_cache_store_total").increment(1);
                        }
                        Err(error) => self.report_unavailable(&error),
                    }
                }
                Err(error) => {
                    warn!(error = %error, "Failed to encode result for caching");
                }
            }
        }

        Ok(value)
    }

    /// Flush every entry under the shared catalog tag.
    pub fn invalidate(&self) {
        match self.store.invalidate_tag(EDITIONS_TAG) {
            Ok(()) => {
                self.degraded.store(false, Ordering::Relaxed);
                counter!("periodika_cache_invalidate_total").increment(1);
                debug!(tag = EDITIONS_TAG, "Invalidated cache tag");
            }
            Err(error) => self.report_unavailable(&error),
        }
    }

    /// Log the first failure at warn, later ones at debug, so an outage of
    /// the backing store does not flood the log.
    fn report_unavailable(&self, error: &dyn std::error::Error) {
        counter!("periodika_cache_unavailable_total").increment(1);
        if self.degraded.swap(true, Ordering::Relaxed) {
            debug!(error = %error, "Cache store still unavailable");
        } else {
            warn!(error = %error, "Cache store unavailable; serving computed results");
        }
    }
}
