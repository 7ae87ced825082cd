//! Cache store interface and the in-memory tagged store.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::RwLock;
use std::time::{Duration, Instant};

use bytes::Bytes;
use lru::LruCache;
use thiserror::Error;

use super::config::CacheConfig;
use super::keys::CacheKey;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// The backing store is unreachable or refused the operation.
#[derive(Debug, Error)]
#[error("cache store unavailable: {0}")]
pub struct CacheStoreError(pub String);

/// Tag-scoped byte store with per-entry TTL.
///
/// Implementations must be safe for concurrent access from simultaneous
/// requests; get and put are atomic per key.
pub trait CacheStore: Send + Sync {
    fn has(&self, tag: &str, key: &CacheKey) -> Result<bool, CacheStoreError>;

    fn get(&self, tag: &str, key: &CacheKey) -> Result<Option<Bytes>, CacheStoreError>;

    fn put(
        &self,
        tag: &str,
        key: CacheKey,
        payload: Bytes,
        ttl: Duration,
    ) -> Result<(), CacheStoreError>;

    /// Drop every entry stored under `tag`.
    fn invalidate_tag(&self, tag: &str) -> Result<(), CacheStoreError>;
}

struct StoredEntry {
    payload: Bytes,
    expires_at: Instant,
}

impl StoredEntry {
    fn fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// In-memory `CacheStore` with LRU bounding per tag and lazy TTL expiry.
pub struct MemoryCacheStore {
    capacity: NonZeroUsize,
    tags: RwLock<HashMap<String, LruCache<CacheKey, StoredEntry>>>,
}

impl MemoryCacheStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            capacity: config.capacity_non_zero(),
            tags: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live entries under `tag`, stale ones included.
    pub fn len(&self, tag: &str) -> usize {
        rw_read(&self.tags, SOURCE, "len")
            .get(tag)
            .map_or(0, LruCache::len)
    }

    pub fn is_empty(&self, tag: &str) -> bool {
        self.len(tag) == 0
    }
}

impl CacheStore for MemoryCacheStore {
    fn has(&self, tag: &str, key: &CacheKey) -> Result<bool, CacheStoreError> {
        Ok(self.get(tag, key)?.is_some())
    }

    fn get(&self, tag: &str, key: &CacheKey) -> Result<Option<Bytes>, CacheStoreError> {
        let mut tags = rw_write(&self.tags, SOURCE, "get");
        let Some(entries) = tags.get_mut(tag) else {
            return Ok(None);
        };

        let now = Instant::now();
        if let Some(entry) = entries.get(key) {
            if entry.fresh(now) {
                return Ok(Some(entry.payload.clone()));
            }
        } else {
            return Ok(None);
        }

        // Expired: dropped on access, there is no background sweep.
        entries.pop(key);
        Ok(None)
    }

    fn put(
        &self,
        tag: &str,
        key: CacheKey,
        payload: Bytes,
        ttl: Duration,
    ) -> Result<(), CacheStoreError> {
        let mut tags = rw_write(&self.tags, SOURCE, "put");
        let entries = tags
            .entry(tag.to_string())
            .or_insert_with(|| LruCache::new(self.capacity));
        entries.put(
            key,
            StoredEntry {
                payload,
                expires_at: Instant::now() + ttl,
            },
        );
        Ok(())
    }

    fn invalidate_tag(&self, tag: &str) -> Result<(), CacheStoreError> {
        let mut tags = rw_write(&self.tags, SOURCE, "invalidate_tag");
        if let Some(entries) = tags.get_mut(tag) {
            entries.clear();
        }
        Ok(())
    }
}
