//! Catalog result cache.
//!
//! Computed views are cached as opaque JSON payloads under typed keys, all
//! scoped to one coarse invalidation tag that is flushed whenever the
//! catalog is mutated. Expiry is lazy; there is no background sweep.

mod config;
mod keys;
mod layer;
mod lock;
mod store;

pub use config::CacheConfig;
pub use keys::{CacheKey, EDITIONS_TAG};
pub use layer::ResultCache;
pub use store::{CacheStore, CacheStoreError, MemoryCacheStore};
