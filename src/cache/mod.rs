//! Lookup cache (code → original URL)

pub mod object_cache;
pub mod traits;

use std::sync::Arc;

use tracing::{info, warn};

pub use object_cache::{MokaLookupCache, NullLookupCache, RedisLookupCache};
pub use traits::LookupCache;

use crate::config::{CacheConfig, CacheKind};
use crate::errors::Result;

pub struct CacheFactory;

impl CacheFactory {
    /// An unreachable Redis server is not fatal: the cache reconnects lazily
    /// and every failed lookup falls back to the store.
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn LookupCache>> {
        let cache: Arc<dyn LookupCache> = match config.cache_type {
            CacheKind::Memory => Arc::new(MokaLookupCache::new(config)),
            CacheKind::Null => Arc::new(NullLookupCache::new()),
            CacheKind::Redis => {
                let redis = RedisLookupCache::new(config)?;
                if let Err(e) = redis.ping().await {
                    warn!(
                        "Redis at {} is not reachable yet, continuing: {}",
                        config.redis.url, e
                    );
                }
                Arc::new(redis)
            }
        };

        info!("Lookup cache: {}", cache.name());
        Ok(cache)
    }
}
