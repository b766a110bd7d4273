use async_trait::async_trait;
use tracing::trace;

use crate::cache::LookupCache;
use crate::errors::Result;

/// Always misses; every resolve goes to the store.
pub struct NullLookupCache;

impl NullLookupCache {
    pub fn new() -> Self {
        trace!("Using NullLookupCache: no lookup cache will be used");
        NullLookupCache
    }
}

impl Default for NullLookupCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LookupCache for NullLookupCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "null"
    }
}
