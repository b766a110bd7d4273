use async_trait::async_trait;

use crate::errors::Result;

/// Look-aside cache mapping short code → original URL
///
/// The store stays authoritative. Every error here is transient from the
/// caller's point of view and must be answered by falling back to the store.
#[async_trait]
pub trait LookupCache: Send + Sync {
    /// `Ok(None)` is a miss.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    fn name(&self) -> &'static str;
}
