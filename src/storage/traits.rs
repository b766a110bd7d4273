//! Store contracts consumed by the services
//!
//! Cancellation is by dropping the returned future; deadlines are applied by
//! the caller.

use async_trait::async_trait;

use super::models::{Link, Stats};
use crate::errors::Result;

/// 短链接持久化
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Insert a new link. Fails with `DuplicateKey` when the code is taken.
    async fn create(&self, link: &Link) -> Result<()>;

    /// Fails with `NotFound` when no row has this code.
    async fn get(&self, code: &str) -> Result<Link>;

    /// Newest first, at most `limit` rows.
    async fn all(&self, limit: u64) -> Result<Vec<Link>>;

    /// Fails with `NotFound` when zero rows were affected.
    async fn delete(&self, code: &str) -> Result<()>;

    async fn count(&self) -> Result<u64>;

    fn backend_name(&self) -> &str;
}

/// 统计事件持久化
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Fails with `DuplicateKey` when the id is taken.
    async fn create(&self, stats: &Stats) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Stats>;

    /// Newest first.
    async fn all(&self) -> Result<Vec<Stats>>;

    /// Newest first, only rows whose `link_code` equals `code`.
    async fn list_by_link(&self, code: &str) -> Result<Vec<Stats>>;

    /// Returns the number of deleted rows; zero is not an error.
    async fn delete_by_link(&self, code: &str) -> Result<u64>;
}
