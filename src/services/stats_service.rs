//! Analytics events
//!
//! Callers decide what a failure means; inside `LinkService` every error from
//! here is logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::with_deadline;
use crate::errors::Result;
use crate::storage::{Platform, Stats, StatsStore};

pub struct StatsService {
    store: Arc<dyn StatsStore>,
    timeout: Duration,
}

impl StatsService {
    pub fn new(store: Arc<dyn StatsStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Persist one event.
    pub async fn record(&self, event: &Stats) -> Result<()> {
        with_deadline(self.timeout, "stats.record", self.store.create(event)).await?;
        debug!(
            "Recorded {} event for {}",
            event.platform, event.link_code
        );
        Ok(())
    }

    /// Build an event for `code` stamped now and persist it.
    pub async fn record_for_link(&self, code: &str, platform: Platform) -> Result<Stats> {
        let event = Stats::new(code, platform);
        self.record(&event).await?;
        Ok(event)
    }

    /// Remove every event of a link, returning how many rows went away.
    pub async fn delete_for_link(&self, code: &str) -> Result<u64> {
        with_deadline(
            self.timeout,
            "stats.delete_for_link",
            self.store.delete_by_link(code),
        )
        .await
    }

    /// Events of one link, newest first.
    pub async fn list_for_link(&self, code: &str) -> Result<Vec<Stats>> {
        with_deadline(
            self.timeout,
            "stats.list_for_link",
            self.store.list_by_link(code),
        )
        .await
    }

    pub async fn list_all(&self) -> Result<Vec<Stats>> {
        with_deadline(self.timeout, "stats.list_all", self.store.all()).await
    }
}
