//! In-process storage backend (`memory://`)
//!
//! Nothing survives a restart. Used for local runs and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::info;

use super::models::{Link, Stats};
use super::traits::{LinkStore, StatsStore};
use crate::errors::{Result, ShortstatError};

#[derive(Default)]
pub struct MemoryStorage {
    links: DashMap<String, Link>,
    stats: DashMap<String, Stats>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        info!("MEMORY Storage initialized.");
        Self::default()
    }
}

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> chrono::DateTime<chrono::Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

#[async_trait]
impl LinkStore for MemoryStorage {
    async fn create(&self, link: &Link) -> Result<()> {
        match self.links.entry(link.code.clone()) {
            Entry::Occupied(_) => Err(ShortstatError::duplicate_key(format!(
                "Short code already exists: {}",
                link.code
            ))),
            Entry::Vacant(slot) => {
                slot.insert(link.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, code: &str) -> Result<Link> {
        self.links
            .get(code)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ShortstatError::not_found(format!("Short link not found: {}", code)))
    }

    async fn all(&self, limit: u64) -> Result<Vec<Link>> {
        let mut links: Vec<Link> = self.links.iter().map(|e| e.value().clone()).collect();
        newest_first(&mut links, |l| l.created_at);
        links.truncate(limit as usize);
        Ok(links)
    }

    async fn delete(&self, code: &str) -> Result<()> {
        self.links
            .remove(code)
            .map(|_| ())
            .ok_or_else(|| ShortstatError::not_found(format!("Short link not found: {}", code)))
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.links.len() as u64)
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}

#[async_trait]
impl StatsStore for MemoryStorage {
    async fn create(&self, stats: &Stats) -> Result<()> {
        match self.stats.entry(stats.id.clone()) {
            Entry::Occupied(_) => Err(ShortstatError::duplicate_key(format!(
                "Stats id already exists: {}",
                stats.id
            ))),
            Entry::Vacant(slot) => {
                slot.insert(stats.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &str) -> Result<Stats> {
        self.stats
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ShortstatError::not_found(format!("Stats not found: {}", id)))
    }

    async fn all(&self) -> Result<Vec<Stats>> {
        let mut rows: Vec<Stats> = self.stats.iter().map(|e| e.value().clone()).collect();
        newest_first(&mut rows, |s| s.created_at);
        Ok(rows)
    }

    async fn list_by_link(&self, code: &str) -> Result<Vec<Stats>> {
        let mut rows: Vec<Stats> = self
            .stats
            .iter()
            .filter(|e| e.value().link_code == code)
            .map(|e| e.value().clone())
            .collect();
        newest_first(&mut rows, |s| s.created_at);
        Ok(rows)
    }

    async fn delete_by_link(&self, code: &str) -> Result<u64> {
        let before = self.stats.len();
        self.stats.retain(|_, stats| stats.link_code != code);
        Ok(before.saturating_sub(self.stats.len()) as u64)
    }
}
