//! Shared test doubles
//!
//! Every double wraps or replaces one collaborator so a test can count calls
//! or force failures without touching the others.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use shortstat::cache::LookupCache;
use shortstat::errors::{Result, ShortstatError};
use shortstat::notify::Notifier;
use shortstat::services::{BackgroundTasks, LinkService, LinkServiceSettings, StatsService};
use shortstat::storage::{Link, LinkStore, MemoryStorage, Stats, StatsStore};

// =============================================================================
// Link store
// =============================================================================

/// MemoryStorage with call counters and injectable failures
#[derive(Default)]
pub struct CountingLinkStore {
    inner: MemoryStorage,
    pub creates: AtomicUsize,
    pub gets: AtomicUsize,
    pub deletes: AtomicUsize,
    /// The next N creates fail with `DuplicateKey` without writing.
    pub forced_duplicates: AtomicUsize,
    /// Every call fails with a connection error.
    pub unavailable: AtomicBool,
}

impl CountingLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_duplicates(&self, n: usize) {
        self.forced_duplicates.store(n, Ordering::SeqCst);
    }

    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    pub fn total_calls(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
            + self.gets.load(Ordering::SeqCst)
            + self.deletes.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ShortstatError::database_connection("link store is down"));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkStore for CountingLinkStore {
    async fn create(&self, link: &Link) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        let forced = self
            .forced_duplicates
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if forced.is_ok() {
            return Err(ShortstatError::duplicate_key(format!(
                "Key already exists: {}",
                link.code
            )));
        }
        LinkStore::create(&self.inner, link).await
    }

    async fn get(&self, code: &str) -> Result<Link> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        LinkStore::get(&self.inner, code).await
    }

    async fn all(&self, limit: u64) -> Result<Vec<Link>> {
        self.check_available()?;
        LinkStore::all(&self.inner, limit).await
    }

    async fn delete(&self, code: &str) -> Result<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        LinkStore::delete(&self.inner, code).await
    }

    async fn count(&self) -> Result<u64> {
        self.check_available()?;
        LinkStore::count(&self.inner).await
    }

    fn backend_name(&self) -> &str {
        "counting"
    }
}

/// Link store whose calls never return
pub struct HangingLinkStore;

#[async_trait]
impl LinkStore for HangingLinkStore {
    async fn create(&self, _link: &Link) -> Result<()> {
        std::future::pending().await
    }

    async fn get(&self, _code: &str) -> Result<Link> {
        std::future::pending().await
    }

    async fn all(&self, _limit: u64) -> Result<Vec<Link>> {
        std::future::pending().await
    }

    async fn delete(&self, _code: &str) -> Result<()> {
        std::future::pending().await
    }

    async fn count(&self) -> Result<u64> {
        std::future::pending().await
    }

    fn backend_name(&self) -> &str {
        "hanging"
    }
}

// =============================================================================
// Stats store
// =============================================================================

/// Stats store that is never reachable
#[derive(Default)]
pub struct FailingStatsStore {
    pub calls: AtomicUsize,
}

impl FailingStatsStore {
    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ShortstatError::database_connection("stats store is down"))
    }
}

#[async_trait]
impl StatsStore for FailingStatsStore {
    async fn create(&self, _stats: &Stats) -> Result<()> {
        self.fail()
    }

    async fn get(&self, _id: &str) -> Result<Stats> {
        self.fail()
    }

    async fn all(&self) -> Result<Vec<Stats>> {
        self.fail()
    }

    async fn list_by_link(&self, _code: &str) -> Result<Vec<Stats>> {
        self.fail()
    }

    async fn delete_by_link(&self, _code: &str) -> Result<u64> {
        self.fail()
    }
}

/// Memory stats store whose writes take `delay` before landing
pub struct SlowStatsStore {
    inner: MemoryStorage,
    delay: Duration,
}

impl SlowStatsStore {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: MemoryStorage::new(),
            delay,
        }
    }
}

#[async_trait]
impl StatsStore for SlowStatsStore {
    async fn create(&self, stats: &Stats) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        StatsStore::create(&self.inner, stats).await
    }

    async fn get(&self, id: &str) -> Result<Stats> {
        StatsStore::get(&self.inner, id).await
    }

    async fn all(&self) -> Result<Vec<Stats>> {
        StatsStore::all(&self.inner).await
    }

    async fn list_by_link(&self, code: &str) -> Result<Vec<Stats>> {
        self.inner.list_by_link(code).await
    }

    async fn delete_by_link(&self, code: &str) -> Result<u64> {
        self.inner.delete_by_link(code).await
    }
}

// =============================================================================
// Cache
// =============================================================================

/// HashMap-backed cache with call counters
#[derive(Default)]
pub struct RecordingCache {
    data: RwLock<HashMap<String, String>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub removes: AtomicUsize,
}

impl RecordingCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn peek(&self, key: &str) -> Option<String> {
        self.data.read().await.get(key).cloned()
    }

    /// Put a value behind the service's back.
    pub async fn seed(&self, key: &str, value: &str) {
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }
}

#[async_trait]
impl LookupCache for RecordingCache {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.data
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.removes.fetch_add(1, Ordering::SeqCst);
        self.data.write().await.remove(key);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Cache whose every call fails
#[derive(Default)]
pub struct FailingCache {
    pub calls: AtomicUsize,
}

impl FailingCache {
    fn fail<T>(&self) -> Result<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ShortstatError::cache_connection("cache is down"))
    }
}

#[async_trait]
impl LookupCache for FailingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        self.fail()
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.fail()
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        self.fail()
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}

/// Cache whose calls never return
#[derive(Default)]
pub struct StallingCache {
    pub calls: AtomicUsize,
}

#[async_trait]
impl LookupCache for StallingCache {
    async fn get(&self, _key: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::future::pending().await
    }

    fn name(&self) -> &'static str {
        "stalling"
    }
}

// =============================================================================
// Notifier
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    pub messages: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            messages: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message.to_string());
        }
        if self.fail {
            return Err(ShortstatError::notify("webhook unreachable"));
        }
        Ok(())
    }
}

// =============================================================================
// Service wiring
// =============================================================================

pub struct Harness {
    pub links: Arc<CountingLinkStore>,
    pub stats_store: Arc<dyn StatsStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub stats: Arc<StatsService>,
    pub tasks: BackgroundTasks,
    pub service: LinkService,
}

pub fn settings() -> LinkServiceSettings {
    LinkServiceSettings {
        store_timeout: Duration::from_secs(2),
        cache_timeout: Duration::from_millis(100),
        ..LinkServiceSettings::default()
    }
}

pub fn harness_with(
    stats_store: Arc<dyn StatsStore>,
    cache: Arc<dyn LookupCache>,
    notifier: Arc<RecordingNotifier>,
    settings: LinkServiceSettings,
) -> Harness {
    let links = Arc::new(CountingLinkStore::new());
    let tasks = BackgroundTasks::new(64, Duration::from_secs(2));
    let stats = Arc::new(StatsService::new(
        stats_store.clone(),
        settings.store_timeout,
    ));
    let service = LinkService::new(
        links.clone(),
        cache,
        stats.clone(),
        notifier.clone(),
        tasks.clone(),
        settings,
    );

    Harness {
        links,
        stats_store,
        notifier,
        stats,
        tasks,
        service,
    }
}

/// Memory stats store, the given cache, recording notifier
pub fn harness_with_cache(cache: Arc<dyn LookupCache>) -> Harness {
    harness_with(
        Arc::new(MemoryStorage::new()),
        cache,
        Arc::new(RecordingNotifier::default()),
        settings(),
    )
}
