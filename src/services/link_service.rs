//! Link management service
//!
//! Cache-aside orchestration over a `LinkStore` and a `LookupCache`. The store
//! is authoritative: its failures abort the operation. Cache, stats and
//! notification failures are logged and never reach the caller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{BackgroundTasks, StatsService, with_deadline};
use crate::cache::LookupCache;
use crate::config::AppConfig;
use crate::errors::{Result, ShortstatError};
use crate::metrics::{MetricsRecorder, NoopMetrics};
use crate::notify::{Notifier, creation_message};
use crate::storage::{Link, LinkStore, LinkWithStats, Platform};
use crate::utils::generate_random_code;
use crate::utils::url_validator::validate_url;

/// Knobs of `LinkService`, taken from `AppConfig` once at startup.
#[derive(Debug, Clone)]
pub struct LinkServiceSettings {
    pub code_length: usize,
    pub min_url_length: usize,
    pub list_limit: u64,
    pub max_generation_attempts: u32,
    /// Deadline for a single store call.
    pub store_timeout: Duration,
    /// Deadline for a single cache call. Elapsed lookups count as misses.
    pub cache_timeout: Duration,
    /// Record resolve events on the background pool instead of inline.
    pub detached_stats: bool,
}

impl LinkServiceSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            code_length: config.links.code_length,
            min_url_length: config.links.min_url_length,
            list_limit: config.links.list_limit,
            max_generation_attempts: config.links.max_generation_attempts.max(1),
            store_timeout: Duration::from_secs(config.database.timeout),
            cache_timeout: Duration::from_millis(config.cache.timeout_ms),
            detached_stats: config.stats.detached,
        }
    }
}

impl Default for LinkServiceSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

pub struct LinkService {
    links: Arc<dyn LinkStore>,
    cache: Arc<dyn LookupCache>,
    stats: Arc<StatsService>,
    notifier: Arc<dyn Notifier>,
    tasks: BackgroundTasks,
    settings: LinkServiceSettings,
    metrics: Arc<dyn MetricsRecorder>,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkStore>,
        cache: Arc<dyn LookupCache>,
        stats: Arc<StatsService>,
        notifier: Arc<dyn Notifier>,
        tasks: BackgroundTasks,
        settings: LinkServiceSettings,
    ) -> Self {
        Self {
            links,
            cache,
            stats,
            notifier,
            tasks,
            settings,
            metrics: NoopMetrics::arc(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn settings(&self) -> &LinkServiceSettings {
        &self.settings
    }

    pub fn tasks(&self) -> &BackgroundTasks {
        &self.tasks
    }

    fn validate(&self, original_url: &str) -> Result<()> {
        validate_url(original_url, self.settings.min_url_length)
            .map_err(|e| ShortstatError::validation(e.to_string()))
    }

    async fn store_create(&self, link: &Link) -> Result<()> {
        with_deadline(
            self.settings.store_timeout,
            "links.create",
            self.links.create(link),
        )
        .await
    }

    /// Cache read where an error or an elapsed deadline is a miss.
    async fn cache_lookup(&self, code: &str) -> Option<String> {
        let cached = match with_deadline(
            self.settings.cache_timeout,
            "cache.get",
            self.cache.get(code),
        )
        .await
        {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Cache lookup failed for '{}', using store: {}", code, e);
                None
            }
        };

        if cached.is_some() {
            self.metrics.inc_cache_hit(self.cache.name());
        } else {
            self.metrics.inc_cache_miss(self.cache.name());
        }
        cached
    }

    /// Cache write that can only log.
    async fn populate_cache(&self, code: &str, original_url: &str) {
        if let Err(e) = with_deadline(
            self.settings.cache_timeout,
            "cache.set",
            self.cache.set(code, original_url),
        )
        .await
        {
            warn!("Cache populate failed for '{}': {}", code, e);
        }
    }

    /// Stats write that can only log. Detached runs on the background pool.
    async fn record_event(&self, code: &str, platform: Platform, detached: bool) {
        if detached {
            let stats = self.stats.clone();
            let metrics = self.metrics.clone();
            let code = code.to_string();
            self.tasks.spawn(format!("stats:{}", code), async move {
                let result = stats.record_for_link(&code, platform).await;
                if result.is_err() {
                    metrics.inc_stats_failure("record");
                }
                result.map(|_| ())
            });
            return;
        }

        if let Err(e) = self.stats.record_for_link(code, platform).await {
            self.metrics.inc_stats_failure("record");
            warn!("Stats record failed for '{}': {}", code, e);
        }
    }

    fn announce(&self, code: &str) {
        let notifier = self.notifier.clone();
        let message = creation_message(code);
        self.tasks.spawn(format!("notify:{}", code), async move {
            notifier.notify(&message).await
        });
    }

    /// Shorten `original_url` under a freshly generated code.
    ///
    /// A `DuplicateKey` from the store triggers a new code, up to
    /// `max_generation_attempts` writes in total. Any other store error
    /// aborts at once.
    pub async fn create_link(&self, original_url: &str) -> Result<Link> {
        self.validate(original_url)?;
        let original_url = original_url.trim();

        let mut attempt = 0;
        let link = loop {
            attempt += 1;
            let link = Link::new(
                generate_random_code(self.settings.code_length),
                original_url,
            );

            match self.store_create(&link).await {
                Ok(()) => break link,
                Err(ShortstatError::DuplicateKey(msg))
                    if attempt < self.settings.max_generation_attempts =>
                {
                    warn!(
                        "Generated code collided (attempt {}/{}): {}",
                        attempt, self.settings.max_generation_attempts, msg
                    );
                }
                Err(e) => return Err(e),
            }
        };

        self.populate_cache(&link.code, &link.original_url).await;
        self.record_event(&link.code, Platform::Unknown, false).await;
        self.announce(&link.code);
        self.metrics.inc_link_created();

        info!(
            "LinkService: created link '{}' -> '{}'",
            link.code, link.original_url
        );
        Ok(link)
    }

    /// Store a pre-built link and populate the cache. No regeneration.
    pub async fn create(&self, link: &Link) -> Result<()> {
        self.validate(&link.original_url)?;
        self.store_create(link).await?;
        self.populate_cache(&link.code, &link.original_url).await;
        debug!("LinkService: stored link '{}'", link.code);
        Ok(())
    }

    pub async fn resolve(&self, code: &str) -> Result<String> {
        self.resolve_with_platform(code, Platform::Unknown).await
    }

    /// `lookup` plus one stats event for `platform`.
    pub async fn resolve_with_platform(&self, code: &str, platform: Platform) -> Result<String> {
        let original_url = match self.lookup(code).await {
            Ok(url) => url,
            Err(e) => {
                let result = match e {
                    ShortstatError::NotFound(_) => "not_found",
                    _ => "error",
                };
                self.metrics.inc_resolve(result);
                return Err(e);
            }
        };

        self.record_event(code, platform, self.settings.detached_stats)
            .await;
        self.metrics.inc_resolve("success");
        Ok(original_url)
    }

    /// Cache first, then the store, without recording an event. A cache
    /// error or timeout is treated as a miss.
    pub async fn lookup(&self, code: &str) -> Result<String> {
        let original_url = match self.cache_lookup(code).await {
            Some(url) => {
                debug!("Cache hit for '{}'", code);
                url
            }
            None => {
                let link = with_deadline(
                    self.settings.store_timeout,
                    "links.get",
                    self.links.get(code),
                )
                .await?;
                self.populate_cache(&link.code, &link.original_url).await;
                link.original_url
            }
        };

        Ok(original_url)
    }

    pub async fn get_link(&self, code: &str) -> Result<Link> {
        with_deadline(
            self.settings.store_timeout,
            "links.get",
            self.links.get(code),
        )
        .await
    }

    /// Newest first, at most `list_limit` links. Bypasses the cache.
    pub async fn get_all(&self) -> Result<Vec<Link>> {
        with_deadline(
            self.settings.store_timeout,
            "links.all",
            self.links.all(self.settings.list_limit),
        )
        .await
    }

    /// `get_all` with each link's events attached. A link whose events
    /// cannot be read gets an empty list.
    pub async fn get_all_with_stats(&self) -> Result<Vec<LinkWithStats>> {
        let links = self.get_all().await?;
        let mut result = Vec::with_capacity(links.len());

        for link in links {
            let stats = match self.stats.list_for_link(&link.code).await {
                Ok(stats) => stats,
                Err(e) => {
                    self.metrics.inc_stats_failure("list");
                    warn!("Stats lookup failed for '{}': {}", link.code, e);
                    Vec::new()
                }
            };
            result.push(LinkWithStats { link, stats });
        }

        Ok(result)
    }

    /// Delete from the store, then evict and drop the link's events.
    ///
    /// Not atomic with a concurrent `resolve`: a resolve that missed the
    /// cache and read the row before the delete can backfill the cache after
    /// the eviction. That entry is served until `cache.default_ttl` expires.
    pub async fn delete_link(&self, code: &str) -> Result<()> {
        with_deadline(
            self.settings.store_timeout,
            "links.delete",
            self.links.delete(code),
        )
        .await?;

        if let Err(e) = with_deadline(
            self.settings.cache_timeout,
            "cache.remove",
            self.cache.remove(code),
        )
        .await
        {
            warn!("Cache eviction failed for '{}': {}", code, e);
        }

        match self.stats.delete_for_link(code).await {
            Ok(count) => debug!("Removed {} stats rows for '{}'", count, code),
            Err(e) => {
                self.metrics.inc_stats_failure("delete");
                warn!("Stats cleanup failed for '{}': {}", code, e);
            }
        }

        info!("LinkService: deleted '{}'", code);
        Ok(())
    }
}
