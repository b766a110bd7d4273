use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cache::{CacheFactory, LookupCache};
use crate::config::AppConfig;
use crate::metrics::PrometheusMetrics;
use crate::notify::{Notifier, NotifierFactory};
use crate::services::{BackgroundTasks, LinkService, LinkServiceSettings, StatsService};
use crate::storage::{LinkStore, StorageBundle, StorageFactory};

pub struct StartupContext {
    pub links: Arc<dyn LinkStore>,
    pub cache: Arc<dyn LookupCache>,
    pub link_service: Arc<LinkService>,
    pub stats_service: Arc<StatsService>,
    pub tasks: BackgroundTasks,
    pub metrics: Arc<PrometheusMetrics>,
}

impl StartupContext {
    /// Wire already-built collaborators into the services.
    pub fn assemble(
        config: &AppConfig,
        storage: StorageBundle,
        cache: Arc<dyn LookupCache>,
        notifier: Arc<dyn Notifier>,
        metrics: Arc<PrometheusMetrics>,
    ) -> Self {
        let settings = LinkServiceSettings::from_config(config);
        let tasks = BackgroundTasks::new(
            config.stats.max_in_flight,
            Duration::from_millis(config.stats.record_timeout_ms),
        )
        .with_metrics(metrics.clone());

        let stats_service = Arc::new(StatsService::new(
            storage.stats.clone(),
            settings.store_timeout,
        ));
        let link_service = Arc::new(
            LinkService::new(
                storage.links.clone(),
                cache.clone(),
                stats_service.clone(),
                notifier,
                tasks.clone(),
                settings,
            )
            .with_metrics(metrics.clone()),
        );

        Self {
            links: storage.links,
            cache,
            link_service,
            stats_service,
            tasks,
            metrics,
        }
    }
}

/// 准备服务器启动的上下文
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name);

    let cache = CacheFactory::create(&config.cache)
        .await
        .context("Failed to create lookup cache")?;

    let notifier = NotifierFactory::create(&config.notify).context("Failed to create notifier")?;

    let metrics =
        Arc::new(PrometheusMetrics::new().context("Failed to create metrics registry")?);

    let context = StartupContext::assemble(config, storage, cache, notifier, metrics);

    debug!("Pre-startup processing completed in {:?}", start_time.elapsed());
    Ok(context)
}
