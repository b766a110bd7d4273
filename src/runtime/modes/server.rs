use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::services::{
    AppStartTime, health_routes, link_routes, metrics_routes, redirect_routes, stats_routes,
};
use crate::config::AppConfig;
use crate::runtime::lifetime;

pub async fn run_server(config: &AppConfig) -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup(config)
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {:#}", e))?;

    let links = startup.links.clone();
    let cache = startup.cache.clone();
    let link_service = startup.link_service.clone();
    let stats_service = startup.stats_service.clone();
    let tasks = startup.tasks.clone();
    let metrics = startup.metrics.clone();

    let workers = config.server.workers.clamp(1, 32);
    info!("Using {} workers for the server", workers);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("Cache-Control", "no-cache, no-store, must-revalidate")))
            .app_data(web::Data::new(links.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(link_service.clone()))
            .app_data(web::Data::new(stats_service.clone()))
            .app_data(web::Data::new(tasks.clone()))
            .app_data(web::Data::new(metrics.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(64 * 1024))
            .configure(health_routes)
            .configure(metrics_routes)
            .configure(link_routes)
            .configure(stats_routes)
            // catch-all, must be last
            .configure(redirect_routes)
    })
    .workers(workers)
    .disable_signals();

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run();
    let handle = server.handle();

    let shutdown_tasks = startup.tasks.clone();
    actix_web::rt::spawn(async move {
        lifetime::shutdown::listen_for_shutdown().await;
        // 先停止接收新请求，等后台任务写完再关闭 worker
        handle.pause().await;
        lifetime::shutdown::drain_background_tasks(&shutdown_tasks).await;
        handle.stop(true).await;
    });

    server.await.context("HTTP server failed")?;
    warn!("Graceful shutdown: all tasks completed");
    Ok(())
}
