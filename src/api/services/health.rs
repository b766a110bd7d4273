use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{Responder, web};
use tracing::{error, info, trace, warn};

use crate::api::helpers::json_response;
use crate::api::types::{HealthCacheCheck, HealthChecks, HealthResponse, HealthStorageCheck};
use crate::cache::LookupCache;
use crate::services::BackgroundTasks;
use crate::storage::LinkStore;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);
const CACHE_PROBE_KEY: &str = "__health__";

// 应用启动时间结构体
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// Health Service
///
/// Talks to the store and cache directly so a probe does not depend on
/// service-layer behaviour.
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        links: web::Data<Arc<dyn LinkStore>>,
        cache: web::Data<Arc<dyn LookupCache>>,
        tasks: web::Data<BackgroundTasks>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start_time = Instant::now();
        trace!("Received health check request");

        let backend = links.backend_name().to_string();
        let storage = match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, links.count()).await {
            Ok(Ok(count)) => HealthStorageCheck {
                status: "healthy".to_string(),
                backend,
                links_count: Some(count),
                error: None,
            },
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    links_count: None,
                    error: Some(e.to_string()),
                }
            }
            Err(_) => {
                error!("Storage health check timeout");
                HealthStorageCheck {
                    status: "unhealthy".to_string(),
                    backend,
                    links_count: None,
                    error: Some("timeout".to_string()),
                }
            }
        };

        // 缓存不可用只算降级，不影响整体状态
        let cache_check =
            match tokio::time::timeout(HEALTH_CHECK_TIMEOUT, cache.get(CACHE_PROBE_KEY)).await {
                Ok(Ok(_)) => HealthCacheCheck {
                    status: "healthy".to_string(),
                    cache_type: cache.name().to_string(),
                    error: None,
                },
                Ok(Err(e)) => {
                    warn!("Cache health check failed: {}", e);
                    HealthCacheCheck {
                        status: "degraded".to_string(),
                        cache_type: cache.name().to_string(),
                        error: Some(e.to_string()),
                    }
                }
                Err(_) => HealthCacheCheck {
                    status: "degraded".to_string(),
                    cache_type: cache.name().to_string(),
                    error: Some("timeout".to_string()),
                },
            };

        let now = chrono::Utc::now();
        let uptime_seconds = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        let is_healthy = storage.status == "healthy";

        let response = HealthResponse {
            status: if is_healthy { "healthy" } else { "unhealthy" }.to_string(),
            timestamp: now.to_rfc3339(),
            uptime: uptime_seconds,
            background_tasks: tasks.in_flight(),
            checks: HealthChecks {
                storage,
                cache: cache_check,
            },
            response_time_ms: start_time.elapsed().as_millis() as u64,
        };

        let status = if is_healthy {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };

        info!(
            "Health check completed in {:?}, status: {}",
            start_time.elapsed(),
            response.status
        );
        json_response(status, &response)
    }
}

pub fn health_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(HealthService::health_check)));
}
