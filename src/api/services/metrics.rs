//! Prometheus metrics endpoint
//!
//! Exposes application metrics in Prometheus text format at `/metrics`.

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};

use super::AppStartTime;
use crate::api::helpers::error_response;
use crate::metrics::PrometheusMetrics;
use crate::services::BackgroundTasks;

pub struct MetricsService;

impl MetricsService {
    pub async fn metrics(
        metrics: web::Data<Arc<PrometheusMetrics>>,
        tasks: web::Data<BackgroundTasks>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let now = chrono::Utc::now();
        let uptime = (now - app_start_time.start_datetime).num_seconds().max(0) as u64;
        metrics.refresh(uptime, tasks.in_flight());

        match metrics.export() {
            Ok(output) => HttpResponse::Ok()
                .content_type("text/plain; version=0.0.4; charset=utf-8")
                .body(output),
            Err(e) => error_response(&e),
        }
    }
}

pub fn metrics_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/metrics").route(web::get().to(MetricsService::metrics)));
}
