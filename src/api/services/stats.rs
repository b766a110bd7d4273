use std::sync::Arc;

use actix_web::{Responder, web};

use crate::api::helpers::{api_result, error_response};
use crate::services::{LinkService, StatsService};

pub struct StatsHandlers;

impl StatsHandlers {
    /// Every listed link with its events
    pub async fn overview(service: web::Data<Arc<LinkService>>) -> impl Responder {
        api_result(service.get_all_with_stats().await)
    }

    /// Events of one link; 404 when the link does not exist
    pub async fn for_link(
        links: web::Data<Arc<LinkService>>,
        stats: web::Data<Arc<StatsService>>,
        path: web::Path<String>,
    ) -> impl Responder {
        let code = path.into_inner();
        if let Err(e) = links.get_link(&code).await {
            return error_response(&e);
        }
        api_result(stats.list_for_link(&code).await)
    }
}

pub fn stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/stats").route(web::get().to(StatsHandlers::overview)))
        .service(web::resource("/stats/{code}").route(web::get().to(StatsHandlers::for_link)));
}
