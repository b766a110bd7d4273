use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{debug, trace};

use crate::api::helpers::error_response;
use crate::api::types::RedirectQuery;
use crate::errors::ShortstatError;
use crate::services::LinkService;
use crate::storage::Platform;

pub struct RedirectService;

impl RedirectService {
    pub async fn handle_redirect(
        path: web::Path<String>,
        query: web::Query<RedirectQuery>,
        service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let code = path.into_inner();
        let platform = query
            .platform
            .as_deref()
            .map(Platform::parse_lossy)
            .unwrap_or_default();

        match service.resolve_with_platform(&code, platform).await {
            Ok(target) => {
                trace!("Redirecting {} -> {}", code, target);
                Self::finish_redirect(&target)
            }
            Err(e @ ShortstatError::NotFound(_)) => {
                debug!("Redirect link not found: {}", code);
                error_response(&e)
            }
            Err(e) => error_response(&e),
        }
    }

    /// HEAD requests (link previews, uptime checks) get the same answer
    /// without recording a stats event.
    pub async fn handle_head(
        path: web::Path<String>,
        service: web::Data<Arc<LinkService>>,
    ) -> impl Responder {
        let code = path.into_inner();
        match service.lookup(&code).await {
            Ok(target) => Self::finish_redirect(&target),
            Err(e) => error_response(&e),
        }
    }

    fn finish_redirect(target: &str) -> HttpResponse {
        HttpResponse::build(StatusCode::TEMPORARY_REDIRECT)
            .insert_header(("Location", target))
            .finish()
    }
}

/// Redirect 路由配置（必须最后注册）
pub fn redirect_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/redirect/{code}")
            .route(web::get().to(RedirectService::handle_redirect))
            .route(web::head().to(RedirectService::handle_head)),
    )
    .service(
        web::resource("/{code}")
            .route(web::get().to(RedirectService::handle_redirect))
            .route(web::head().to(RedirectService::handle_head)),
    );
}
