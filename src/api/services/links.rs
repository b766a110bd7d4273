use std::sync::Arc;

use actix_web::{HttpResponse, Responder, web};
use tracing::trace;

use crate::api::helpers::{api_result, error_response};
use crate::api::types::{CreateLinkBody, DeleteLinkBody};
use crate::services::LinkService;

pub struct LinkHandlers;

impl LinkHandlers {
    pub async fn create(
        service: web::Data<Arc<LinkService>>,
        body: web::Json<CreateLinkBody>,
    ) -> impl Responder {
        trace!("Create link request for {}", body.long);
        api_result(service.create_link(&body.long).await)
    }

    pub async fn list(service: web::Data<Arc<LinkService>>) -> impl Responder {
        api_result(service.get_all().await)
    }

    pub async fn delete(
        service: web::Data<Arc<LinkService>>,
        path: web::Path<String>,
    ) -> impl Responder {
        Self::delete_code(&service, &path.into_inner()).await
    }

    /// `{"id": code}` form of delete
    pub async fn delete_by_body(
        service: web::Data<Arc<LinkService>>,
        body: web::Json<DeleteLinkBody>,
    ) -> impl Responder {
        Self::delete_code(&service, &body.id).await
    }

    async fn delete_code(service: &LinkService, code: &str) -> HttpResponse {
        match service.delete_link(code).await {
            Ok(()) => HttpResponse::NoContent().finish(),
            Err(e) => error_response(&e),
        }
    }
}

/// 链接管理路由
pub fn link_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/generate").route(web::put().to(LinkHandlers::create)))
        .service(web::resource("/delete").route(web::delete().to(LinkHandlers::delete_by_body)))
        .service(
            web::resource("/links")
                .route(web::get().to(LinkHandlers::list))
                .route(web::post().to(LinkHandlers::create)),
        )
        .service(web::resource("/links/{code}").route(web::delete().to(LinkHandlers::delete)));
}
