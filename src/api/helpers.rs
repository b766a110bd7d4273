//! Response helpers

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::error;

use super::types::ErrorBody;
use crate::errors::ShortstatError;

pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(body)
}

/// Map a service error to its HTTP status with `{"error", "code"}`.
pub fn error_response(err: &ShortstatError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("Request failed: {}", err);
    }
    json_response(
        status,
        &ErrorBody {
            error: err.message().to_string(),
            code: err.code(),
        },
    )
}

/// 成功时 200 + JSON，失败时按错误类型映射状态码
pub fn api_result<T: Serialize>(result: Result<T, ShortstatError>) -> HttpResponse {
    match result {
        Ok(data) => json_response(StatusCode::OK, &data),
        Err(e) => error_response(&e),
    }
}
