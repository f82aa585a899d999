use actix_web::{HttpRequest, HttpResponse, error};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

// JSON 请求体解析失败时返回统一格式
pub fn json_error_handler(err: error::JsonPayloadError, req: &HttpRequest) -> error::Error {
    debug!("Rejected JSON payload for {}: {}", req.path(), err);
    let message = format!("Invalid request body: {err}");
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}

// 查询参数解析失败
pub fn query_error_handler(err: error::QueryPayloadError, req: &HttpRequest) -> error::Error {
    debug!("Rejected query string for {}: {}", req.path(), err);
    let message = format!("Invalid query parameters: {err}");
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, message)),
    )
    .into()
}
