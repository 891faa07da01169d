//! JSON API 帮助函数

use actix_web::{HttpRequest, HttpResponse, error::JsonPayloadError, web};
use serde::Serialize;
use tracing::{error, warn};

use super::error_code::ErrorCode;
use super::types::ErrorBody;
use crate::errors::CrmError;

/// 200 OK + JSON
pub fn json_ok<T: Serialize>(data: &T) -> HttpResponse {
    HttpResponse::Ok()
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(data)
}

/// 从 CrmError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
pub fn error_from_crm(err: &CrmError) -> HttpResponse {
    let status = err.http_status();
    if status.is_server_error() {
        error!("API request failed: {}", err);
    } else {
        warn!("API request rejected: {}", err);
    }

    let fields = match err.field_errors() {
        [] => None,
        fields => Some(fields.to_vec()),
    };

    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ErrorBody {
            error: err.message(),
            code: ErrorCode::from(err),
            fields,
        })
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T, CrmError>) -> HttpResponse {
    match result {
        Ok(data) => json_ok(&data),
        Err(e) => error_from_crm(&e),
    }
}

/// 请求体无法解析时返回 `{error}` 而不是纯文本
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        let response = error_from_crm(&CrmError::serialization(format!(
            "Invalid JSON body: {}",
            err
        )));
        actix_web::error::InternalError::from_response(err, response).into()
    })
}
