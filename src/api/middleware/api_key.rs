//! Shared-secret authentication for the partner API
//!
//! 受保护的端点要求请求头 `X-API-Key` 与配置的 `api.api_key` 一致。
//! 未配置密钥时拒绝所有请求。

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use subtle::ConstantTimeEq;
use tracing::{info, trace, warn};

use crate::api::services::json::{ErrorBody, ErrorCode};
use crate::config::{ApiConfig, get_config};

pub const API_KEY_HEADER: &str = "X-API-Key";

/// 常量时间比较；配置为空时永不匹配
pub fn api_key_matches(expected: &str, provided: Option<&str>) -> bool {
    match provided {
        Some(provided) if !expected.is_empty() => {
            provided.as_bytes().ct_eq(expected.as_bytes()).into()
        }
        _ => false,
    }
}

#[derive(Clone, Default)]
pub struct ApiKeyAuth;

impl<S, B> Transform<S, ServiceRequest> for ApiKeyAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ApiKeyAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct ApiKeyAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    /// 应用注入的 `ApiConfig` 优先，否则读全局配置
    fn expected_key(req: &ServiceRequest) -> String {
        match req.app_data::<web::Data<ApiConfig>>() {
            Some(api) => api.api_key.clone(),
            None => get_config().api.api_key.clone(),
        }
    }

    fn handle_unauthorized(req: ServiceRequest) -> ServiceResponse<EitherBody<B>> {
        info!(
            "API key rejected for {} {}",
            req.method(),
            req.path()
        );
        req.into_response(
            HttpResponse::Unauthorized()
                .json(ErrorBody {
                    error: "Invalid API key".to_string(),
                    code: ErrorCode::Unauthorized,
                    fields: None,
                })
                .map_into_right_body(),
        )
    }
}

impl<S, B> Service<ServiceRequest> for ApiKeyAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let expected = Self::expected_key(&req);
            if expected.is_empty() {
                warn!("api.api_key is not configured; protected API endpoints are disabled");
                return Ok(Self::handle_unauthorized(req));
            }

            let provided = req
                .headers()
                .get(API_KEY_HEADER)
                .and_then(|h| h.to_str().ok());

            if !api_key_matches(&expected, provided) {
                return Ok(Self::handle_unauthorized(req));
            }

            trace!("API key accepted");
            let res = srv.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_matches() {
        assert!(api_key_matches("s3cret", Some("s3cret")));
        assert!(!api_key_matches("s3cret", Some("s3cre")));
        assert!(!api_key_matches("s3cret", Some("S3CRET")));
        assert!(!api_key_matches("s3cret", None));
        assert!(!api_key_matches("", Some("")));
        assert!(!api_key_matches("", None));
    }
}
