//! HTTP 服务：HTML 页面与 JSON API

pub mod json;
pub mod pages;

use actix_web::web;

pub use json::api_routes;
pub use pages::page_routes;

/// 注册所有路由；`/api` 在页面路由之前
pub fn configure_routes(cfg: &mut web::ServiceConfig, upload_prefix: &str) {
    cfg.service(api_routes());
    page_routes(cfg, upload_prefix);
}
