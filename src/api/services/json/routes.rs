//! JSON API 路由 `/api`
//!
//! 下拉框查询（`/clients`、`/campaigns/{client_id}`）公开；
//! 伙伴系统使用的端点经 [`ApiKeyAuth`] 校验。

use actix_web::web;

use super::handlers::{
    import_brands, import_kampanijos, list_campaigns_for_client, list_clients,
    list_full_clients, list_kampanijos,
};
use super::helpers::json_config;
use crate::api::middleware::ApiKeyAuth;

pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .app_data(json_config())
        .route("/clients", web::get().to(list_clients))
        .route(
            "/campaigns/{client_id}",
            web::get().to(list_campaigns_for_client),
        )
        .service(
            web::resource("/clients/full")
                .wrap(ApiKeyAuth)
                .route(web::get().to(list_full_clients)),
        )
        .service(
            web::resource("/kampanijos")
                .wrap(ApiKeyAuth)
                .route(web::get().to(list_kampanijos)),
        )
        .service(
            web::resource("/import-brands")
                .wrap(ApiKeyAuth)
                .route(web::post().to(import_brands)),
        )
        .service(
            web::resource("/import-kampanijos")
                .wrap(ApiKeyAuth)
                .route(web::post().to(import_kampanijos)),
        )
}
