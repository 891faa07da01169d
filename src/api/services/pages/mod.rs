//! 服务端渲染的 HTML 页面
//!
//! 表单校验失败时以 400 重新渲染并回填；成功后 303 重定向并附带提示。

mod clients;
mod dashboard;
pub mod flash;
mod layout;
mod plans;
mod screens;

use actix_web::web;

pub use flash::{FLASH_COOKIE, Flash, FlashLevel};

/// 表单请求体上限（价格表单有 48 个字段）；multipart 的文本字段共用此上限
pub const FORM_LIMIT: usize = 64 * 1024;

/// 注册全部页面路由
///
/// 上传文件以 `/static/{public_prefix}/{filename}` 提供。
pub fn page_routes(cfg: &mut web::ServiceConfig, upload_prefix: &str) {
    cfg.route("/", web::get().to(dashboard::dashboard_page))
        // 客户与活动
        .route("/clients", web::get().to(clients::clients_page))
        .route("/client/new", web::get().to(clients::new_client_page))
        .route("/client/new", web::post().to(clients::create_client))
        .route("/campaigns", web::get().to(clients::campaigns_page))
        .route("/campaign/new", web::get().to(clients::new_campaign_page))
        .route("/campaign/new", web::post().to(clients::create_campaign))
        .route("/kampanijos", web::get().to(clients::kampanijos_page))
        // 供应商、屏幕与价格
        .route("/providers", web::get().to(screens::providers_page))
        .route("/provider/new", web::get().to(screens::new_provider_page))
        .route("/provider/new", web::post().to(screens::create_provider))
        .route("/provider/{id}", web::get().to(screens::provider_detail_page))
        .route("/screens", web::get().to(screens::screens_page))
        .route("/screen/new", web::get().to(screens::new_screen_page))
        .route("/screen/new", web::post().to(screens::create_screen))
        .route("/screen/{id}", web::get().to(screens::screen_detail_page))
        .route("/screen/{id}/pricing", web::get().to(screens::pricing_page))
        .route("/screen/{id}/pricing", web::post().to(screens::update_pricing))
        // DOOH 计划
        .route("/dooh-plans", web::get().to(plans::plans_page))
        .route("/dooh-plan/new", web::get().to(plans::new_plan_page))
        .route("/dooh-plan/new", web::post().to(plans::create_plan))
        .route("/dooh-plan/{id}", web::get().to(plans::plan_detail_page))
        .route("/dooh-plan/{id}/screens", web::get().to(plans::plan_screens_page))
        .route(
            "/dooh-plan/{plan_id}/add-screen/{screen_id}",
            web::post().to(plans::add_screen),
        )
        .route("/dooh-plan/{id}/media-plan", web::get().to(plans::media_plan_page))
        .route(
            &format!(
                "/static/{}/{{filename}}",
                upload_prefix.trim_matches('/')
            ),
            web::get().to(screens::serve_upload),
        );
}
