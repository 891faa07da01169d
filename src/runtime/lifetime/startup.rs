use crate::config::{ApiConfig, StaticConfig, UploadConfig, get_config};
use crate::services::{
    ClientService, ImportService, PlanService, PricingService, ScreenService,
};
use crate::storage::{SeaOrmStorage, StorageFactory};
use actix_web::web;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 服务器各 worker 共享的服务实例
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub client_service: Arc<ClientService>,
    pub screen_service: Arc<ScreenService>,
    pub pricing_service: Arc<PricingService>,
    pub plan_service: Arc<PlanService>,
    pub import_service: Arc<ImportService>,
    pub api: ApiConfig,
    pub uploads: UploadConfig,
}

impl StartupContext {
    /// 在已连接的存储上装配所有服务
    pub fn new(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Self {
        Self {
            client_service: Arc::new(ClientService::new(storage.clone())),
            screen_service: Arc::new(ScreenService::new(
                storage.clone(),
                config.uploads.clone(),
            )),
            pricing_service: Arc::new(PricingService::new(storage.clone())),
            plan_service: Arc::new(PlanService::new(storage.clone())),
            import_service: Arc::new(ImportService::new(storage.clone())),
            api: config.api.clone(),
            uploads: config.uploads.clone(),
            storage,
        }
    }

    /// 注入 handler 所需的 `web::Data` 并注册路由
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.storage.clone()))
            .app_data(web::Data::new(self.client_service.clone()))
            .app_data(web::Data::new(self.screen_service.clone()))
            .app_data(web::Data::new(self.pricing_service.clone()))
            .app_data(web::Data::new(self.plan_service.clone()))
            .app_data(web::Data::new(self.import_service.clone()))
            .app_data(web::Data::new(self.api.clone()));
        crate::api::services::configure_routes(cfg, &self.uploads.public_prefix);
    }
}

/// 准备服务器启动的上下文：连接数据库、运行迁移、创建上传目录
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", config.uploads.dir))?;
    debug!("Upload directory ready: {}", config.uploads.dir);

    if config.api.api_key.is_empty() {
        warn!("api.api_key is empty: authenticated /api endpoints will reject every request");
    }

    let context = StartupContext::new(storage, &config);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
