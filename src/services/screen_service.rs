//! Screen provider and screen service

use std::sync::Arc;

use tracing::{info, warn};

use super::forms::ScreenForm;
use crate::config::UploadConfig;
use crate::errors::{CrmError, Result};
use crate::storage::backend::mutations;
use crate::storage::{NewProvider, ProviderDetail, ScreenDetail, SeaOrmStorage};
use crate::utils::{parse_gps, remove_image, save_image};
use migration::entities::{screen, screen_provider};

/// multipart 中上传的图片
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

impl UploadedImage {
    /// 浏览器在未选择文件时也会提交一个空的文件字段
    pub fn is_empty(&self) -> bool {
        self.filename.trim().is_empty() || self.data.is_empty()
    }
}

/// 屏幕创建结果
#[derive(Debug, Clone)]
pub struct ScreenCreated {
    pub screen: screen::Model,
    /// 不影响创建的提示（例如 GPS 无法解析）
    pub warnings: Vec<String>,
}

pub struct ScreenService {
    storage: Arc<SeaOrmStorage>,
    uploads: UploadConfig,
}

impl ScreenService {
    pub fn new(storage: Arc<SeaOrmStorage>, uploads: UploadConfig) -> Self {
        Self { storage, uploads }
    }

    pub fn uploads(&self) -> &UploadConfig {
        &self.uploads
    }

    // ============ Providers ============

    pub async fn create_provider(&self, input: NewProvider) -> Result<screen_provider::Model> {
        mutations::insert_provider(self.storage.get_db(), &input).await
    }

    pub async fn list_providers(&self) -> Result<Vec<screen_provider::Model>> {
        self.storage.list_providers().await
    }

    pub async fn provider_detail(&self, id: i32) -> Result<ProviderDetail> {
        self.storage
            .provider_detail(id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("Screen provider {} not found", id)))
    }

    // ============ Screens ============

    /// 创建屏幕
    ///
    /// 表单已通过校验；GPS 文本无法解析时不写坐标并返回警告。
    /// 图片在插入前保存，插入失败时删除已保存的文件。
    pub async fn create_screen(
        &self,
        form: ScreenForm,
        image: Option<UploadedImage>,
    ) -> Result<ScreenCreated> {
        let ScreenForm {
            screen: mut input,
            gps_text,
        } = form;

        if self.storage.find_provider(input.provider_id).await?.is_none() {
            return Err(CrmError::not_found(format!(
                "Screen provider {} not found",
                input.provider_id
            )));
        }

        let mut warnings = Vec::new();
        match parse_gps(&gps_text) {
            Ok(gps) => input.gps = gps,
            Err(e) => {
                warn!(
                    "Ignoring GPS coordinates '{}' for screen '{}': {}",
                    gps_text, input.name, e
                );
                warnings.push(format!(
                    "GPS coordinates \"{}\" were not recognised ({}); the screen was saved without coordinates.",
                    gps_text, e
                ));
            }
        }

        let image = image.filter(|img| !img.is_empty());
        if let Some(img) = &image
            && img.data.len() > self.uploads.max_file_size
        {
            return Err(CrmError::validation(
                "image",
                format!(
                    "file is larger than {} bytes",
                    self.uploads.max_file_size
                ),
            ));
        }

        let stored = match &image {
            Some(img) => Some(save_image(&self.uploads, &img.filename, &img.data).await?),
            None => None,
        };
        input.image_path = stored.as_ref().map(|s| s.relative_path.clone());

        match mutations::insert_screen(self.storage.get_db(), &input).await {
            Ok(screen) => {
                info!(
                    "Screen '{}' created (id={}, image={})",
                    screen.name,
                    screen.id,
                    screen.image_path.as_deref().unwrap_or("-")
                );
                Ok(ScreenCreated { screen, warnings })
            }
            Err(e) => {
                if let Some(stored) = &stored {
                    remove_image(&stored.full_path).await;
                }
                Err(e)
            }
        }
    }

    pub async fn list_screens(
        &self,
    ) -> Result<Vec<(screen::Model, Option<screen_provider::Model>)>> {
        self.storage.list_screens().await
    }

    pub async fn screen_detail(&self, id: i32) -> Result<ScreenDetail> {
        self.storage
            .screen_detail(id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("Screen {} not found", id)))
    }
}
