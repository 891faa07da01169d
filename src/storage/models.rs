//! Storage-level input types and read aggregates

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::utils::GpsCoordinates;
use migration::entities::{
    campaign, client, dooh_plan, screen, screen_booking, screen_pricing, screen_provider,
    screen_slot,
};

/// 屏幕方向
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ScreenType {
    Horizontal,
    Vertical,
}

/// 播放内容类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, AsRefStr, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContentType {
    Video,
    Static,
}

// ============ Inputs ============

/// 新客户；可选字段缺失时为空串
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub contact_person: String,
    pub company: String,
    pub external_id: Option<String>,
}

impl NewClient {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCampaign {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProvider {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub contact_person: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewScreen {
    pub provider_id: i32,
    pub name: String,
    pub image_path: Option<String>,
    pub position_description: Option<String>,
    pub comment: Option<String>,
    pub screen_type: ScreenType,
    pub content_type: ContentType,
    pub width: f64,
    pub height: f64,
    pub pixel_width: Option<i32>,
    pub pixel_height: Option<i32>,
    pub pixel_comment: Option<String>,
    pub gps: Option<GpsCoordinates>,
    pub city: String,
    pub address: String,
    pub side: Option<String>,
}

/// 某个小时的价格行
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingEntry {
    pub hour: i32,
    pub price_per_thousand_contacts: f64,
    pub contact_count: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPlan {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// 品牌导入记录（`POST /api/import-brands`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandRecord {
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_person: Option<String>,
    pub company: Option<String>,
    pub external_id: Option<String>,
}

/// Kampanija 导入记录（`POST /api/import-kampanijos`）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KampanijaRecord {
    #[serde(default)]
    pub name: String,
    pub client_brand_name: Option<String>,
    pub campaign_name: Option<String>,
    pub external_id: Option<String>,
    pub source_system: Option<String>,
}

/// 批量导入结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportCounts {
    pub imported_count: usize,
    pub updated_count: usize,
}

// ============ Read aggregates ============

#[derive(Debug, Clone)]
pub struct ProviderDetail {
    pub provider: screen_provider::Model,
    pub screens: Vec<screen::Model>,
}

#[derive(Debug, Clone)]
pub struct ScreenDetail {
    pub screen: screen::Model,
    pub provider: Option<screen_provider::Model>,
    /// 按小时排序
    pub pricing: Vec<screen_pricing::Model>,
}

#[derive(Debug, Clone)]
pub struct CampaignWithClient {
    pub campaign: campaign::Model,
    pub client: Option<client::Model>,
}

/// 计划列表行
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub plan: dooh_plan::Model,
    pub campaign: Option<campaign::Model>,
    pub client: Option<client::Model>,
    pub booking_count: usize,
}

#[derive(Debug, Clone)]
pub struct SlotView {
    pub slot: screen_slot::Model,
    /// 该屏幕同一小时的价格行
    pub pricing: Option<screen_pricing::Model>,
}

#[derive(Debug, Clone)]
pub struct BookingView {
    pub booking: screen_booking::Model,
    pub screen: screen::Model,
    /// 按日期、小时排序
    pub slots: Vec<SlotView>,
}

#[derive(Debug, Clone)]
pub struct PlanDetail {
    pub plan: dooh_plan::Model,
    pub campaign: Option<campaign::Model>,
    pub client: Option<client::Model>,
    pub bookings: Vec<BookingView>,
}

#[derive(Debug, Clone)]
pub struct PlanScreenOption {
    pub screen: screen::Model,
    pub already_added: bool,
}
