//! Physical advertising screen

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "screen")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub provider_id: i32,

    // 基本信息
    pub name: String,
    /// Relative to the static root, e.g. `uploads/20250101_120000_front.jpg`
    pub image_path: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub position_description: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub comment: Option<String>,

    // 屏幕类型与参数
    /// horizontal / vertical
    pub screen_type: String,
    /// video / static
    pub content_type: String,
    /// Meters
    #[sea_orm(column_type = "Double")]
    pub width: f64,
    /// Meters
    #[sea_orm(column_type = "Double")]
    pub height: f64,
    pub pixel_width: Option<i32>,
    pub pixel_height: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub pixel_comment: Option<String>,

    // 位置
    #[sea_orm(column_type = "Double", nullable)]
    pub gps_latitude: Option<f64>,
    #[sea_orm(column_type = "Double", nullable)]
    pub gps_longitude: Option<f64>,
    pub city: String,
    pub address: String,
    /// D (right) / K (left)
    pub side: Option<String>,

    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::screen_provider::Entity",
        from = "Column::ProviderId",
        to = "super::screen_provider::Column::Id",
        on_delete = "Cascade"
    )]
    ScreenProvider,
    #[sea_orm(has_many = "super::screen_pricing::Entity")]
    ScreenPricing,
    #[sea_orm(has_many = "super::screen_booking::Entity")]
    ScreenBooking,
}

impl Related<super::screen_provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScreenProvider.def()
    }
}

impl Related<super::screen_pricing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScreenPricing.def()
    }
}

impl Related<super::screen_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScreenBooking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
