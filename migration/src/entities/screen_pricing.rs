//! Per-hour rate card entry, unique per (screen_id, hour)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "screen_pricing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub screen_id: i32,
    /// 0-23
    pub hour: i32,
    #[sea_orm(column_type = "Double")]
    pub price_per_thousand_contacts: f64,
    pub contact_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::screen::Entity",
        from = "Column::ScreenId",
        to = "super::screen::Column::Id",
        on_delete = "Cascade"
    )]
    Screen,
}

impl Related<super::screen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Screen.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
