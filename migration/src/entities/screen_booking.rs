//! Association of one screen with one DOOH plan
//!
//! (dooh_plan_id, screen_id) is unique at the database level.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "screen_booking")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub dooh_plan_id: i32,
    pub screen_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dooh_plan::Entity",
        from = "Column::DoohPlanId",
        to = "super::dooh_plan::Column::Id",
        on_delete = "Cascade"
    )]
    DoohPlan,
    #[sea_orm(
        belongs_to = "super::screen::Entity",
        from = "Column::ScreenId",
        to = "super::screen::Column::Id",
        on_delete = "Cascade"
    )]
    Screen,
    #[sea_orm(has_many = "super::screen_slot::Entity")]
    ScreenSlot,
}

impl Related<super::dooh_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DoohPlan.def()
    }
}

impl Related<super::screen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Screen.def()
    }
}

impl Related<super::screen_slot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScreenSlot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
