use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "screen_slot")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub booking_id: i32,
    pub date: Date,
    /// 0-23
    pub hour: i32,
    /// Number of ad slots purchased for this hour
    pub slots_purchased: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::screen_booking::Entity",
        from = "Column::BookingId",
        to = "super::screen_booking::Column::Id",
        on_delete = "Cascade"
    )]
    ScreenBooking,
}

impl Related<super::screen_booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ScreenBooking.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
