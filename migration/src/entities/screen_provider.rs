use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "screen_provider")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub contact_person: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::screen::Entity")]
    Screen,
}

impl Related<super::screen::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Screen.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
