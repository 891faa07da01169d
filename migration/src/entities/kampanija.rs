//! Campaign record imported from a partner system
//!
//! Kept apart from [`super::campaign`]: a local campaign is derived from a
//! kampanija on demand when a DOOH plan is created from it.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "kampanija")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub client_brand_name: Option<String>,
    pub campaign_name: Option<String>,
    pub external_id: Option<String>,
    /// Empty string when the caller did not name its system
    pub source_system: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
