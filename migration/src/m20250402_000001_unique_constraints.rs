//! 唯一约束迁移
//!
//! 把原先依赖"先查询再插入"的去重检查下沉到数据库：
//! - screen_booking (dooh_plan_id, screen_id)
//! - campaign (client_id, name)
//! - client (name, company)
//! - kampanija (source_system, external_id)

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const INDEXES: [&str; 4] = [
    "uq_screen_booking_plan_screen",
    "uq_campaign_client_name",
    "uq_client_name_company",
    "uq_kampanija_source_external_id",
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[0])
                    .table(ScreenBooking::Table)
                    .col(ScreenBooking::DoohPlanId)
                    .col(ScreenBooking::ScreenId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[1])
                    .table(Campaign::Table)
                    .col(Campaign::ClientId)
                    .col(Campaign::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[2])
                    .table(Client::Table)
                    .col(Client::Name)
                    .col(Client::Company)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // external_id 为 NULL 的记录不参与唯一性比较
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name(INDEXES[3])
                    .table(Kampanija::Table)
                    .col(Kampanija::SourceSystem)
                    .col(Kampanija::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name(INDEXES[3]).table(Kampanija::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[2]).table(Client::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name(INDEXES[1]).table(Campaign::Table).to_owned())
            .await?;
        manager
            .drop_index(
                Index::drop()
                    .name(INDEXES[0])
                    .table(ScreenBooking::Table)
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum ScreenBooking {
    #[sea_orm(iden = "screen_booking")]
    Table,
    DoohPlanId,
    ScreenId,
}

#[derive(DeriveIden)]
enum Campaign {
    #[sea_orm(iden = "campaign")]
    Table,
    ClientId,
    Name,
}

#[derive(DeriveIden)]
enum Client {
    #[sea_orm(iden = "client")]
    Table,
    Name,
    Company,
}

#[derive(DeriveIden)]
enum Kampanija {
    #[sea_orm(iden = "kampanija")]
    Table,
    SourceSystem,
    ExternalId,
}
