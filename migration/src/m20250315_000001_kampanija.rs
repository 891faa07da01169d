//! 外部活动记录表迁移
//!
//! 创建 kampanija 表（来自合作系统的活动记录），
//! 并为 client 表增加 external_id 列用于品牌导入。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kampanija::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Kampanija::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Kampanija::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Kampanija::ClientBrandName).string_len(200).null())
                    .col(ColumnDef::new(Kampanija::CampaignName).string_len(200).null())
                    .col(ColumnDef::new(Kampanija::ExternalId).string_len(100).null())
                    .col(
                        ColumnDef::new(Kampanija::SourceSystem)
                            .string_len(50)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Kampanija::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Kampanija::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // SQLite 的 ALTER TABLE 每次只能添加一列
        manager
            .alter_table(
                Table::alter()
                    .table(Client::Table)
                    .add_column(ColumnDef::new(Client::ExternalId).string_len(100).null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Client::Table)
                    .drop_column(Client::ExternalId)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(Kampanija::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Kampanija {
    #[sea_orm(iden = "kampanija")]
    Table,
    Id,
    Name,
    ClientBrandName,
    CampaignName,
    ExternalId,
    SourceSystem,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Client {
    #[sea_orm(iden = "client")]
    Table,
    ExternalId,
}
