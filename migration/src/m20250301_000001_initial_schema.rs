//! 初始表结构
//!
//! 客户 → 广告活动 → DOOH 计划 → 屏幕预订 → 时段，
//! 以及屏幕供应商 → 屏幕 → 每小时价格。所有外键均为级联删除。

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建 client 表
        manager
            .create_table(
                Table::create()
                    .table(Client::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Client::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Client::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Client::Email).string_len(100).not_null().default(""))
                    .col(ColumnDef::new(Client::Phone).string_len(20).not_null().default(""))
                    .col(
                        ColumnDef::new(Client::ContactPerson)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Client::Company).string_len(100).not_null().default(""))
                    .col(
                        ColumnDef::new(Client::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 campaign 表
        manager
            .create_table(
                Table::create()
                    .table(Campaign::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Campaign::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Campaign::ClientId).integer().not_null())
                    .col(ColumnDef::new(Campaign::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Campaign::Description).text().null())
                    .col(ColumnDef::new(Campaign::StartDate).date().null())
                    .col(ColumnDef::new(Campaign::EndDate).date().null())
                    .col(ColumnDef::new(Campaign::Budget).double().null())
                    .col(
                        ColumnDef::new(Campaign::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_campaign_client")
                            .from(Campaign::Table, Campaign::ClientId)
                            .to(Client::Table, Client::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 dooh_plan 表
        manager
            .create_table(
                Table::create()
                    .table(DoohPlan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DoohPlan::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DoohPlan::CampaignId).integer().not_null())
                    .col(ColumnDef::new(DoohPlan::Name).string_len(100).not_null())
                    .col(ColumnDef::new(DoohPlan::StartDate).date().not_null())
                    .col(ColumnDef::new(DoohPlan::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(DoohPlan::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dooh_plan_campaign")
                            .from(DoohPlan::Table, DoohPlan::CampaignId)
                            .to(Campaign::Table, Campaign::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 screen_provider 表
        manager
            .create_table(
                Table::create()
                    .table(ScreenProvider::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScreenProvider::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScreenProvider::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(ScreenProvider::Email)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScreenProvider::Phone)
                            .string_len(20)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScreenProvider::ContactPerson)
                            .string_len(100)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(ScreenProvider::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 screen 表
        manager
            .create_table(
                Table::create()
                    .table(Screen::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Screen::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Screen::ProviderId).integer().not_null())
                    .col(ColumnDef::new(Screen::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Screen::ImagePath).string_len(200).null())
                    .col(ColumnDef::new(Screen::PositionDescription).text().null())
                    .col(ColumnDef::new(Screen::Comment).text().null())
                    .col(ColumnDef::new(Screen::ScreenType).string_len(50).not_null())
                    .col(ColumnDef::new(Screen::ContentType).string_len(50).not_null())
                    .col(ColumnDef::new(Screen::Width).double().not_null())
                    .col(ColumnDef::new(Screen::Height).double().not_null())
                    .col(ColumnDef::new(Screen::PixelWidth).integer().null())
                    .col(ColumnDef::new(Screen::PixelHeight).integer().null())
                    .col(ColumnDef::new(Screen::PixelComment).text().null())
                    .col(ColumnDef::new(Screen::GpsLatitude).double().null())
                    .col(ColumnDef::new(Screen::GpsLongitude).double().null())
                    .col(ColumnDef::new(Screen::City).string_len(100).not_null())
                    .col(ColumnDef::new(Screen::Address).string_len(200).not_null())
                    .col(ColumnDef::new(Screen::Side).string_len(10).null())
                    .col(
                        ColumnDef::new(Screen::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screen_provider")
                            .from(Screen::Table, Screen::ProviderId)
                            .to(ScreenProvider::Table, ScreenProvider::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 screen_pricing 表，(screen_id, hour) 唯一
        manager
            .create_table(
                Table::create()
                    .table(ScreenPricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScreenPricing::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScreenPricing::ScreenId).integer().not_null())
                    .col(ColumnDef::new(ScreenPricing::Hour).integer().not_null())
                    .col(
                        ColumnDef::new(ScreenPricing::PricePerThousandContacts)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ScreenPricing::ContactCount).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screen_pricing_screen")
                            .from(ScreenPricing::Table, ScreenPricing::ScreenId)
                            .to(Screen::Table, Screen::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_screen_pricing_screen_hour")
                    .table(ScreenPricing::Table)
                    .col(ScreenPricing::ScreenId)
                    .col(ScreenPricing::Hour)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 创建 screen_booking 表
        manager
            .create_table(
                Table::create()
                    .table(ScreenBooking::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScreenBooking::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScreenBooking::DoohPlanId).integer().not_null())
                    .col(ColumnDef::new(ScreenBooking::ScreenId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screen_booking_plan")
                            .from(ScreenBooking::Table, ScreenBooking::DoohPlanId)
                            .to(DoohPlan::Table, DoohPlan::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screen_booking_screen")
                            .from(ScreenBooking::Table, ScreenBooking::ScreenId)
                            .to(Screen::Table, Screen::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建 screen_slot 表
        manager
            .create_table(
                Table::create()
                    .table(ScreenSlot::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScreenSlot::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScreenSlot::BookingId).integer().not_null())
                    .col(ColumnDef::new(ScreenSlot::Date).date().not_null())
                    .col(ColumnDef::new(ScreenSlot::Hour).integer().not_null())
                    .col(
                        ColumnDef::new(ScreenSlot::SlotsPurchased)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_screen_slot_booking")
                            .from(ScreenSlot::Table, ScreenSlot::BookingId)
                            .to(ScreenBooking::Table, ScreenBooking::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 外键列索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_campaign_client_id")
                    .table(Campaign::Table)
                    .col(Campaign::ClientId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_dooh_plan_campaign_id")
                    .table(DoohPlan::Table)
                    .col(DoohPlan::CampaignId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_screen_provider_id")
                    .table(Screen::Table)
                    .col(Screen::ProviderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_screen_slot_booking_id")
                    .table(ScreenSlot::Table)
                    .col(ScreenSlot::BookingId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按依赖逆序删除
        manager
            .drop_table(Table::drop().table(ScreenSlot::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScreenBooking::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScreenPricing::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Screen::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ScreenProvider::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DoohPlan::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Campaign::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Client::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Client {
    #[sea_orm(iden = "client")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    ContactPerson,
    Company,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Campaign {
    #[sea_orm(iden = "campaign")]
    Table,
    Id,
    ClientId,
    Name,
    Description,
    StartDate,
    EndDate,
    Budget,
    CreatedAt,
}

#[derive(DeriveIden)]
enum DoohPlan {
    #[sea_orm(iden = "dooh_plan")]
    Table,
    Id,
    CampaignId,
    Name,
    StartDate,
    EndDate,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ScreenProvider {
    #[sea_orm(iden = "screen_provider")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    ContactPerson,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Screen {
    #[sea_orm(iden = "screen")]
    Table,
    Id,
    ProviderId,
    Name,
    ImagePath,
    PositionDescription,
    Comment,
    ScreenType,
    ContentType,
    Width,
    Height,
    PixelWidth,
    PixelHeight,
    PixelComment,
    GpsLatitude,
    GpsLongitude,
    City,
    Address,
    Side,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ScreenPricing {
    #[sea_orm(iden = "screen_pricing")]
    Table,
    Id,
    ScreenId,
    Hour,
    PricePerThousandContacts,
    ContactCount,
}

#[derive(DeriveIden)]
enum ScreenBooking {
    #[sea_orm(iden = "screen_booking")]
    Table,
    Id,
    DoohPlanId,
    ScreenId,
}

#[derive(DeriveIden)]
enum ScreenSlot {
    #[sea_orm(iden = "screen_slot")]
    Table,
    Id,
    BookingId,
    Date,
    Hour,
    SlotsPurchased,
}
