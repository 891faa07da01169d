//! Write operations
//!
//! Every function takes a generic connection so the service layer can run
//! several of them inside one `DatabaseTransaction` and commit once.
//! Check-then-act sites rely on the unique indexes: either the insert is
//! `ON CONFLICT DO NOTHING` followed by a lookup, or a unique violation is
//! mapped to a typed error.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    QueryFilter, SqlErr, sea_query::OnConflict,
};
use tracing::{debug, info};

use crate::errors::{CrmError, Result};
use crate::storage::models::{
    BrandRecord, KampanijaRecord, NewCampaign, NewClient, NewPlan, NewProvider, NewScreen,
    PricingEntry,
};
use migration::entities::{
    campaign, client, dooh_plan, kampanija, screen, screen_booking, screen_pricing,
    screen_provider,
};

/// 写入错误映射：唯一约束 → Conflict，外键 → NotFound
fn map_write_err(err: DbErr, what: &str) -> CrmError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            CrmError::conflict(format!("{} already exists", what))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => {
            CrmError::not_found(format!("{} references a record that does not exist", what))
        }
        _ => CrmError::database_operation(format!("Failed to write {}: {}", what, err)),
    }
}

// ============ Client / Campaign ============

fn client_active_model(input: &NewClient) -> client::ActiveModel {
    client::ActiveModel {
        name: Set(input.name.clone()),
        email: Set(input.email.clone()),
        phone: Set(input.phone.clone()),
        contact_person: Set(input.contact_person.clone()),
        company: Set(input.company.clone()),
        external_id: Set(input.external_id.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

/// 插入客户，(name, company) 已存在时复用已有行
///
/// 返回 `(client, created)`。
pub async fn insert_or_get_client<C: ConnectionTrait>(
    conn: &C,
    input: &NewClient,
) -> Result<(client::Model, bool)> {
    let inserted = client::Entity::insert(client_active_model(input))
        .on_conflict(
            OnConflict::columns([client::Column::Name, client::Column::Company])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| map_write_err(e, &format!("Client '{}'", input.name)))?;

    let model = client::Entity::find()
        .filter(client::Column::Name.eq(input.name.as_str()))
        .filter(client::Column::Company.eq(input.company.as_str()))
        .one(conn)
        .await?
        .ok_or_else(|| {
            CrmError::database_operation(format!("Client '{}' could not be read back after insert", input.name))
        })?;

    if inserted > 0 {
        info!("Client created: {} (id={})", model.name, model.id);
    } else {
        debug!("Reusing existing client {} (id={})", model.name, model.id);
    }
    Ok((model, inserted > 0))
}

fn campaign_active_model(client_id: i32, input: &NewCampaign) -> campaign::ActiveModel {
    campaign::ActiveModel {
        client_id: Set(client_id),
        name: Set(input.name.clone()),
        description: Set(input.description.clone()),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        budget: Set(input.budget),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

/// 插入活动，同一客户下同名活动已存在时复用
pub async fn insert_or_get_campaign<C: ConnectionTrait>(
    conn: &C,
    client_id: i32,
    input: &NewCampaign,
) -> Result<(campaign::Model, bool)> {
    let inserted = campaign::Entity::insert(campaign_active_model(client_id, input))
        .on_conflict(
            OnConflict::columns([campaign::Column::ClientId, campaign::Column::Name])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(conn)
        .await
        .map_err(|e| map_write_err(e, &format!("Campaign '{}'", input.name)))?;

    let model = campaign::Entity::find()
        .filter(campaign::Column::ClientId.eq(client_id))
        .filter(campaign::Column::Name.eq(input.name.as_str()))
        .one(conn)
        .await?
        .ok_or_else(|| {
            CrmError::database_operation(format!("Campaign '{}' could not be read back after insert", input.name))
        })?;

    if inserted > 0 {
        info!(
            "Campaign created: {} (id={}, client_id={})",
            model.name, model.id, client_id
        );
    } else {
        debug!("Reusing existing campaign {} (id={})", model.name, model.id);
    }
    Ok((model, inserted > 0))
}

// ============ Provider / Screen / Pricing ============

pub async fn insert_provider<C: ConnectionTrait>(
    conn: &C,
    input: &NewProvider,
) -> Result<screen_provider::Model> {
    let model = screen_provider::ActiveModel {
        name: Set(input.name.clone()),
        email: Set(input.email.clone()),
        phone: Set(input.phone.clone()),
        contact_person: Set(input.contact_person.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| map_write_err(e, &format!("Provider '{}'", input.name)))?;

    info!("Screen provider created: {} (id={})", model.name, model.id);
    Ok(model)
}

pub async fn insert_screen<C: ConnectionTrait>(conn: &C, input: &NewScreen) -> Result<screen::Model> {
    let model = screen::ActiveModel {
        provider_id: Set(input.provider_id),
        name: Set(input.name.clone()),
        image_path: Set(input.image_path.clone()),
        position_description: Set(input.position_description.clone()),
        comment: Set(input.comment.clone()),
        screen_type: Set(input.screen_type.to_string()),
        content_type: Set(input.content_type.to_string()),
        width: Set(input.width),
        height: Set(input.height),
        pixel_width: Set(input.pixel_width),
        pixel_height: Set(input.pixel_height),
        pixel_comment: Set(input.pixel_comment.clone()),
        gps_latitude: Set(input.gps.map(|g| g.latitude)),
        gps_longitude: Set(input.gps.map(|g| g.longitude)),
        city: Set(input.city.clone()),
        address: Set(input.address.clone()),
        side: Set(input.side.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| map_write_err(e, &format!("Screen '{}'", input.name)))?;

    info!(
        "Screen created: {} (id={}, provider_id={})",
        model.name, model.id, model.provider_id
    );
    Ok(model)
}

/// 用新的价格行整体替换某屏幕的价格表
///
/// 调用方负责事务；删除与插入必须在同一事务内。
pub async fn replace_pricing<C: ConnectionTrait>(
    conn: &C,
    screen_id: i32,
    entries: &[PricingEntry],
) -> Result<usize> {
    let deleted = screen_pricing::Entity::delete_many()
        .filter(screen_pricing::Column::ScreenId.eq(screen_id))
        .exec(conn)
        .await
        .map_err(|e| CrmError::database_operation(format!("Failed to delete pricing: {}", e)))?;

    for entry in entries {
        screen_pricing::ActiveModel {
            screen_id: Set(screen_id),
            hour: Set(entry.hour),
            price_per_thousand_contacts: Set(entry.price_per_thousand_contacts),
            contact_count: Set(entry.contact_count),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(|e| {
            map_write_err(e, &format!("Pricing for screen {} hour {}", screen_id, entry.hour))
        })?;
    }

    debug!(
        "Pricing replaced for screen {}: {} removed, {} inserted",
        screen_id, deleted.rows_affected, entries.len()
    );
    Ok(entries.len())
}

// ============ DOOH plan / booking ============

pub async fn insert_plan<C: ConnectionTrait>(
    conn: &C,
    campaign_id: i32,
    input: &NewPlan,
) -> Result<dooh_plan::Model> {
    let model = dooh_plan::ActiveModel {
        campaign_id: Set(campaign_id),
        name: Set(input.name.clone()),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| map_write_err(e, &format!("DOOH plan '{}'", input.name)))?;

    info!(
        "DOOH plan created: {} (id={}, campaign_id={})",
        model.name, model.id, campaign_id
    );
    Ok(model)
}

/// 把屏幕加入计划
///
/// 已存在 (plan, screen) 预订时不做任何修改并返回 `false`。
pub async fn insert_booking<C: ConnectionTrait>(
    conn: &C,
    plan_id: i32,
    screen_id: i32,
) -> Result<bool> {
    let inserted = screen_booking::Entity::insert(screen_booking::ActiveModel {
        dooh_plan_id: Set(plan_id),
        screen_id: Set(screen_id),
        ..Default::default()
    })
    .on_conflict(
        OnConflict::columns([
            screen_booking::Column::DoohPlanId,
            screen_booking::Column::ScreenId,
        ])
        .do_nothing()
        .to_owned(),
    )
    .exec_without_returning(conn)
    .await
    .map_err(|e| map_write_err(e, &format!("Booking of screen {} in plan {}", screen_id, plan_id)))?;

    Ok(inserted > 0)
}

// ============ Imports ============

/// 空白视为缺失
fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// 按 (company, name) 插入或更新品牌客户，返回是否为新插入
///
/// 已存在时只覆盖请求中给出的联系字段和 external_id。
pub async fn upsert_brand<C: ConnectionTrait>(conn: &C, record: &BrandRecord) -> Result<bool> {
    let name = record.name.trim().to_string();
    let company = non_blank(record.company.as_deref()).unwrap_or_default();

    let existing = client::Entity::find()
        .filter(client::Column::Name.eq(name.as_str()))
        .filter(client::Column::Company.eq(company.as_str()))
        .one(conn)
        .await?;

    match existing {
        Some(model) => {
            let mut active: client::ActiveModel = model.into();
            if let Some(email) = non_blank(record.email.as_deref()) {
                active.email = Set(email);
            }
            if let Some(phone) = non_blank(record.phone.as_deref()) {
                active.phone = Set(phone);
            }
            if let Some(contact) = non_blank(record.contact_person.as_deref()) {
                active.contact_person = Set(contact);
            }
            if let Some(external_id) = non_blank(record.external_id.as_deref()) {
                active.external_id = Set(Some(external_id));
            }
            if active.is_changed() {
                active
                    .update(conn)
                    .await
                    .map_err(|e| map_write_err(e, &format!("Client '{}'", name)))?;
            }
            Ok(false)
        }
        None => {
            let input = NewClient {
                name,
                email: non_blank(record.email.as_deref()).unwrap_or_default(),
                phone: non_blank(record.phone.as_deref()).unwrap_or_default(),
                contact_person: non_blank(record.contact_person.as_deref()).unwrap_or_default(),
                company,
                external_id: non_blank(record.external_id.as_deref()),
            };
            client_active_model(&input)
                .insert(conn)
                .await
                .map_err(|e| map_write_err(e, &format!("Client '{}'", input.name)))?;
            Ok(true)
        }
    }
}

/// 按 (source_system, external_id) 插入或更新 kampanija，返回是否为新插入
///
/// 没有 external_id 的记录总是插入。
pub async fn upsert_kampanija<C: ConnectionTrait>(
    conn: &C,
    record: &KampanijaRecord,
) -> Result<bool> {
    let name = record.name.trim().to_string();
    let source_system = non_blank(record.source_system.as_deref()).unwrap_or_default();
    let external_id = non_blank(record.external_id.as_deref());
    let client_brand_name = non_blank(record.client_brand_name.as_deref());
    let campaign_name = non_blank(record.campaign_name.as_deref());
    let now = Utc::now();

    let existing = match external_id.as_deref() {
        Some(ext) => {
            kampanija::Entity::find()
                .filter(kampanija::Column::SourceSystem.eq(source_system.as_str()))
                .filter(kampanija::Column::ExternalId.eq(ext))
                .one(conn)
                .await?
        }
        None => None,
    };

    match existing {
        Some(model) => {
            let mut active: kampanija::ActiveModel = model.into();
            active.name = Set(name.clone());
            active.client_brand_name = Set(client_brand_name);
            active.campaign_name = Set(campaign_name);
            active.updated_at = Set(now);
            active
                .update(conn)
                .await
                .map_err(|e| map_write_err(e, &format!("Kampanija '{}'", name)))?;
            Ok(false)
        }
        None => {
            kampanija::ActiveModel {
                name: Set(name.clone()),
                client_brand_name: Set(client_brand_name),
                campaign_name: Set(campaign_name),
                external_id: Set(external_id),
                source_system: Set(source_system),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await
            .map_err(|e| map_write_err(e, &format!("Kampanija '{}'", name)))?;
            Ok(true)
        }
    }
}
