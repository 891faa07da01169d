//! DOOH plan service
//!
//! Plan creation resolves the client and campaign choices and inserts the
//! plan in one transaction: either every record commits or none does.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::{error, info};

use super::client_service::resolve_client;
use super::forms::{CampaignChoice, PlanForm};
use crate::errors::{CrmError, Result};
use crate::storage::backend::mutations;
use crate::storage::{NewCampaign, PlanDetail, PlanScreenOption, PlanSummary, SeaOrmStorage};
use migration::entities::{campaign, client, dooh_plan, kampanija, screen};

/// 把屏幕加入计划的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddScreenOutcome {
    Added,
    AlreadyAdded,
}

#[derive(Debug, Clone)]
pub struct PlanCreated {
    pub plan: dooh_plan::Model,
    pub campaign: campaign::Model,
    pub client: client::Model,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Kampanija 的显示名
///
/// 品牌名与活动名都存在时为 `"品牌 - 活动"`，否则用 name，
/// 都为空时回退到 `"Campaign {external_id}"`。
pub fn kampanija_display_name(k: &kampanija::Model) -> String {
    let brand = non_blank(k.client_brand_name.as_deref());
    let campaign = non_blank(k.campaign_name.as_deref());

    if let (Some(brand), Some(campaign)) = (brand, campaign) {
        return format!("{} - {}", brand, campaign);
    }

    let name = k.name.trim();
    if !name.is_empty() {
        return name.to_string();
    }

    match non_blank(k.external_id.as_deref()) {
        Some(ext) => format!("Campaign {}", ext),
        None => format!("Campaign {}", k.id),
    }
}

/// 由 kampanija 派生的活动描述
fn kampanija_description(k: &kampanija::Model) -> String {
    let source = non_blank(Some(k.source_system.as_str())).unwrap_or("external system");
    format!(
        "Imported from {}. Brand: {}. Campaign: {}.",
        source,
        non_blank(k.client_brand_name.as_deref()).unwrap_or("-"),
        non_blank(k.campaign_name.as_deref()).unwrap_or("-"),
    )
}

/// 在事务内解析活动选择
async fn resolve_campaign<C: ConnectionTrait>(
    conn: &C,
    client: &client::Model,
    choice: &CampaignChoice,
) -> Result<campaign::Model> {
    match choice {
        CampaignChoice::Existing(id) => {
            let campaign = campaign::Entity::find_by_id(*id)
                .one(conn)
                .await?
                .ok_or_else(|| CrmError::not_found(format!("Campaign {} not found", id)))?;
            if campaign.client_id != client.id {
                return Err(CrmError::validation(
                    "existing_campaign_id",
                    format!("campaign does not belong to client '{}'", client.name),
                ));
            }
            Ok(campaign)
        }
        CampaignChoice::New(input) => {
            let (campaign, _) = mutations::insert_or_get_campaign(conn, client.id, input).await?;
            Ok(campaign)
        }
        CampaignChoice::FromKampanija(id) => {
            let source = kampanija::Entity::find_by_id(*id)
                .one(conn)
                .await?
                .ok_or_else(|| CrmError::not_found(format!("Kampanija {} not found", id)))?;

            let input = NewCampaign {
                name: kampanija_display_name(&source),
                description: Some(kampanija_description(&source)),
                ..Default::default()
            };
            let (campaign, created) =
                mutations::insert_or_get_campaign(conn, client.id, &input).await?;
            if created {
                info!(
                    "Campaign '{}' derived from kampanija {}",
                    campaign.name, source.id
                );
            }
            Ok(campaign)
        }
    }
}

pub struct PlanService {
    storage: Arc<SeaOrmStorage>,
}

impl PlanService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 创建计划（包括内联的客户、活动）
    pub async fn create_plan(&self, form: PlanForm) -> Result<PlanCreated> {
        let txn = self.storage.begin().await?;

        let client = resolve_client(&txn, &form.client).await?;
        let campaign = resolve_campaign(&txn, &client, &form.campaign).await?;
        let plan = mutations::insert_plan(&txn, campaign.id, &form.plan).await?;

        txn.commit().await.map_err(|e| {
            error!("Failed to commit DOOH plan '{}': {}", form.plan.name, e);
            CrmError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "DOOH plan '{}' (id={}) saved under campaign '{}' / client '{}'",
            plan.name, plan.id, campaign.name, client.name
        );
        Ok(PlanCreated {
            plan,
            campaign,
            client,
        })
    }

    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        self.storage.list_plans().await
    }

    pub async fn plan_detail(&self, id: i32) -> Result<PlanDetail> {
        self.storage
            .plan_detail(id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("DOOH plan {} not found", id)))
    }

    /// 媒体计划：与详情相同的数据，按预订列出时段和对应小时的价格
    pub async fn media_plan(&self, id: i32) -> Result<PlanDetail> {
        self.plan_detail(id).await
    }

    pub async fn plan_screens(
        &self,
        plan_id: i32,
    ) -> Result<(dooh_plan::Model, Vec<PlanScreenOption>)> {
        self.storage
            .plan_screen_options(plan_id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("DOOH plan {} not found", plan_id)))
    }

    /// 把屏幕加入计划；已存在的预订保持不变
    pub async fn add_screen(&self, plan_id: i32, screen_id: i32) -> Result<AddScreenOutcome> {
        let txn = self.storage.begin().await?;

        if dooh_plan::Entity::find_by_id(plan_id).one(&txn).await?.is_none() {
            return Err(CrmError::not_found(format!("DOOH plan {} not found", plan_id)));
        }
        if screen::Entity::find_by_id(screen_id).one(&txn).await?.is_none() {
            return Err(CrmError::not_found(format!("Screen {} not found", screen_id)));
        }

        let inserted = mutations::insert_booking(&txn, plan_id, screen_id).await?;

        txn.commit().await.map_err(|e| {
            error!("Failed to commit booking {}/{}: {}", plan_id, screen_id, e);
            CrmError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        if inserted {
            info!("Screen {} added to DOOH plan {}", screen_id, plan_id);
            Ok(AddScreenOutcome::Added)
        } else {
            info!("Screen {} already in DOOH plan {}", screen_id, plan_id);
            Ok(AddScreenOutcome::AlreadyAdded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn kampanija(
        name: &str,
        brand: Option<&str>,
        campaign: Option<&str>,
        external_id: Option<&str>,
    ) -> kampanija::Model {
        kampanija::Model {
            id: 4,
            name: name.to_string(),
            client_brand_name: brand.map(str::to_string),
            campaign_name: campaign.map(str::to_string),
            external_id: external_id.map(str::to_string),
            source_system: "crm".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_name_prefers_brand_and_campaign() {
        let k = kampanija("ignored", Some("Acme"), Some("Spring"), Some("X1"));
        assert_eq!(kampanija_display_name(&k), "Acme - Spring");
    }

    #[test]
    fn test_display_name_falls_back_to_name() {
        let k = kampanija("  Summer Sale ", Some("Acme"), None, Some("X1"));
        assert_eq!(kampanija_display_name(&k), "Summer Sale");
    }

    #[test]
    fn test_display_name_falls_back_to_external_id() {
        assert_eq!(
            kampanija_display_name(&kampanija("", None, None, Some("X1"))),
            "Campaign X1"
        );
        assert_eq!(
            kampanija_display_name(&kampanija(" ", None, Some(" "), None)),
            "Campaign 4"
        );
    }

    #[test]
    fn test_description_mentions_source() {
        let k = kampanija("n", Some("Acme"), None, None);
        assert_eq!(
            kampanija_description(&k),
            "Imported from crm. Brand: Acme. Campaign: -."
        );
    }
}
