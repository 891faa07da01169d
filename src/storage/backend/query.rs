//! Query operations for SeaOrmStorage
//!
//! This module contains all read-only database operations.

use std::collections::{HashMap, HashSet};

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use super::SeaOrmStorage;
use crate::errors::{CrmError, Result};
use crate::storage::models::{
    BookingView, CampaignWithClient, PlanDetail, PlanScreenOption, PlanSummary, ProviderDetail,
    ScreenDetail, SlotView,
};
use migration::entities::{
    campaign, client, dooh_plan, kampanija, screen, screen_booking, screen_pricing,
    screen_provider, screen_slot,
};

fn query_err(what: &str, e: sea_orm::DbErr) -> CrmError {
    CrmError::database_operation(format!("Failed to query {}: {}", what, e))
}

impl SeaOrmStorage {
    // ============ Clients / Campaigns / Kampanijos ============

    pub async fn list_clients(&self) -> Result<Vec<client::Model>> {
        client::Entity::find()
            .order_by_asc(client::Column::Name)
            .order_by_asc(client::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("clients", e))
    }

    pub async fn find_client(&self, id: i32) -> Result<Option<client::Model>> {
        client::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| query_err("clients", e))
    }

    /// 活动列表，可按客户过滤
    pub async fn list_campaigns(&self, client_id: Option<i32>) -> Result<Vec<CampaignWithClient>> {
        let mut query = campaign::Entity::find().find_also_related(client::Entity);
        if let Some(client_id) = client_id {
            query = query.filter(campaign::Column::ClientId.eq(client_id));
        }

        let rows = query
            .order_by_asc(campaign::Column::Name)
            .order_by_asc(campaign::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("campaigns", e))?;

        Ok(rows
            .into_iter()
            .map(|(campaign, client)| CampaignWithClient { campaign, client })
            .collect())
    }

    pub async fn campaigns_for_client(&self, client_id: i32) -> Result<Vec<campaign::Model>> {
        campaign::Entity::find()
            .filter(campaign::Column::ClientId.eq(client_id))
            .order_by_asc(campaign::Column::Name)
            .order_by_asc(campaign::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("campaigns", e))
    }

    pub async fn find_campaign(&self, id: i32) -> Result<Option<campaign::Model>> {
        campaign::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| query_err("campaigns", e))
    }

    pub async fn list_kampanijos(&self) -> Result<Vec<kampanija::Model>> {
        kampanija::Entity::find()
            .order_by_asc(kampanija::Column::Name)
            .order_by_asc(kampanija::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("kampanija", e))
    }

    // ============ Providers / Screens ============

    pub async fn list_providers(&self) -> Result<Vec<screen_provider::Model>> {
        screen_provider::Entity::find()
            .order_by_asc(screen_provider::Column::Name)
            .order_by_asc(screen_provider::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("screen providers", e))
    }

    pub async fn find_provider(&self, id: i32) -> Result<Option<screen_provider::Model>> {
        screen_provider::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| query_err("screen providers", e))
    }

    pub async fn provider_detail(&self, id: i32) -> Result<Option<ProviderDetail>> {
        let Some(provider) = self.find_provider(id).await? else {
            return Ok(None);
        };

        let screens = screen::Entity::find()
            .filter(screen::Column::ProviderId.eq(id))
            .order_by_asc(screen::Column::Name)
            .order_by_asc(screen::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("screens", e))?;

        Ok(Some(ProviderDetail { provider, screens }))
    }

    /// 所有屏幕及其供应商
    pub async fn list_screens(&self) -> Result<Vec<(screen::Model, Option<screen_provider::Model>)>> {
        screen::Entity::find()
            .find_also_related(screen_provider::Entity)
            .order_by_asc(screen::Column::City)
            .order_by_asc(screen::Column::Name)
            .order_by_asc(screen::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("screens", e))
    }

    pub async fn find_screen(&self, id: i32) -> Result<Option<screen::Model>> {
        screen::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| query_err("screens", e))
    }

    pub async fn pricing_for_screen(&self, screen_id: i32) -> Result<Vec<screen_pricing::Model>> {
        screen_pricing::Entity::find()
            .filter(screen_pricing::Column::ScreenId.eq(screen_id))
            .order_by_asc(screen_pricing::Column::Hour)
            .all(&self.db)
            .await
            .map_err(|e| query_err("pricing", e))
    }

    pub async fn screen_detail(&self, id: i32) -> Result<Option<ScreenDetail>> {
        let Some(screen) = self.find_screen(id).await? else {
            return Ok(None);
        };
        let provider = self.find_provider(screen.provider_id).await?;
        let pricing = self.pricing_for_screen(id).await?;

        Ok(Some(ScreenDetail {
            screen,
            provider,
            pricing,
        }))
    }

    // ============ DOOH plans ============

    pub async fn find_plan(&self, id: i32) -> Result<Option<dooh_plan::Model>> {
        dooh_plan::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| query_err("DOOH plans", e))
    }

    pub async fn list_plans(&self) -> Result<Vec<PlanSummary>> {
        let plans = dooh_plan::Entity::find()
            .find_also_related(campaign::Entity)
            .order_by_desc(dooh_plan::Column::StartDate)
            .order_by_asc(dooh_plan::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("DOOH plans", e))?;

        let clients: HashMap<i32, client::Model> = self
            .list_clients()
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        let mut booking_counts: HashMap<i32, usize> = HashMap::new();
        for booking in screen_booking::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| query_err("screen bookings", e))?
        {
            *booking_counts.entry(booking.dooh_plan_id).or_default() += 1;
        }

        Ok(plans
            .into_iter()
            .map(|(plan, campaign)| {
                let client = campaign
                    .as_ref()
                    .and_then(|c| clients.get(&c.client_id).cloned());
                let booking_count = booking_counts.get(&plan.id).copied().unwrap_or(0);
                PlanSummary {
                    plan,
                    campaign,
                    client,
                    booking_count,
                }
            })
            .collect())
    }

    /// 计划详情：活动、客户、预订的屏幕及其时段
    ///
    /// 时段按日期、小时排序，并附带该屏幕同一小时的价格行。
    pub async fn plan_detail(&self, id: i32) -> Result<Option<PlanDetail>> {
        let Some(plan) = self.find_plan(id).await? else {
            return Ok(None);
        };

        let campaign = self.find_campaign(plan.campaign_id).await?;
        let client = match &campaign {
            Some(c) => self.find_client(c.client_id).await?,
            None => None,
        };

        let bookings = screen_booking::Entity::find()
            .filter(screen_booking::Column::DoohPlanId.eq(id))
            .find_also_related(screen::Entity)
            .order_by_asc(screen_booking::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| query_err("screen bookings", e))?;

        let booking_ids: Vec<i32> = bookings.iter().map(|(b, _)| b.id).collect();
        let screen_ids: Vec<i32> = bookings.iter().map(|(b, _)| b.screen_id).collect();

        let slots = if booking_ids.is_empty() {
            Vec::new()
        } else {
            screen_slot::Entity::find()
                .filter(screen_slot::Column::BookingId.is_in(booking_ids))
                .order_by_asc(screen_slot::Column::Date)
                .order_by_asc(screen_slot::Column::Hour)
                .order_by_asc(screen_slot::Column::Id)
                .all(&self.db)
                .await
                .map_err(|e| query_err("time slots", e))?
        };

        let pricing: HashMap<(i32, i32), screen_pricing::Model> = if screen_ids.is_empty() {
            HashMap::new()
        } else {
            screen_pricing::Entity::find()
                .filter(screen_pricing::Column::ScreenId.is_in(screen_ids))
                .all(&self.db)
                .await
                .map_err(|e| query_err("pricing", e))?
                .into_iter()
                .map(|p| ((p.screen_id, p.hour), p))
                .collect()
        };

        let mut slots_by_booking: HashMap<i32, Vec<screen_slot::Model>> = HashMap::new();
        for slot in slots {
            slots_by_booking.entry(slot.booking_id).or_default().push(slot);
        }

        let bookings = bookings
            .into_iter()
            .filter_map(|(booking, screen)| {
                // 外键级联保证屏幕存在
                let screen = screen?;
                let slots = slots_by_booking
                    .remove(&booking.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|slot| SlotView {
                        pricing: pricing.get(&(screen.id, slot.hour)).cloned(),
                        slot,
                    })
                    .collect();
                Some(BookingView {
                    booking,
                    screen,
                    slots,
                })
            })
            .collect();

        Ok(Some(PlanDetail {
            plan,
            campaign,
            client,
            bookings,
        }))
    }

    /// 可加入计划的屏幕（全部屏幕，标记已加入的）
    pub async fn plan_screen_options(
        &self,
        plan_id: i32,
    ) -> Result<Option<(dooh_plan::Model, Vec<PlanScreenOption>)>> {
        let Some(plan) = self.find_plan(plan_id).await? else {
            return Ok(None);
        };

        let booked: HashSet<i32> = screen_booking::Entity::find()
            .filter(screen_booking::Column::DoohPlanId.eq(plan_id))
            .all(&self.db)
            .await
            .map_err(|e| query_err("screen bookings", e))?
            .into_iter()
            .map(|b| b.screen_id)
            .collect();

        let options = self
            .list_screens()
            .await?
            .into_iter()
            .map(|(screen, _)| PlanScreenOption {
                already_added: booked.contains(&screen.id),
                screen,
            })
            .collect();

        Ok(Some((plan, options)))
    }
}
