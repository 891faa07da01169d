//! Per-hour screen pricing

use std::sync::Arc;

use sea_orm::EntityTrait;
use tracing::{error, info};

use super::forms::HOURS_PER_DAY;
use crate::errors::{CrmError, Result};
use crate::storage::backend::mutations;
use crate::storage::{PricingEntry, SeaOrmStorage};
use migration::entities::{screen, screen_pricing};

/// 24 小时价格表，按小时下标
#[derive(Debug, Clone)]
pub struct PricingTable {
    pub screen: screen::Model,
    pub hours: Vec<Option<screen_pricing::Model>>,
}

pub struct PricingService {
    storage: Arc<SeaOrmStorage>,
}

impl PricingService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 读取某屏幕的价格表，缺失的小时为 `None`
    pub async fn pricing_table(&self, screen_id: i32) -> Result<PricingTable> {
        let screen = self
            .storage
            .find_screen(screen_id)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("Screen {} not found", screen_id)))?;

        let mut hours: Vec<Option<screen_pricing::Model>> = vec![None; HOURS_PER_DAY as usize];
        for row in self.storage.pricing_for_screen(screen_id).await? {
            if let Some(slot) = usize::try_from(row.hour).ok().and_then(|h| hours.get_mut(h)) {
                *slot = Some(row);
            }
        }

        Ok(PricingTable { screen, hours })
    }

    /// 原子地替换整张价格表；未提交的小时不再有价格行
    pub async fn replace_pricing(&self, screen_id: i32, entries: &[PricingEntry]) -> Result<usize> {
        if let Some(bad) = entries
            .iter()
            .find(|e| !(0..HOURS_PER_DAY).contains(&e.hour))
        {
            return Err(CrmError::validation(
                format!("price_{}", bad.hour),
                "hour must be between 0 and 23",
            ));
        }

        let txn = self.storage.begin().await?;

        if screen::Entity::find_by_id(screen_id).one(&txn).await?.is_none() {
            return Err(CrmError::not_found(format!("Screen {} not found", screen_id)));
        }

        let count = mutations::replace_pricing(&txn, screen_id, entries).await?;

        txn.commit().await.map_err(|e| {
            error!("Failed to commit pricing for screen {}: {}", screen_id, e);
            CrmError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        info!("Pricing for screen {} replaced with {} rows", screen_id, count);
        Ok(count)
    }
}
