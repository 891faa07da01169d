//! Client and campaign service
//!
//! Owns the client / campaign / kampanija listing and the standalone
//! creation forms. Multi-record writes run inside one transaction.

use std::sync::Arc;

use sea_orm::{ConnectionTrait, EntityTrait};
use tracing::{error, info};

use super::forms::{CampaignForm, ClientChoice};
use crate::errors::{CrmError, Result};
use crate::storage::backend::mutations;
use crate::storage::{CampaignWithClient, NewClient, SeaOrmStorage};
use migration::entities::{campaign, client, kampanija};

/// 在事务内解析客户选择：已有客户必须存在，新客户按 (name, company) 复用
pub(crate) async fn resolve_client<C: ConnectionTrait>(
    conn: &C,
    choice: &ClientChoice,
) -> Result<client::Model> {
    match choice {
        ClientChoice::Existing(id) => client::Entity::find_by_id(*id)
            .one(conn)
            .await?
            .ok_or_else(|| CrmError::not_found(format!("Client {} not found", id))),
        ClientChoice::New(input) => {
            let (model, _) = mutations::insert_or_get_client(conn, input).await?;
            Ok(model)
        }
    }
}

pub struct ClientService {
    storage: Arc<SeaOrmStorage>,
}

impl ClientService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 创建客户；同名同公司的客户已存在时复用
    ///
    /// 返回 `(client, created)`。
    pub async fn create_client(&self, input: NewClient) -> Result<(client::Model, bool)> {
        mutations::insert_or_get_client(self.storage.get_db(), &input).await
    }

    pub async fn list_clients(&self) -> Result<Vec<client::Model>> {
        self.storage.list_clients().await
    }

    /// 创建活动，必要时在同一事务内创建客户
    ///
    /// 同一客户下同名活动已存在时复用，返回 `(campaign, created)`。
    pub async fn create_campaign(&self, form: CampaignForm) -> Result<(campaign::Model, bool)> {
        let txn = self.storage.begin().await?;

        let client = resolve_client(&txn, &form.client).await?;
        let (campaign, created) =
            mutations::insert_or_get_campaign(&txn, client.id, &form.campaign).await?;

        txn.commit().await.map_err(|e| {
            error!("Failed to commit campaign creation: {}", e);
            CrmError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Campaign '{}' saved for client '{}'",
            campaign.name, client.name
        );
        Ok((campaign, created))
    }

    pub async fn list_campaigns(&self, client_id: Option<i32>) -> Result<Vec<CampaignWithClient>> {
        self.storage.list_campaigns(client_id).await
    }

    /// 某客户的活动；客户不存在时返回空列表
    pub async fn campaigns_for_client(&self, client_id: i32) -> Result<Vec<campaign::Model>> {
        self.storage.campaigns_for_client(client_id).await
    }

    pub async fn list_kampanijos(&self) -> Result<Vec<kampanija::Model>> {
        self.storage.list_kampanijos().await
    }
}
