//! JSON API 请求与响应类型

use serde::{Deserialize, Serialize};

use super::error_code::ErrorCode;
use crate::errors::FieldError;
use crate::storage::{BrandRecord, KampanijaRecord};
use migration::entities::{campaign, client, kampanija};

/// 错误响应 `{error, code, fields?}`
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

/// 下拉框选项 `{id, name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdName {
    pub id: i32,
    pub name: String,
}

impl From<client::Model> for IdName {
    fn from(c: client::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

impl From<campaign::Model> for IdName {
    fn from(c: campaign::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullClient {
    pub id: i32,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub contact_person: String,
}

impl From<client::Model> for FullClient {
    fn from(c: client::Model) -> Self {
        Self {
            id: c.id,
            name: c.name,
            company: c.company,
            email: c.email,
            phone: c.phone,
            contact_person: c.contact_person,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KampanijaResponse {
    pub id: i32,
    pub name: String,
    pub client_brand_name: Option<String>,
    pub campaign_name: Option<String>,
    pub external_id: Option<String>,
    pub source_system: String,
}

impl From<kampanija::Model> for KampanijaResponse {
    fn from(k: kampanija::Model) -> Self {
        Self {
            id: k.id,
            name: k.name,
            client_brand_name: k.client_brand_name,
            campaign_name: k.campaign_name,
            external_id: k.external_id,
            source_system: k.source_system,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportBrandsRequest {
    #[serde(default)]
    pub brands: Vec<BrandRecord>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportKampanijosRequest {
    #[serde(default)]
    pub kampanijos: Vec<KampanijaRecord>,
}
