//! Bulk imports from partner systems
//!
//! Each batch runs in a single transaction: any failing record rolls back
//! the whole batch and no partial-success report is produced.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::errors::{CrmError, FieldError, Result};
use crate::storage::backend::mutations;
use crate::storage::{BrandRecord, ImportCounts, KampanijaRecord, SeaOrmStorage};
use migration::entities::client;

/// 导入接口的成功响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub success: bool,
    pub imported_count: usize,
    pub updated_count: usize,
    pub message: String,
}

impl ImportReport {
    fn new(counts: ImportCounts, noun: &str) -> Self {
        Self {
            success: true,
            imported_count: counts.imported_count,
            updated_count: counts.updated_count,
            message: format!(
                "Imported {} new {}, updated {} existing {}",
                counts.imported_count, noun, counts.updated_count, noun
            ),
        }
    }
}

/// 每条记录都必须有非空 name
fn check_names<'a>(collection: &str, names: impl Iterator<Item = &'a str>) -> Result<()> {
    let errors: Vec<FieldError> = names
        .enumerate()
        .filter(|(_, name)| name.trim().is_empty())
        .map(|(i, _)| FieldError::new(format!("{}[{}].name", collection, i), "is required"))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        warn!("Rejected {} import: {} records without a name", collection, errors.len());
        Err(CrmError::Validation(errors))
    }
}

pub struct ImportService {
    storage: Arc<SeaOrmStorage>,
}

impl ImportService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 导入品牌客户，按 (company, name) 匹配
    pub async fn import_brands(&self, brands: &[BrandRecord]) -> Result<ImportReport> {
        check_names("brands", brands.iter().map(|b| b.name.as_str()))?;

        let txn = self.storage.begin().await?;
        let mut counts = ImportCounts::default();

        for record in brands {
            if mutations::upsert_brand(&txn, record).await? {
                counts.imported_count += 1;
            } else {
                counts.updated_count += 1;
            }
        }

        txn.commit().await.map_err(|e| {
            error!("Failed to commit brand import: {}", e);
            CrmError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Brand import finished: {} imported, {} updated",
            counts.imported_count, counts.updated_count
        );
        Ok(ImportReport::new(counts, "brands"))
    }

    /// 导入 kampanija，按 (source_system, external_id) 匹配
    pub async fn import_kampanijos(&self, records: &[KampanijaRecord]) -> Result<ImportReport> {
        check_names("kampanijos", records.iter().map(|k| k.name.as_str()))?;

        let txn = self.storage.begin().await?;
        let mut counts = ImportCounts::default();

        for record in records {
            if mutations::upsert_kampanija(&txn, record).await? {
                counts.imported_count += 1;
            } else {
                counts.updated_count += 1;
            }
        }

        txn.commit().await.map_err(|e| {
            error!("Failed to commit kampanija import: {}", e);
            CrmError::database_operation(format!("Failed to commit transaction: {}", e))
        })?;

        info!(
            "Kampanija import finished: {} imported, {} updated",
            counts.imported_count, counts.updated_count
        );
        Ok(ImportReport::new(counts, "kampanijos"))
    }

    /// 供伙伴系统读取的完整客户记录
    pub async fn full_clients(&self) -> Result<Vec<client::Model>> {
        self.storage.list_clients().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_message() {
        let report = ImportReport::new(
            ImportCounts {
                imported_count: 2,
                updated_count: 1,
            },
            "brands",
        );
        assert!(report.success);
        assert_eq!(report.message, "Imported 2 new brands, updated 1 existing brands");
    }

    #[test]
    fn test_check_names_lists_every_blank_record() {
        let err = check_names("kampanijos", ["ok", " ", "fine", ""].into_iter()).unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["kampanijos[1].name", "kampanijos[3].name"]);
    }
}
