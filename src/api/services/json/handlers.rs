//! JSON lookup and import endpoints

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use std::sync::Arc;
use tracing::{info, trace};

use super::helpers::{api_result, error_from_crm, json_ok};
use super::types::{
    FullClient, IdName, ImportBrandsRequest, ImportKampanijosRequest, KampanijaResponse,
};
use crate::services::{ClientService, ImportService};

/// `GET /api/clients` → `[{id, name}]`
pub async fn list_clients(
    clients: web::Data<Arc<ClientService>>,
) -> ActixResult<impl Responder> {
    trace!("API: list clients");
    let result = clients
        .list_clients()
        .await
        .map(|rows| rows.into_iter().map(IdName::from).collect::<Vec<_>>());
    Ok(api_result(result))
}

/// `GET /api/clients/full`（需要 API key）
pub async fn list_full_clients(
    imports: web::Data<Arc<ImportService>>,
) -> ActixResult<impl Responder> {
    trace!("API: list full client records");
    let result = imports
        .full_clients()
        .await
        .map(|rows| rows.into_iter().map(FullClient::from).collect::<Vec<_>>());
    Ok(api_result(result))
}

/// `GET /api/campaigns/{client_id}` → `[{id, name}]`
pub async fn list_campaigns_for_client(
    path: web::Path<i32>,
    clients: web::Data<Arc<ClientService>>,
) -> ActixResult<impl Responder> {
    let client_id = path.into_inner();
    trace!("API: list campaigns for client {}", client_id);
    let result = clients
        .campaigns_for_client(client_id)
        .await
        .map(|rows| rows.into_iter().map(IdName::from).collect::<Vec<_>>());
    Ok(api_result(result))
}

/// `GET /api/kampanijos`（需要 API key）
pub async fn list_kampanijos(
    clients: web::Data<Arc<ClientService>>,
) -> ActixResult<impl Responder> {
    let result = clients.list_kampanijos().await.map(|rows| {
        rows.into_iter()
            .map(KampanijaResponse::from)
            .collect::<Vec<_>>()
    });
    Ok(api_result(result))
}

/// `POST /api/import-brands`
pub async fn import_brands(
    body: web::Json<ImportBrandsRequest>,
    imports: web::Data<Arc<ImportService>>,
) -> ActixResult<HttpResponse> {
    let request = body.into_inner();
    info!("API: brand import with {} records", request.brands.len());

    Ok(match imports.import_brands(&request.brands).await {
        Ok(report) => json_ok(&report),
        Err(e) => error_from_crm(&e),
    })
}

/// `POST /api/import-kampanijos`
pub async fn import_kampanijos(
    body: web::Json<ImportKampanijosRequest>,
    imports: web::Data<Arc<ImportService>>,
) -> ActixResult<HttpResponse> {
    let request = body.into_inner();
    info!(
        "API: kampanija import with {} records",
        request.kampanijos.len()
    );

    Ok(match imports.import_kampanijos(&request.kampanijos).await {
        Ok(report) => json_ok(&report),
        Err(e) => error_from_crm(&e),
    })
}
