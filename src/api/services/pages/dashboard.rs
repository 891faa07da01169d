//! 首页

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use super::layout::{empty_row, error_redirect, ok_page};
use super::screens::{SCREEN_TABLE_HEAD, screen_row};
use crate::errors::CrmError;
use crate::services::{PlanService, ScreenService};
use crate::utils::escape;

pub async fn dashboard_page(
    req: HttpRequest,
    screens: web::Data<Arc<ScreenService>>,
    plans: web::Data<Arc<PlanService>>,
) -> HttpResponse {
    let data = async {
        let providers = screens.list_providers().await?;
        let plan_rows = plans.list_plans().await?;
        let screen_rows = screens.list_screens().await?;
        Ok::<_, CrmError>((providers, plan_rows, screen_rows))
    };
    let (providers, plan_rows, screen_rows) = match data.await {
        Ok(data) => data,
        Err(e) => return error_redirect(&req, &e, "/clients"),
    };

    let provider_list: String = if providers.is_empty() {
        "<li>No providers yet.</li>".to_string()
    } else {
        providers
            .iter()
            .map(|p| format!("<li><a href=\"/provider/{}\">{}</a></li>", p.id, escape(&p.name)))
            .collect()
    };

    let plan_list: String = if plan_rows.is_empty() {
        "<li>No DOOH plans yet.</li>".to_string()
    } else {
        plan_rows
            .iter()
            .map(|row| {
                format!(
                    "<li><a href=\"/dooh-plan/{}\">{}</a> ({} to {}, {} screens)</li>",
                    row.plan.id,
                    escape(&row.plan.name),
                    row.plan.start_date,
                    row.plan.end_date,
                    row.booking_count
                )
            })
            .collect()
    };

    let screen_table: String = if screen_rows.is_empty() {
        empty_row(7, "No screens yet.")
    } else {
        screen_rows
            .iter()
            .map(|(s, p)| screen_row(s, p.as_ref().map(|p| p.name.as_str())))
            .collect()
    };

    ok_page(
        &req,
        "Dashboard",
        &format!(
            "<h2>Providers ({})</h2><ul>{}</ul>\
             <h2>DOOH plans ({})</h2><ul>{}</ul>\
             <h2>Screens ({})</h2><table>{}{}</table>",
            providers.len(),
            provider_list,
            plan_rows.len(),
            plan_list,
            screen_rows.len(),
            SCREEN_TABLE_HEAD,
            screen_table
        ),
    )
}
