//! Client, campaign and kampanija pages

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use std::sync::Arc;

use super::flash::{Flash, redirect_with_flash};
use super::layout::{
    empty_row, error_redirect, error_summary, input, ok_page, or_dash, render_page, select,
    text_input, textarea,
};
use crate::errors::{CrmError, FieldError};
use crate::services::ClientService;
use crate::services::forms::{parse_campaign_form, parse_client_form};
use crate::utils::{FormFields, escape};
use migration::entities::client;

#[derive(Debug, Deserialize)]
pub struct CampaignQuery {
    pub client_id: Option<i32>,
}

pub(super) fn client_options(clients: &[client::Model]) -> Vec<(String, String)> {
    clients
        .iter()
        .map(|c| {
            let label = if c.company.is_empty() {
                c.name.clone()
            } else {
                format!("{} ({})", c.name, c.company)
            };
            (c.id.to_string(), label)
        })
        .collect()
}

/// `new_client_*` 字段组
pub(super) fn new_client_fieldset(values: &FormFields) -> String {
    format!(
        "<fieldset><legend>New client</legend>{}{}{}{}{}</fieldset>",
        text_input(values, "new_client_name", "Name", false),
        input(values, "new_client_email", "Email", "email", false),
        text_input(values, "new_client_phone", "Phone", false),
        text_input(values, "new_client_contact", "Contact person", false),
        text_input(values, "new_client_company", "Company", false),
    )
}

/// `client_type` 单选
pub(super) fn client_type_radios(values: &FormFields) -> String {
    let current = values
        .get("client_type")
        .map(String::as_str)
        .unwrap_or("existing");
    let radio = |value: &str, label: &str| {
        format!(
            "<label><input type=\"radio\" name=\"client_type\" value=\"{}\"{}> {}</label>",
            value,
            if current == value { " checked" } else { "" },
            label
        )
    };
    format!(
        "{}{}",
        radio("existing", "Existing client"),
        radio("new", "New client")
    )
}

// ============ Clients ============

pub async fn clients_page(
    req: HttpRequest,
    clients: web::Data<Arc<ClientService>>,
) -> HttpResponse {
    let rows = match clients.list_clients().await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(&req, &e, "/"),
    };

    let body: String = if rows.is_empty() {
        empty_row(6, "No clients yet.")
    } else {
        rows.iter()
            .map(|c| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
                     <td><a href=\"/campaigns?client_id={}\">Campaigns</a></td></tr>",
                    escape(&c.name),
                    escape(&c.company),
                    escape(&c.email),
                    escape(&c.phone),
                    escape(&c.contact_person),
                    c.id
                )
            })
            .collect()
    };

    ok_page(
        &req,
        "Clients",
        &format!(
            "<p><a href=\"/client/new\">New client</a></p>\
             <table><tr><th>Name</th><th>Company</th><th>Email</th><th>Phone</th>\
             <th>Contact person</th><th></th></tr>{}</table>",
            body
        ),
    )
}

fn client_form_page(
    req: &HttpRequest,
    status: StatusCode,
    values: &FormFields,
    errors: &[FieldError],
) -> HttpResponse {
    let body = format!(
        "{}<form method=\"post\" action=\"/client/new\">{}{}{}{}{}\
         <p><button type=\"submit\">Create client</button></p></form>",
        error_summary(errors),
        text_input(values, "name", "Name", true),
        input(values, "email", "Email", "email", false),
        text_input(values, "phone", "Phone", false),
        text_input(values, "contact_person", "Contact person", false),
        text_input(values, "company", "Company", false),
    );
    render_page(req, status, "New client", &body)
}

pub async fn new_client_page(req: HttpRequest) -> HttpResponse {
    client_form_page(&req, StatusCode::OK, &FormFields::new(), &[])
}

pub async fn create_client(
    req: HttpRequest,
    form: web::Form<FormFields>,
    clients: web::Data<Arc<ClientService>>,
) -> HttpResponse {
    let values = form.into_inner();

    let result = match parse_client_form(&values) {
        Ok(input) => clients.create_client(input).await,
        Err(e) => Err(e),
    };

    match result {
        Ok((client, true)) => redirect_with_flash(
            "/clients",
            &[Flash::success(format!("Client '{}' created", client.name))],
        ),
        Ok((client, false)) => redirect_with_flash(
            "/clients",
            &[Flash::warning(format!(
                "Client '{}' already exists, reused",
                client.name
            ))],
        ),
        Err(CrmError::Validation(errors)) => {
            client_form_page(&req, StatusCode::BAD_REQUEST, &values, &errors)
        }
        Err(e) => error_redirect(&req, &e, "/client/new"),
    }
}

// ============ Campaigns ============

pub async fn campaigns_page(
    req: HttpRequest,
    query: web::Query<CampaignQuery>,
    clients: web::Data<Arc<ClientService>>,
) -> HttpResponse {
    let rows = match clients.list_campaigns(query.client_id).await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(&req, &e, "/"),
    };

    let heading = match (query.client_id, rows.first().and_then(|r| r.client.as_ref())) {
        (Some(_), Some(client)) => format!("<p>Client: {}</p>", escape(&client.name)),
        _ => String::new(),
    };

    let body: String = if rows.is_empty() {
        empty_row(6, "No campaigns.")
    } else {
        rows.iter()
            .map(|row| {
                let c = &row.campaign;
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&c.name),
                    row.client
                        .as_ref()
                        .map(|cl| escape(&cl.name))
                        .unwrap_or_else(|| "-".to_string()),
                    or_dash(c.start_date),
                    or_dash(c.end_date),
                    or_dash(c.budget.map(|b| format!("{:.2}", b))),
                    or_dash(c.description.as_deref()),
                )
            })
            .collect()
    };

    ok_page(
        &req,
        "Campaigns",
        &format!(
            "{}<p><a href=\"/campaign/new\">New campaign</a></p>\
             <table><tr><th>Name</th><th>Client</th><th>Start</th><th>End</th>\
             <th>Budget</th><th>Description</th></tr>{}</table>",
            heading, body
        ),
    )
}

async fn campaign_form_page(
    req: &HttpRequest,
    status: StatusCode,
    clients: &ClientService,
    values: &FormFields,
    errors: &[FieldError],
) -> HttpResponse {
    let all_clients = match clients.list_clients().await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(req, &e, "/campaigns"),
    };

    let body = format!(
        "{}<form method=\"post\" action=\"/campaign/new\">\
         <fieldset><legend>Client</legend>{}{}</fieldset>{}\
         <fieldset><legend>Campaign</legend>{}{}{}{}{}</fieldset>\
         <p><button type=\"submit\">Create campaign</button></p></form>",
        error_summary(errors),
        client_type_radios(values),
        select(
            values,
            "existing_client_id",
            "Existing client",
            &client_options(&all_clients),
            Some("Select a client"),
        ),
        new_client_fieldset(values),
        text_input(values, "name", "Name", true),
        textarea(values, "description", "Description"),
        input(values, "start_date", "Start date", "date", false),
        input(values, "end_date", "End date", "date", false),
        input(values, "budget", "Budget", "number", false),
    );
    render_page(req, status, "New campaign", &body)
}

pub async fn new_campaign_page(
    req: HttpRequest,
    query: web::Query<CampaignQuery>,
    clients: web::Data<Arc<ClientService>>,
) -> HttpResponse {
    let mut values = FormFields::new();
    if let Some(client_id) = query.client_id {
        values.insert("existing_client_id".to_string(), client_id.to_string());
    }
    campaign_form_page(&req, StatusCode::OK, &clients, &values, &[]).await
}

pub async fn create_campaign(
    req: HttpRequest,
    form: web::Form<FormFields>,
    clients: web::Data<Arc<ClientService>>,
) -> HttpResponse {
    let values = form.into_inner();

    let result = match parse_campaign_form(&values) {
        Ok(form) => clients.create_campaign(form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok((campaign, created)) => {
            let flash = if created {
                Flash::success(format!("Campaign '{}' created", campaign.name))
            } else {
                Flash::warning(format!(
                    "Campaign '{}' already exists, reused",
                    campaign.name
                ))
            };
            redirect_with_flash(
                &format!("/campaigns?client_id={}", campaign.client_id),
                &[flash],
            )
        }
        Err(CrmError::Validation(errors)) => {
            campaign_form_page(&req, StatusCode::BAD_REQUEST, &clients, &values, &errors).await
        }
        Err(e) => error_redirect(&req, &e, "/campaign/new"),
    }
}

// ============ Kampanijos ============

pub async fn kampanijos_page(
    req: HttpRequest,
    clients: web::Data<Arc<ClientService>>,
) -> HttpResponse {
    let rows = match clients.list_kampanijos().await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(&req, &e, "/"),
    };

    let body: String = if rows.is_empty() {
        empty_row(6, "No kampanijos imported yet.")
    } else {
        rows.iter()
            .map(|k| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    escape(&k.name),
                    or_dash(k.client_brand_name.as_deref()),
                    or_dash(k.campaign_name.as_deref()),
                    or_dash(k.external_id.as_deref()),
                    if k.source_system.is_empty() {
                        "-".to_string()
                    } else {
                        escape(&k.source_system)
                    },
                    k.updated_at.format("%Y-%m-%d %H:%M"),
                )
            })
            .collect()
    };

    ok_page(
        &req,
        "Kampanijos",
        &format!(
            "<table><tr><th>Name</th><th>Brand</th><th>Campaign</th><th>External id</th>\
             <th>Source</th><th>Updated</th></tr>{}</table>",
            body
        ),
    )
}
