//! DOOH plan pages: plan creation, screen picker and media plan

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;

use super::clients::{client_options, client_type_radios, new_client_fieldset};
use super::flash::{Flash, redirect_with_flash};
use super::layout::{
    empty_row, error_redirect, error_summary, input, ok_page, or_dash, render_page, select,
    text_input, textarea,
};
use crate::errors::{CrmError, FieldError};
use crate::services::forms::parse_plan_form;
use crate::services::{AddScreenOutcome, ClientService, PlanService, kampanija_display_name};
use crate::storage::PlanDetail;
use crate::utils::{FormFields, escape};

fn plan_header(detail: &PlanDetail) -> String {
    let p = &detail.plan;
    format!(
        "<dl><dt>Client</dt><dd>{}</dd><dt>Campaign</dt><dd>{}</dd>\
         <dt>Period</dt><dd>{} to {}</dd></dl>",
        detail
            .client
            .as_ref()
            .map(|c| escape(&c.name))
            .unwrap_or_else(|| "-".to_string()),
        detail
            .campaign
            .as_ref()
            .map(|c| escape(&c.name))
            .unwrap_or_else(|| "-".to_string()),
        p.start_date,
        p.end_date,
    )
}

fn plan_links(id: i32) -> String {
    format!(
        "<p><a href=\"/dooh-plan/{id}\">Overview</a> | \
         <a href=\"/dooh-plan/{id}/screens\">Add screens</a> | \
         <a href=\"/dooh-plan/{id}/media-plan\">Media plan</a></p>"
    )
}

// ============ List ============

pub async fn plans_page(req: HttpRequest, plans: web::Data<Arc<PlanService>>) -> HttpResponse {
    let rows = match plans.list_plans().await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(&req, &e, "/"),
    };

    let body: String = if rows.is_empty() {
        empty_row(6, "No DOOH plans yet.")
    } else {
        rows.iter()
            .map(|row| {
                format!(
                    "<tr><td><a href=\"/dooh-plan/{}\">{}</a></td><td>{}</td><td>{}</td>\
                     <td>{}</td><td>{}</td><td>{}</td></tr>",
                    row.plan.id,
                    escape(&row.plan.name),
                    or_dash(row.client.as_ref().map(|c| c.name.as_str())),
                    or_dash(row.campaign.as_ref().map(|c| c.name.as_str())),
                    row.plan.start_date,
                    row.plan.end_date,
                    row.booking_count,
                )
            })
            .collect()
    };

    ok_page(
        &req,
        "DOOH plans",
        &format!(
            "<p><a href=\"/dooh-plan/new\">New DOOH plan</a></p>\
             <table><tr><th>Name</th><th>Client</th><th>Campaign</th><th>Start</th>\
             <th>End</th><th>Screens</th></tr>{}</table>",
            body
        ),
    )
}

// ============ Create ============

fn campaign_type_radios(values: &FormFields) -> String {
    let current = values
        .get("campaign_type")
        .map(String::as_str)
        .unwrap_or("existing");
    [
        ("existing", "Existing campaign"),
        ("new", "New campaign"),
        ("kampanija", "From imported kampanija"),
    ]
    .iter()
    .map(|(value, label)| {
        format!(
            "<label><input type=\"radio\" name=\"campaign_type\" value=\"{}\"{}> {}</label>",
            value,
            if current == *value { " checked" } else { "" },
            label
        )
    })
    .collect()
}

async fn plan_form_page(
    req: &HttpRequest,
    status: StatusCode,
    clients: &ClientService,
    values: &FormFields,
    errors: &[FieldError],
) -> HttpResponse {
    let lookups = async {
        let all_clients = clients.list_clients().await?;
        let campaigns = clients.list_campaigns(None).await?;
        let kampanijos = clients.list_kampanijos().await?;
        Ok::<_, CrmError>((all_clients, campaigns, kampanijos))
    };
    let (all_clients, campaigns, kampanijos) = match lookups.await {
        Ok(data) => data,
        Err(e) => return error_redirect(req, &e, "/dooh-plans"),
    };

    let campaign_options: Vec<(String, String)> = campaigns
        .iter()
        .map(|row| {
            let label = match &row.client {
                Some(client) => format!("{} ({})", row.campaign.name, client.name),
                None => row.campaign.name.clone(),
            };
            (row.campaign.id.to_string(), label)
        })
        .collect();
    let kampanija_options: Vec<(String, String)> = kampanijos
        .iter()
        .map(|k| (k.id.to_string(), kampanija_display_name(k)))
        .collect();

    let body = format!(
        "{errors}<form method=\"post\" action=\"/dooh-plan/new\">\
         <fieldset><legend>Client</legend>{client_radios}{client_select}</fieldset>{new_client}\
         <fieldset><legend>Campaign</legend>{campaign_radios}{campaign_select}{kampanija_select}\
         </fieldset>\
         <fieldset><legend>New campaign</legend>{nc_name}{nc_desc}{nc_start}{nc_end}{nc_budget}</fieldset>\
         <fieldset><legend>Plan</legend>{name}{start}{end}</fieldset>\
         <p><button type=\"submit\">Create plan</button></p></form>",
        errors = error_summary(errors),
        client_radios = client_type_radios(values),
        client_select = select(
            values,
            "existing_client_id",
            "Existing client",
            &client_options(&all_clients),
            Some("Select a client"),
        ),
        new_client = new_client_fieldset(values),
        campaign_radios = campaign_type_radios(values),
        campaign_select = select(
            values,
            "existing_campaign_id",
            "Existing campaign",
            &campaign_options,
            Some("Select a campaign"),
        ),
        kampanija_select = select(
            values,
            "kampanija_id",
            "Imported kampanija",
            &kampanija_options,
            Some("Select a kampanija"),
        ),
        nc_name = text_input(values, "new_campaign_name", "Name", false),
        nc_desc = textarea(values, "new_campaign_description", "Description"),
        nc_start = input(values, "campaign_start_date", "Start date", "date", false),
        nc_end = input(values, "campaign_end_date", "End date", "date", false),
        nc_budget = input(values, "new_campaign_budget", "Budget", "number", false),
        name = text_input(values, "name", "Plan name", true),
        start = input(values, "start_date", "Start date", "date", true),
        end = input(values, "end_date", "End date", "date", true),
    );
    render_page(req, status, "New DOOH plan", &body)
}

pub async fn new_plan_page(
    req: HttpRequest,
    clients: web::Data<Arc<ClientService>>,
) -> HttpResponse {
    plan_form_page(&req, StatusCode::OK, &clients, &FormFields::new(), &[]).await
}

pub async fn create_plan(
    req: HttpRequest,
    form: web::Form<FormFields>,
    clients: web::Data<Arc<ClientService>>,
    plans: web::Data<Arc<PlanService>>,
) -> HttpResponse {
    let values = form.into_inner();

    let result = match parse_plan_form(&values) {
        Ok(form) => plans.create_plan(form).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(created) => redirect_with_flash(
            &format!("/dooh-plan/{}/screens", created.plan.id),
            &[Flash::success(format!(
                "DOOH plan '{}' created for {}",
                created.plan.name, created.client.name
            ))],
        ),
        Err(CrmError::Validation(errors)) => {
            plan_form_page(&req, StatusCode::BAD_REQUEST, &clients, &values, &errors).await
        }
        Err(e) => error_redirect(&req, &e, "/dooh-plan/new"),
    }
}

// ============ Detail ============

pub async fn plan_detail_page(
    req: HttpRequest,
    path: web::Path<i32>,
    plans: web::Data<Arc<PlanService>>,
) -> HttpResponse {
    let detail = match plans.plan_detail(path.into_inner()).await {
        Ok(detail) => detail,
        Err(e) => return error_redirect(&req, &e, "/dooh-plans"),
    };

    let rows: String = if detail.bookings.is_empty() {
        empty_row(4, "No screens in this plan yet.")
    } else {
        detail
            .bookings
            .iter()
            .map(|b| {
                let purchased: i64 = b
                    .slots
                    .iter()
                    .map(|s| i64::from(s.slot.slots_purchased))
                    .sum();
                format!(
                    "<tr><td><a href=\"/screen/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    b.screen.id,
                    escape(&b.screen.name),
                    escape(&b.screen.city),
                    b.slots.len(),
                    purchased,
                )
            })
            .collect()
    };

    ok_page(
        &req,
        &detail.plan.name,
        &format!(
            "{}{}<h2>Screens</h2><table><tr><th>Screen</th><th>City</th><th>Time slots</th>\
             <th>Slots purchased</th></tr>{}</table>",
            plan_links(detail.plan.id),
            plan_header(&detail),
            rows
        ),
    )
}

// ============ Screen picker ============

pub async fn plan_screens_page(
    req: HttpRequest,
    path: web::Path<i32>,
    plans: web::Data<Arc<PlanService>>,
) -> HttpResponse {
    let (plan, options) = match plans.plan_screens(path.into_inner()).await {
        Ok(data) => data,
        Err(e) => return error_redirect(&req, &e, "/dooh-plans"),
    };

    let rows: String = if options.is_empty() {
        empty_row(4, "No screens registered. Add screens first.")
    } else {
        options
            .iter()
            .map(|o| {
                let action = if o.already_added {
                    "Already added".to_string()
                } else {
                    format!(
                        "<form method=\"post\" action=\"/dooh-plan/{}/add-screen/{}\">\
                         <button type=\"submit\">Add</button></form>",
                        plan.id, o.screen.id
                    )
                };
                format!(
                    "<tr><td><a href=\"/screen/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    o.screen.id,
                    escape(&o.screen.name),
                    escape(&o.screen.city),
                    escape(&o.screen.address),
                    action
                )
            })
            .collect()
    };

    ok_page(
        &req,
        &format!("Screens for {}", plan.name),
        &format!(
            "{}<table><tr><th>Screen</th><th>City</th><th>Address</th><th></th></tr>{}</table>",
            plan_links(plan.id),
            rows
        ),
    )
}

pub async fn add_screen(
    req: HttpRequest,
    path: web::Path<(i32, i32)>,
    plans: web::Data<Arc<PlanService>>,
) -> HttpResponse {
    let (plan_id, screen_id) = path.into_inner();
    let back = format!("/dooh-plan/{}/screens", plan_id);

    match plans.add_screen(plan_id, screen_id).await {
        Ok(AddScreenOutcome::Added) => {
            redirect_with_flash(&back, &[Flash::success("Screen added to plan")])
        }
        Ok(AddScreenOutcome::AlreadyAdded) => {
            redirect_with_flash(&back, &[Flash::warning("Screen already added to this plan")])
        }
        Err(e) => error_redirect(&req, &e, &back),
    }
}

// ============ Media plan ============

pub async fn media_plan_page(
    req: HttpRequest,
    path: web::Path<i32>,
    plans: web::Data<Arc<PlanService>>,
) -> HttpResponse {
    let detail = match plans.media_plan(path.into_inner()).await {
        Ok(detail) => detail,
        Err(e) => return error_redirect(&req, &e, "/dooh-plans"),
    };

    let mut sections = String::new();
    for booking in &detail.bookings {
        let rows: String = if booking.slots.is_empty() {
            empty_row(5, "No time slots booked.")
        } else {
            booking
                .slots
                .iter()
                .map(|view| {
                    let (price, contacts) = match &view.pricing {
                        Some(p) => (
                            format!("{:.2}", p.price_per_thousand_contacts),
                            p.contact_count.to_string(),
                        ),
                        None => ("-".to_string(), "-".to_string()),
                    };
                    format!(
                        "<tr><td>{}</td><td>{:02}:00</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                        view.slot.date, view.slot.hour, view.slot.slots_purchased, price, contacts
                    )
                })
                .collect()
        };
        sections.push_str(&format!(
            "<h2>{} <small>{}, {}</small></h2>\
             <table><tr><th>Date</th><th>Hour</th><th>Slots</th><th>Price / 1000 contacts</th>\
             <th>Contacts</th></tr>{}</table>",
            escape(&booking.screen.name),
            escape(&booking.screen.city),
            escape(&booking.screen.address),
            rows
        ));
    }
    if sections.is_empty() {
        sections = "<p>No screens in this plan yet.</p>".to_string();
    }

    ok_page(
        &req,
        &format!("Media plan: {}", detail.plan.name),
        &format!(
            "{}{}{}",
            plan_links(detail.plan.id),
            plan_header(&detail),
            sections
        ),
    )
}
