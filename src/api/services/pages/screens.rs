//! Screen provider, screen and pricing pages

use actix_multipart::Multipart;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use futures_util::StreamExt;
use std::sync::Arc;
use tracing::{debug, error};

use super::FORM_LIMIT;
use super::flash::{Flash, redirect_with_flash};
use super::layout::{
    empty_row, error_redirect, error_summary, input, not_found_page, ok_page, or_dash,
    render_page, select, text_input, textarea,
};
use crate::errors::{CrmError, FieldError};
use crate::services::forms::{HOURS_PER_DAY, parse_pricing_form, parse_provider_form, parse_screen_form};
use crate::services::{PricingService, ScreenService, UploadedImage};
use crate::storage::{ContentType, ScreenType};
use crate::utils::{FormFields, escape, escape_opt};
use migration::entities::screen;
use strum::IntoEnumIterator;

pub(super) fn screen_row(s: &screen::Model, provider: Option<&str>) -> String {
    format!(
        "<tr><td><a href=\"/screen/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td>\
         <td>{}</td><td>{}</td><td>{} x {} m</td></tr>",
        s.id,
        escape(&s.name),
        provider.map(escape).unwrap_or_else(|| "-".to_string()),
        escape(&s.city),
        escape(&s.address),
        escape(&s.screen_type),
        escape(&s.content_type),
        s.width,
        s.height,
    )
}

pub(super) const SCREEN_TABLE_HEAD: &str = "<tr><th>Name</th><th>Provider</th><th>City</th>\
    <th>Address</th><th>Type</th><th>Content</th><th>Size</th></tr>";

// ============ Providers ============

pub async fn providers_page(
    req: HttpRequest,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    let rows = match screens.list_providers().await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(&req, &e, "/"),
    };

    let body: String = if rows.is_empty() {
        empty_row(4, "No providers yet.")
    } else {
        rows.iter()
            .map(|p| {
                format!(
                    "<tr><td><a href=\"/provider/{}\">{}</a></td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    p.id,
                    escape(&p.name),
                    escape(&p.contact_person),
                    escape(&p.email),
                    escape(&p.phone),
                )
            })
            .collect()
    };

    ok_page(
        &req,
        "Screen providers",
        &format!(
            "<p><a href=\"/provider/new\">New provider</a></p>\
             <table><tr><th>Name</th><th>Contact person</th><th>Email</th><th>Phone</th></tr>{}</table>",
            body
        ),
    )
}

fn provider_form_page(
    req: &HttpRequest,
    status: StatusCode,
    values: &FormFields,
    errors: &[FieldError],
) -> HttpResponse {
    let body = format!(
        "{}<form method=\"post\" action=\"/provider/new\">{}{}{}{}\
         <p><button type=\"submit\">Create provider</button></p></form>",
        error_summary(errors),
        text_input(values, "name", "Name", true),
        input(values, "email", "Email", "email", false),
        text_input(values, "phone", "Phone", false),
        text_input(values, "contact_person", "Contact person", false),
    );
    render_page(req, status, "New screen provider", &body)
}

pub async fn new_provider_page(req: HttpRequest) -> HttpResponse {
    provider_form_page(&req, StatusCode::OK, &FormFields::new(), &[])
}

pub async fn create_provider(
    req: HttpRequest,
    form: web::Form<FormFields>,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    let values = form.into_inner();

    let result = match parse_provider_form(&values) {
        Ok(input) => screens.create_provider(input).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(provider) => redirect_with_flash(
            "/providers",
            &[Flash::success(format!("Provider '{}' created", provider.name))],
        ),
        Err(CrmError::Validation(errors)) => {
            provider_form_page(&req, StatusCode::BAD_REQUEST, &values, &errors)
        }
        Err(e) => error_redirect(&req, &e, "/provider/new"),
    }
}

pub async fn provider_detail_page(
    req: HttpRequest,
    path: web::Path<i32>,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    let detail = match screens.provider_detail(path.into_inner()).await {
        Ok(detail) => detail,
        Err(e) => return error_redirect(&req, &e, "/providers"),
    };

    let p = &detail.provider;
    let rows: String = if detail.screens.is_empty() {
        empty_row(7, "This provider has no screens yet.")
    } else {
        detail
            .screens
            .iter()
            .map(|s| screen_row(s, Some(&p.name)))
            .collect()
    };

    ok_page(
        &req,
        &p.name,
        &format!(
            "<dl><dt>Contact person</dt><dd>{}</dd><dt>Email</dt><dd>{}</dd>\
             <dt>Phone</dt><dd>{}</dd><dt>Created</dt><dd>{}</dd></dl>\
             <h2>Screens</h2><table>{}{}</table>",
            escape(&p.contact_person),
            escape(&p.email),
            escape(&p.phone),
            p.created_at.format("%Y-%m-%d"),
            SCREEN_TABLE_HEAD,
            rows
        ),
    )
}

// ============ Screens ============

pub async fn screens_page(
    req: HttpRequest,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    let rows = match screens.list_screens().await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(&req, &e, "/"),
    };

    let body: String = if rows.is_empty() {
        empty_row(7, "No screens yet.")
    } else {
        rows.iter()
            .map(|(s, p)| screen_row(s, p.as_ref().map(|p| p.name.as_str())))
            .collect()
    };

    ok_page(
        &req,
        "Screens",
        &format!(
            "<p><a href=\"/screen/new\">New screen</a></p><table>{}{}</table>",
            SCREEN_TABLE_HEAD, body
        ),
    )
}

async fn screen_form_page(
    req: &HttpRequest,
    status: StatusCode,
    screens: &ScreenService,
    values: &FormFields,
    errors: &[FieldError],
) -> HttpResponse {
    let providers = match screens.list_providers().await {
        Ok(rows) => rows,
        Err(e) => return error_redirect(req, &e, "/screens"),
    };
    let provider_options: Vec<(String, String)> = providers
        .iter()
        .map(|p| (p.id.to_string(), p.name.clone()))
        .collect();
    let type_options: Vec<(String, String)> = ScreenType::iter()
        .map(|t| (t.to_string(), t.to_string()))
        .collect();
    let content_options: Vec<(String, String)> = ContentType::iter()
        .map(|t| (t.to_string(), t.to_string()))
        .collect();

    let body = format!(
        "{errors}<form method=\"post\" action=\"/screen/new\" enctype=\"multipart/form-data\">\
         {provider}{name}\
         <label>Image <input type=\"file\" name=\"image\" accept=\"image/*\"></label>\
         {position}{comment}{screen_type}{content_type}\
         <fieldset><legend>Dimensions</legend>{width}{height}{pw}{ph}{pc}</fieldset>\
         <fieldset><legend>Location</legend>{gps}{city}{address}{side}</fieldset>\
         <p><button type=\"submit\">Create screen</button></p></form>",
        errors = error_summary(errors),
        provider = select(
            values,
            "provider_id",
            "Provider *",
            &provider_options,
            Some("Select a provider"),
        ),
        name = text_input(values, "name", "Name", true),
        position = textarea(values, "position_description", "Position description"),
        comment = textarea(values, "comment", "Comment"),
        screen_type = select(values, "screen_type", "Screen type *", &type_options, None),
        content_type = select(values, "content_type", "Content type *", &content_options, None),
        width = input(values, "width", "Width (m)", "text", true),
        height = input(values, "height", "Height (m)", "text", true),
        pw = input(values, "pixel_width", "Pixel width", "number", false),
        ph = input(values, "pixel_height", "Pixel height", "number", false),
        pc = text_input(values, "pixel_comment", "Pixel comment", false),
        gps = text_input(values, "gps_coordinates", "GPS (latitude, longitude)", false),
        city = text_input(values, "city", "City", true),
        address = text_input(values, "address", "Address", true),
        side = text_input(values, "side", "Side", false),
    );
    render_page(req, status, "New screen", &body)
}

pub async fn new_screen_page(
    req: HttpRequest,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    screen_form_page(&req, StatusCode::OK, &screens, &FormFields::new(), &[]).await
}

/// 读取 multipart：文本字段进 `FormFields`，`image` 字段作为上传文件
async fn read_screen_multipart(
    mut payload: Multipart,
    max_file_size: usize,
) -> Result<(FormFields, Option<UploadedImage>), CrmError> {
    let mut fields = FormFields::new();
    let mut image = None;
    let mut errors = Vec::new();
    let mut text_bytes = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| {
            CrmError::validation("form", format!("invalid multipart data: {}", e))
        })?;
        let name = field.name().unwrap_or("").to_string();

        if name == "image" {
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .unwrap_or("")
                .to_string();

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let bytes = chunk.map_err(|e| {
                    CrmError::file_operation(format!("Failed to read upload: {}", e))
                })?;
                if data.len() + bytes.len() > max_file_size {
                    return Err(CrmError::validation(
                        "image",
                        format!("file is larger than {} bytes", max_file_size),
                    ));
                }
                data.extend_from_slice(&bytes);
            }
            debug!("Received upload '{}' ({} bytes)", filename, data.len());
            image = Some(UploadedImage { filename, data });
        } else {
            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let bytes = chunk.map_err(|e| {
                    CrmError::validation(name.clone(), format!("could not be read: {}", e))
                })?;
                text_bytes += bytes.len();
                if text_bytes > FORM_LIMIT {
                    return Err(CrmError::validation(
                        name,
                        format!("form fields are larger than {} bytes", FORM_LIMIT),
                    ));
                }
                data.extend_from_slice(&bytes);
            }
            match String::from_utf8(data) {
                Ok(value) => {
                    fields.insert(name, value);
                }
                Err(_) => errors.push(FieldError::new(name, "is not valid UTF-8 text")),
            }
        }
    }

    if !errors.is_empty() {
        return Err(CrmError::Validation(errors));
    }
    Ok((fields, image))
}

pub async fn create_screen(
    req: HttpRequest,
    payload: Multipart,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    let (values, image) =
        match read_screen_multipart(payload, screens.uploads().max_file_size).await {
            Ok(parts) => parts,
            Err(CrmError::Validation(errors)) => {
                return screen_form_page(
                    &req,
                    StatusCode::BAD_REQUEST,
                    &screens,
                    &FormFields::new(),
                    &errors,
                )
                .await;
            }
            Err(e) => return error_redirect(&req, &e, "/screen/new"),
        };

    let result = match parse_screen_form(&values) {
        Ok(form) => screens.create_screen(form, image).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(created) => {
            let mut flashes = vec![Flash::success(format!(
                "Screen '{}' created",
                created.screen.name
            ))];
            flashes.extend(created.warnings.into_iter().map(Flash::warning));
            redirect_with_flash("/screens", &flashes)
        }
        Err(CrmError::Validation(errors)) => {
            screen_form_page(&req, StatusCode::BAD_REQUEST, &screens, &values, &errors).await
        }
        Err(e) => error_redirect(&req, &e, "/screen/new"),
    }
}

pub async fn screen_detail_page(
    req: HttpRequest,
    path: web::Path<i32>,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    let detail = match screens.screen_detail(path.into_inner()).await {
        Ok(detail) => detail,
        Err(e) => return error_redirect(&req, &e, "/screens"),
    };
    let s = &detail.screen;

    let image = s
        .image_path
        .as_deref()
        .map(|p| {
            format!(
                "<p><img src=\"/static/{}\" alt=\"{}\" style=\"max-width:480px\"></p>",
                escape(p),
                escape(&s.name)
            )
        })
        .unwrap_or_default();

    let gps = match (s.gps_latitude, s.gps_longitude) {
        (Some(lat), Some(lng)) => format!("{}, {}", lat, lng),
        _ => "-".to_string(),
    };

    let pricing: String = if detail.pricing.is_empty() {
        empty_row(3, "No pricing set.")
    } else {
        detail
            .pricing
            .iter()
            .map(|p| {
                format!(
                    "<tr><td>{:02}:00</td><td>{:.2}</td><td>{}</td></tr>",
                    p.hour, p.price_per_thousand_contacts, p.contact_count
                )
            })
            .collect()
    };

    let provider = detail
        .provider
        .as_ref()
        .map(|p| format!("<a href=\"/provider/{}\">{}</a>", p.id, escape(&p.name)))
        .unwrap_or_else(|| "-".to_string());

    ok_page(
        &req,
        &s.name,
        &format!(
            "{image}<dl>\
             <dt>Provider</dt><dd>{provider}</dd>\
             <dt>Type</dt><dd>{screen_type}</dd><dt>Content</dt><dd>{content_type}</dd>\
             <dt>Size</dt><dd>{width} x {height} m</dd>\
             <dt>Pixels</dt><dd>{pw} x {ph} {pc}</dd>\
             <dt>GPS</dt><dd>{gps}</dd>\
             <dt>City</dt><dd>{city}</dd><dt>Address</dt><dd>{address}</dd><dt>Side</dt><dd>{side}</dd>\
             <dt>Position</dt><dd>{position}</dd><dt>Comment</dt><dd>{comment}</dd>\
             </dl>\
             <h2>Pricing</h2><p><a href=\"/screen/{id}/pricing\">Edit pricing</a></p>\
             <table><tr><th>Hour</th><th>Price / 1000 contacts</th><th>Contacts</th></tr>{pricing}</table>",
            screen_type = escape(&s.screen_type),
            content_type = escape(&s.content_type),
            width = s.width,
            height = s.height,
            pw = or_dash(s.pixel_width),
            ph = or_dash(s.pixel_height),
            pc = escape_opt(s.pixel_comment.as_deref()),
            city = escape(&s.city),
            address = escape(&s.address),
            side = or_dash(s.side.as_deref()),
            position = or_dash(s.position_description.as_deref()),
            comment = or_dash(s.comment.as_deref()),
            id = s.id,
        ),
    )
}

// ============ Pricing ============

async fn pricing_form_page(
    req: &HttpRequest,
    status: StatusCode,
    pricing: &PricingService,
    screen_id: i32,
    submitted: Option<&FormFields>,
    errors: &[FieldError],
) -> HttpResponse {
    let table = match pricing.pricing_table(screen_id).await {
        Ok(table) => table,
        Err(e) => return error_redirect(req, &e, "/screens"),
    };

    // 重新显示时用提交的值，否则用已有价格
    let mut values = FormFields::new();
    match submitted {
        Some(submitted) => values.clone_from(submitted),
        None => {
            for row in table.hours.iter().flatten() {
                values.insert(
                    format!("price_{}", row.hour),
                    row.price_per_thousand_contacts.to_string(),
                );
                values.insert(format!("contacts_{}", row.hour), row.contact_count.to_string());
            }
        }
    }

    let rows: String = (0..HOURS_PER_DAY)
        .map(|hour| {
            let price = format!("price_{}", hour);
            let contacts = format!("contacts_{}", hour);
            format!(
                "<tr><td>{:02}:00</td>\
                 <td><input type=\"text\" name=\"{}\" value=\"{}\"></td>\
                 <td><input type=\"text\" name=\"{}\" value=\"{}\"></td></tr>",
                hour,
                price,
                values.get(&price).map(|v| escape(v)).unwrap_or_default(),
                contacts,
                values.get(&contacts).map(|v| escape(v)).unwrap_or_default(),
            )
        })
        .collect();

    let body = format!(
        "{}<p>Screen: <a href=\"/screen/{id}\">{}</a></p>\
         <p>Hours left blank have no pricing.</p>\
         <form method=\"post\" action=\"/screen/{id}/pricing\">\
         <table><tr><th>Hour</th><th>Price / 1000 contacts</th><th>Contacts</th></tr>{}</table>\
         <p><button type=\"submit\">Save pricing</button></p></form>",
        error_summary(errors),
        escape(&table.screen.name),
        rows,
        id = table.screen.id,
    );
    render_page(req, status, "Screen pricing", &body)
}

pub async fn pricing_page(
    req: HttpRequest,
    path: web::Path<i32>,
    pricing: web::Data<Arc<PricingService>>,
) -> HttpResponse {
    pricing_form_page(&req, StatusCode::OK, &pricing, path.into_inner(), None, &[]).await
}

pub async fn update_pricing(
    req: HttpRequest,
    path: web::Path<i32>,
    form: web::Form<FormFields>,
    pricing: web::Data<Arc<PricingService>>,
) -> HttpResponse {
    let screen_id = path.into_inner();
    let values = form.into_inner();

    let result = match parse_pricing_form(&values) {
        Ok(entries) => pricing.replace_pricing(screen_id, &entries).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(count) => redirect_with_flash(
            &format!("/screen/{}", screen_id),
            &[Flash::success(format!("Pricing saved ({} hours)", count))],
        ),
        Err(CrmError::Validation(errors)) => {
            pricing_form_page(
                &req,
                StatusCode::BAD_REQUEST,
                &pricing,
                screen_id,
                Some(&values),
                &errors,
            )
            .await
        }
        Err(e) => error_redirect(&req, &e, &format!("/screen/{}/pricing", screen_id)),
    }
}

// ============ Uploads ============

fn content_type_for(filename: &str) -> &'static str {
    match filename
        .rsplit('.')
        .next()
        .map(|ext| ext.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// `GET /static/uploads/{filename}`
pub async fn serve_upload(
    req: HttpRequest,
    path: web::Path<String>,
    screens: web::Data<Arc<ScreenService>>,
) -> HttpResponse {
    let filename = path.into_inner();

    // 只接受上传时生成的文件名
    if crate::utils::sanitize_filename(&filename).as_deref() != Some(filename.as_str()) {
        return not_found_page(&req, "File not found");
    }

    let full_path = std::path::Path::new(&screens.uploads().dir).join(&filename);
    match tokio::fs::read(&full_path).await {
        Ok(data) => HttpResponse::Ok()
            .content_type(content_type_for(&filename))
            .body(data),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Upload not found: {}", full_path.display());
            not_found_page(&req, "File not found")
        }
        Err(e) => {
            error!("Failed to read upload {}: {}", full_path.display(), e);
            HttpResponse::InternalServerError().finish()
        }
    }
}
