//! 页面骨架与通用片段

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse};
use tracing::{error, warn};

use super::flash::{Flash, redirect_with_flash, read_flashes, removal_cookie};
use crate::errors::{CrmError, FieldError};
use crate::utils::{FormFields, escape};

const NAV: &[(&str, &str)] = &[
    ("/", "Dashboard"),
    ("/clients", "Clients"),
    ("/campaigns", "Campaigns"),
    ("/kampanijos", "Kampanijos"),
    ("/providers", "Providers"),
    ("/screens", "Screens"),
    ("/dooh-plans", "DOOH Plans"),
];

const STYLE: &str = "body{font-family:sans-serif;margin:0 2rem 2rem}\
nav{padding:1rem 0;border-bottom:1px solid #ccc;margin-bottom:1rem}\
nav a{margin-right:1rem}\
table{border-collapse:collapse;margin:1rem 0}\
th,td{border:1px solid #ddd;padding:.3rem .6rem;text-align:left}\
.flash{padding:.5rem 1rem;margin:.5rem 0}\
.flash.success{background:#e6f4ea}.flash.warning{background:#fff4e5}.flash.error{background:#fde8e8}\
form label{display:block;margin-top:.5rem}\
fieldset{margin:1rem 0}";

fn render_flashes(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|f| {
            format!(
                "<div class=\"flash {}\">{}</div>",
                f.level.as_ref(),
                escape(&f.message)
            )
        })
        .collect()
}

/// 渲染完整页面；请求里带的提示消息显示一次后清除
pub fn render_page(req: &HttpRequest, status: StatusCode, title: &str, body: &str) -> HttpResponse {
    let flashes = read_flashes(req);

    let nav: String = NAV
        .iter()
        .map(|(href, label)| format!("<a href=\"{}\">{}</a>", href, label))
        .collect();

    let html = format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title} | Ekranu CRM</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
         <nav>{nav}</nav>\n{flashes}\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        flashes = render_flashes(&flashes),
    );

    let mut builder = HttpResponse::build(status);
    builder.content_type("text/html; charset=utf-8");
    if !flashes.is_empty() {
        builder.cookie(removal_cookie());
    }
    builder.body(html)
}

pub fn ok_page(req: &HttpRequest, title: &str, body: &str) -> HttpResponse {
    render_page(req, StatusCode::OK, title, body)
}

pub fn not_found_page(req: &HttpRequest, message: &str) -> HttpResponse {
    render_page(
        req,
        StatusCode::NOT_FOUND,
        "Not found",
        &format!("<p>{}</p><p><a href=\"/\">Back to dashboard</a></p>", escape(message)),
    )
}

/// 非校验错误的统一处理：不存在 → 404 页面，其余 → 带提示重定向到 `back`
pub fn error_redirect(req: &HttpRequest, err: &CrmError, back: &str) -> HttpResponse {
    match err {
        CrmError::NotFound(msg) => {
            warn!("{} {}: {}", req.method(), req.path(), msg);
            not_found_page(req, msg)
        }
        _ => {
            if err.http_status().is_server_error() {
                error!("{} {} failed: {}", req.method(), req.path(), err);
            } else {
                warn!("{} {} rejected: {}", req.method(), req.path(), err);
            }
            redirect_with_flash(back, &[Flash::error(err.message())])
        }
    }
}

/// 表单顶部的错误列表
pub fn error_summary(errors: &[FieldError]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| {
            format!(
                "<li><code>{}</code> {}</li>",
                escape(&e.field),
                escape(&e.message)
            )
        })
        .collect();
    format!(
        "<div class=\"flash error\"><p>Please correct the following fields:</p><ul>{}</ul></div>",
        items
    )
}

/// 回填表单的值（已转义）
pub fn value_of(values: &FormFields, name: &str) -> String {
    values.get(name).map(|v| escape(v)).unwrap_or_default()
}

pub fn text_input(values: &FormFields, name: &str, label: &str, required: bool) -> String {
    input(values, name, label, "text", required)
}

pub fn input(values: &FormFields, name: &str, label: &str, kind: &str, required: bool) -> String {
    format!(
        "<label>{label}{mark} <input type=\"{kind}\" name=\"{name}\" value=\"{value}\"{req}></label>",
        label = escape(label),
        mark = if required { " *" } else { "" },
        kind = kind,
        name = name,
        value = value_of(values, name),
        req = if required { " required" } else { "" },
    )
}

pub fn textarea(values: &FormFields, name: &str, label: &str) -> String {
    format!(
        "<label>{} <textarea name=\"{}\">{}</textarea></label>",
        escape(label),
        name,
        value_of(values, name)
    )
}

/// `<select>`，`options` 为 (value, label)
pub fn select(
    values: &FormFields,
    name: &str,
    label: &str,
    options: &[(String, String)],
    placeholder: Option<&str>,
) -> String {
    let current = values.get(name).map(String::as_str).unwrap_or("");
    let mut html = format!("<label>{} <select name=\"{}\">", escape(label), name);
    if let Some(placeholder) = placeholder {
        html.push_str(&format!("<option value=\"\">{}</option>", escape(placeholder)));
    }
    for (value, text) in options {
        html.push_str(&format!(
            "<option value=\"{}\"{}>{}</option>",
            escape(value),
            if value == current { " selected" } else { "" },
            escape(text)
        ));
    }
    html.push_str("</select></label>");
    html
}

/// 可选值的显示
pub fn or_dash(value: Option<impl std::fmt::Display>) -> String {
    value
        .map(|v| escape(&v.to_string()))
        .unwrap_or_else(|| "-".to_string())
}

/// 空表格时显示的提示行
pub fn empty_row(columns: usize, message: &str) -> String {
    format!(
        "<tr><td colspan=\"{}\">{}</td></tr>",
        columns,
        escape(message)
    )
}
