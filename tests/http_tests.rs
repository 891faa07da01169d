//! HTTP integration tests
//!
//! Pages and the JSON API wired exactly as the server wires them.

use std::sync::{Arc, Once};

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::{CONTENT_TYPE, LOCATION};
use actix_web::test::{self, TestRequest};
use actix_web::{App, dev::ServiceResponse};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use serde_json::{Value, json};
use tempfile::TempDir;

use ekranu_crm::api::middleware::api_key::API_KEY_HEADER;
use ekranu_crm::api::services::pages::FLASH_COOKIE;
use ekranu_crm::config::{ApiConfig, StaticConfig, UploadConfig, init_config};
use ekranu_crm::runtime::lifetime::StartupContext;
use ekranu_crm::storage::SeaOrmStorage;
use migration::entities::{client, kampanija, screen, screen_booking, screen_slot};

const TEST_KEY: &str = "test-secret";

// =============================================================================
// Test Setup
// =============================================================================

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

async fn setup() -> (TempDir, StartupContext) {
    init_test_config();

    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("http_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("Failed to create storage"),
    );

    let config = StaticConfig {
        api: ApiConfig {
            api_key: TEST_KEY.to_string(),
        },
        uploads: UploadConfig {
            dir: dir.path().join("uploads").to_string_lossy().to_string(),
            ..UploadConfig::default()
        },
        ..StaticConfig::default()
    };

    (dir, StartupContext::new(storage, &config))
}

macro_rules! app {
    ($ctx:expr) => {{
        let ctx = $ctx.clone();
        test::init_service(App::new().configure(move |cfg| ctx.configure(cfg))).await
    }};
}

fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

fn flash_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == FLASH_COOKIE)
        .map(|c| c.into_owned())
}

async fn body_string<B: actix_web::body::MessageBody>(resp: ServiceResponse<B>) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

// =============================================================================
// JSON API
// =============================================================================

#[actix_rt::test]
async fn test_import_without_key_is_rejected() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);
    let payload = json!({"kampanijos": [{"name": "K1", "external_id": "1"}]});

    let req = TestRequest::post()
        .uri("/api/import-kampanijos")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid API key");

    let req = TestRequest::post()
        .uri("/api/import-brands")
        .insert_header((API_KEY_HEADER, "wrong"))
        .set_json(json!({"brands": [{"name": "Acme"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let db = ctx.storage.get_db();
    assert_eq!(kampanija::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(client::Entity::find().count(db).await.unwrap(), 0);
}

#[actix_rt::test]
async fn test_import_kampanijos_twice() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);
    let payload = json!({"kampanijos": [
        {"name": "K1", "external_id": "1", "source_system": "partner"},
        {"name": "K2", "external_id": "2", "source_system": "partner",
         "client_brand_name": "Acme", "campaign_name": "Spring"}
    ]});

    for (imported, updated) in [(2, 0), (0, 2)] {
        let req = TestRequest::post()
            .uri("/api/import-kampanijos")
            .insert_header((API_KEY_HEADER, TEST_KEY))
            .set_json(&payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["imported_count"], imported);
        assert_eq!(body["updated_count"], updated);
    }

    let req = TestRequest::get()
        .uri("/api/kampanijos")
        .insert_header((API_KEY_HEADER, TEST_KEY))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));
}

#[actix_rt::test]
async fn test_import_rejects_bad_payloads() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri("/api/import-brands")
        .insert_header((API_KEY_HEADER, TEST_KEY))
        .insert_header((CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid JSON"));

    let req = TestRequest::post()
        .uri("/api/import-brands")
        .insert_header((API_KEY_HEADER, TEST_KEY))
        .set_json(json!({"brands": [{"name": "Acme"}, {"email": "x@y.lt"}]}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["fields"][0]["field"], "brands[1].name");

    assert_eq!(
        client::Entity::find()
            .count(ctx.storage.get_db())
            .await
            .unwrap(),
        0
    );
}

#[actix_rt::test]
async fn test_dropdown_lookups() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri("/campaign/new")
        .set_form([
            ("client_type", "new"),
            ("new_client_name", "Acme"),
            ("name", "Q1"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);

    let req = TestRequest::get().uri("/api/clients").to_request();
    let clients: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(clients[0]["name"], "Acme");
    assert!(clients[0].get("email").is_none());
    let client_id = clients[0]["id"].as_i64().unwrap();

    let req = TestRequest::get()
        .uri(&format!("/api/campaigns/{}", client_id))
        .to_request();
    let campaigns: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(campaigns, json!([{"id": campaigns[0]["id"], "name": "Q1"}]));

    // 完整记录需要密钥
    let req = TestRequest::get().uri("/api/clients/full").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = TestRequest::get()
        .uri("/api/clients/full")
        .insert_header((API_KEY_HEADER, TEST_KEY))
        .to_request();
    let full: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(full[0]["company"], "");
}

// =============================================================================
// Pages
// =============================================================================

#[actix_rt::test]
async fn test_client_form_validation_and_flash() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri("/client/new")
        .set_form([("email", "a@b.lt")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let html = body_string(resp).await;
    assert!(html.contains("<code>name</code>"));
    assert!(html.contains("value=\"a@b.lt\""));

    let req = TestRequest::post()
        .uri("/client/new")
        .set_form([("name", "Acme")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/clients");
    let cookie = flash_cookie(&resp).expect("flash cookie set");

    let req = TestRequest::get().uri("/clients").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    // 显示后清除
    let cleared = flash_cookie(&resp).expect("flash cookie cleared");
    assert_eq!(cleared.value(), "");
    let html = body_string(resp).await;
    assert!(html.contains("flash success"));
    assert!(html.contains("Acme") && html.contains("created"));
    assert!(!html.contains("'Acme'"));

    // 重复提交复用已有客户
    let req = TestRequest::post()
        .uri("/client/new")
        .set_form([("name", "Acme")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let cookie = flash_cookie(&resp).expect("flash cookie set");

    let req = TestRequest::get().uri("/clients").cookie(cookie).to_request();
    let html = body_string(test::call_service(&app, req).await).await;
    assert!(html.contains("flash warning"));
    assert!(html.contains("already exists, reused"));
    assert_eq!(
        client::Entity::find()
            .count(ctx.storage.get_db())
            .await
            .unwrap(),
        1
    );
}

#[actix_rt::test]
async fn test_missing_records_render_404() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    for uri in [
        "/screen/999",
        "/provider/999",
        "/dooh-plan/999",
        "/dooh-plan/999/screens",
        "/dooh-plan/999/media-plan",
        "/screen/999/pricing",
        "/static/uploads/missing.png",
    ] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_rt::test]
async fn test_every_listing_renders() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    for uri in [
        "/",
        "/clients",
        "/client/new",
        "/campaigns",
        "/campaign/new",
        "/kampanijos",
        "/providers",
        "/provider/new",
        "/screens",
        "/screen/new",
        "/dooh-plans",
        "/dooh-plan/new",
    ] {
        let req = TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }
}

fn multipart_body(boundary: &str, fields: &[(&str, &str)], image: (&str, &[u8])) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                boundary, name, value
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n",
            boundary, image.0
        )
        .as_bytes(),
    );
    body.extend_from_slice(image.1);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());
    body
}

fn text_part(boundary: &str, name: &str, value: &[u8]) -> Vec<u8> {
    let mut part = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n",
        boundary, name
    )
    .into_bytes();
    part.extend_from_slice(value);
    part.extend_from_slice(b"\r\n");
    part
}

fn screen_multipart(boundary: &str, body: Vec<u8>) -> TestRequest {
    TestRequest::post()
        .uri("/screen/new")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        ))
        .set_payload(body)
}

#[actix_rt::test]
async fn test_screen_multipart_rejects_bad_text_fields() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);
    let boundary = "ekrBoundaryText01";
    let valid = [
        ("provider_id", "1"),
        ("screen_type", "vertical"),
        ("content_type", "static"),
        ("width", "2"),
        ("height", "4"),
        ("city", "Kaunas"),
        ("address", "Laisvės al. 1"),
    ];

    // 非 UTF-8 的名称
    let mut body = text_part(boundary, "name", b"Ekranas \xff\xfe");
    body.extend(multipart_body(boundary, &valid, ("front.png", b"png")));
    let resp = test::call_service(&app, screen_multipart(boundary, body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let html = body_string(resp).await;
    assert!(html.contains("<code>name</code>"));
    assert!(html.contains("not valid UTF-8"));

    // 超过表单上限的文本字段
    let long_comment = vec![b'x'; ekranu_crm::api::services::pages::FORM_LIMIT + 1];
    let mut body = text_part(boundary, "comment", &long_comment);
    body.extend(multipart_body(boundary, &valid, ("front.png", b"png")));
    let resp = test::call_service(&app, screen_multipart(boundary, body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let html = body_string(resp).await;
    assert!(html.contains("<code>comment</code>"));

    assert_eq!(
        screen::Entity::find()
            .count(ctx.storage.get_db())
            .await
            .unwrap(),
        0
    );
}

#[actix_rt::test]
async fn test_plan_detail_totals_large_slot_counts() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri("/provider/new")
        .set_form([("name", "JCDecaux")])
        .to_request();
    test::call_service(&app, req).await;
    let provider_id = ctx.screen_service.list_providers().await.unwrap()[0].id;

    let screen = ekranu_crm::services::forms::parse_screen_form(
        &[
            ("provider_id", provider_id.to_string()),
            ("name", "S1".to_string()),
            ("screen_type", "horizontal".to_string()),
            ("content_type", "video".to_string()),
            ("width", "6".to_string()),
            ("height", "3".to_string()),
            ("city", "Vilnius".to_string()),
            ("address", "Gedimino pr. 9".to_string()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect(),
    )
    .unwrap();
    let s1 = ctx.screen_service.create_screen(screen, None).await.unwrap().screen;

    let req = TestRequest::post()
        .uri("/dooh-plan/new")
        .set_form([
            ("client_type", "new"),
            ("new_client_name", "Acme"),
            ("campaign_type", "new"),
            ("new_campaign_name", "Q1"),
            ("name", "Big Push"),
            ("start_date", "2025-01-01"),
            ("end_date", "2025-01-31"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    let plan_uri = location(&resp).trim_end_matches("/screens").to_string();

    let req = TestRequest::post()
        .uri(&format!("{}/add-screen/{}", plan_uri, s1.id))
        .to_request();
    test::call_service(&app, req).await;

    let db = ctx.storage.get_db();
    let booking = screen_booking::Entity::find()
        .filter(screen_booking::Column::ScreenId.eq(s1.id))
        .one(db)
        .await
        .unwrap()
        .expect("booking created");
    for hour in [8, 9] {
        screen_slot::ActiveModel {
            booking_id: Set(booking.id),
            date: Set(chrono::NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()),
            hour: Set(hour),
            slots_purchased: Set(i32::MAX),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();
    }

    let req = TestRequest::get().uri(&plan_uri).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("4294967294"));
}

#[actix_rt::test]
async fn test_screen_upload_and_booking_flow() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri("/provider/new")
        .set_form([("name", "JCDecaux")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let provider_id = ctx.screen_service.list_providers().await.unwrap()[0].id.to_string();

    let boundary = "ekrBoundary7MA4YWxk";
    let body = multipart_body(
        boundary,
        &[
            ("provider_id", provider_id.as_str()),
            ("name", "S1"),
            ("screen_type", "vertical"),
            ("content_type", "static"),
            ("width", "2.5"),
            ("height", "4"),
            ("city", "Kaunas"),
            ("address", "Laisvės al. 1"),
            ("gps_coordinates", "not-a-coordinate"),
        ],
        ("front.png", b"\x89PNG fake"),
    );
    let req = TestRequest::post()
        .uri("/screen/new")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        ))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/screens");
    let cookie = flash_cookie(&resp).expect("flash cookie set");
    assert!(cookie.value().starts_with("success:"));
    assert!(cookie.value().contains(",warning:"));

    let s1 = screen::Entity::find()
        .one(ctx.storage.get_db())
        .await
        .unwrap()
        .expect("screen created");
    assert!(s1.gps_latitude.is_none());
    let image_path = s1.image_path.clone().expect("image stored");

    let req = TestRequest::get()
        .uri(&format!("/static/{}", image_path))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(CONTENT_TYPE).unwrap(), "image/png");
    assert_eq!(test::read_body(resp).await.as_ref(), b"\x89PNG fake");

    // 价格
    let req = TestRequest::post()
        .uri(&format!("/screen/{}/pricing", s1.id))
        .set_form([("price_8", "10"), ("contacts_8", "900"), ("price_9", "-1")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = TestRequest::post()
        .uri(&format!("/screen/{}/pricing", s1.id))
        .set_form([("price_8", "10"), ("contacts_8", "900")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/screen/{}", s1.id));

    // 计划
    let req = TestRequest::post()
        .uri("/dooh-plan/new")
        .set_form([
            ("client_type", "new"),
            ("new_client_name", "Acme"),
            ("campaign_type", "new"),
            ("new_campaign_name", "Q1"),
            ("name", "Billboard Push"),
            ("start_date", "2025-01-01"),
            ("end_date", "2025-01-31"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let screens_uri = location(&resp);
    assert!(screens_uri.ends_with("/screens"));
    let plan_uri = screens_uri.trim_end_matches("/screens").to_string();

    let add_uri = format!("{}/add-screen/{}", plan_uri, s1.id);
    for expected in ["success:", "warning:"] {
        let req = TestRequest::post().uri(&add_uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), screens_uri);
        assert!(flash_cookie(&resp).unwrap().value().starts_with(expected));
    }
    assert_eq!(
        screen_booking::Entity::find()
            .count(ctx.storage.get_db())
            .await
            .unwrap(),
        1
    );

    let req = TestRequest::get().uri(&screens_uri).to_request();
    let html = body_string(test::call_service(&app, req).await).await;
    assert!(html.contains("Already added"));

    let req = TestRequest::get()
        .uri(&format!("{}/media-plan", plan_uri))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("S1"));
    assert!(html.contains("No time slots booked."));
}

#[actix_rt::test]
async fn test_plan_form_errors_rerender() {
    let (_dir, ctx) = setup().await;
    let app = app!(ctx);

    let req = TestRequest::post()
        .uri("/dooh-plan/new")
        .set_form([
            ("client_type", "new"),
            ("new_client_name", "Acme"),
            ("campaign_type", "new"),
            ("new_campaign_name", "Q1"),
            ("name", "Plan"),
            ("start_date", "2025-02-01"),
            ("end_date", "yesterday"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let html = body_string(resp).await;
    assert!(html.contains("<code>end_date</code>"));
    assert_eq!(
        client::Entity::find()
            .count(ctx.storage.get_db())
            .await
            .unwrap(),
        0
    );
}
