//! Typed decoding of the HTML forms
//!
//! Each parser validates presence and type of every field before any record
//! is built and reports all offending fields in one `CrmError::Validation`.

use crate::errors::Result;
use crate::storage::models::{
    ContentType, NewCampaign, NewClient, NewPlan, NewProvider, NewScreen, PricingEntry,
    ScreenType,
};
use crate::utils::{FormFields, FormReader};

pub const HOURS_PER_DAY: i32 = 24;

/// 使用已有客户，或内联创建新客户
#[derive(Debug, Clone, PartialEq)]
pub enum ClientChoice {
    Existing(i32),
    New(NewClient),
}

/// 使用已有活动、新建活动，或由 kampanija 派生
#[derive(Debug, Clone, PartialEq)]
pub enum CampaignChoice {
    Existing(i32),
    New(NewCampaign),
    FromKampanija(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CampaignForm {
    pub client: ClientChoice,
    pub campaign: NewCampaign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenForm {
    /// `gps` 为空，坐标由 `gps_text` 单独解析
    pub screen: NewScreen,
    pub gps_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanForm {
    pub client: ClientChoice,
    pub campaign: CampaignChoice,
    pub plan: NewPlan,
}

/// `/client/new`
pub fn parse_client_form(fields: &FormFields) -> Result<NewClient> {
    let mut form = FormReader::new(fields);
    let client = NewClient {
        name: form.required_text("name"),
        email: form.text_or_empty("email"),
        phone: form.text_or_empty("phone"),
        contact_person: form.text_or_empty("contact_person"),
        company: form.text_or_empty("company"),
        external_id: None,
    };
    form.finish()?;
    Ok(client)
}

/// `client_type=new|existing` 以及 `new_client_*` / `existing_client_id`
fn read_client_choice(form: &mut FormReader<'_>) -> ClientChoice {
    match form.text("client_type").unwrap_or("existing") {
        "new" => ClientChoice::New(NewClient {
            name: form.required_text("new_client_name"),
            email: form.text_or_empty("new_client_email"),
            phone: form.text_or_empty("new_client_phone"),
            contact_person: form.text_or_empty("new_client_contact"),
            company: form.text_or_empty("new_client_company"),
            external_id: None,
        }),
        "existing" => ClientChoice::Existing(form.required_id("existing_client_id")),
        _ => {
            form.push_error("client_type", "must be one of: new, existing");
            ClientChoice::Existing(0)
        }
    }
}

fn check_date_order(
    form: &mut FormReader<'_>,
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
    end_field: &str,
) {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        form.push_error(end_field, "must not be before the start date");
    }
}

/// `/campaign/new`
pub fn parse_campaign_form(fields: &FormFields) -> Result<CampaignForm> {
    let mut form = FormReader::new(fields);
    let client = read_client_choice(&mut form);

    let campaign = NewCampaign {
        name: form.required_text("name"),
        description: form.optional_text("description"),
        start_date: form.optional_date("start_date"),
        end_date: form.optional_date("end_date"),
        budget: form.optional_f64("budget"),
    };
    check_date_order(&mut form, campaign.start_date, campaign.end_date, "end_date");

    form.finish()?;
    Ok(CampaignForm { client, campaign })
}

/// `/provider/new`
pub fn parse_provider_form(fields: &FormFields) -> Result<NewProvider> {
    let mut form = FormReader::new(fields);
    let provider = NewProvider {
        name: form.required_text("name"),
        email: form.text_or_empty("email"),
        phone: form.text_or_empty("phone"),
        contact_person: form.text_or_empty("contact_person"),
    };
    form.finish()?;
    Ok(provider)
}

/// `/screen/new`（multipart 中的文本字段）
pub fn parse_screen_form(fields: &FormFields) -> Result<ScreenForm> {
    let mut form = FormReader::new(fields);

    let provider_id = form.required_id("provider_id");
    let name = form.required_text("name");
    let screen_type = form.required_choice::<ScreenType>("screen_type", "horizontal, vertical");
    let content_type = form.required_choice::<ContentType>("content_type", "video, static");

    let width = form.required_f64("width");
    let height = form.required_f64("height");
    for (field, value) in [("width", width), ("height", height)] {
        if value < 0.0 {
            form.push_error(field, "must not be negative");
        }
    }

    let pixel_width = form.optional_i32("pixel_width");
    let pixel_height = form.optional_i32("pixel_height");
    let city = form.required_text("city");
    let address = form.required_text("address");

    let side = form.optional_text("side");
    if side.as_ref().is_some_and(|s| s.chars().count() > 10) {
        form.push_error("side", "must be at most 10 characters");
    }

    let position_description = form.optional_text("position_description");
    let comment = form.optional_text("comment");
    let pixel_comment = form.optional_text("pixel_comment");
    let gps_text = form.text_or_empty("gps_coordinates");

    form.finish()?;

    Ok(ScreenForm {
        screen: NewScreen {
            provider_id,
            name,
            image_path: None,
            position_description,
            comment,
            // finish() 已保证两者存在
            screen_type: screen_type.unwrap_or(ScreenType::Horizontal),
            content_type: content_type.unwrap_or(ContentType::Video),
            width,
            height,
            pixel_width,
            pixel_height,
            pixel_comment,
            gps: None,
            city,
            address,
            side,
        },
        gps_text,
    })
}

/// `/screen/{id}/pricing`
///
/// 小时 h 只有在 `price_{h}` 与 `contacts_{h}` 都非空时才产生一行；
/// 任一字段无法解析时报告该字段。
pub fn parse_pricing_form(fields: &FormFields) -> Result<Vec<PricingEntry>> {
    let mut form = FormReader::new(fields);
    let mut entries = Vec::new();

    for hour in 0..HOURS_PER_DAY {
        let price_field = format!("price_{}", hour);
        let contacts_field = format!("contacts_{}", hour);

        let price = form.optional_f64(&price_field);
        let contacts = form.optional_i32(&contacts_field);

        if let Some(p) = price
            && p < 0.0
        {
            form.push_error(&price_field, "must not be negative");
        }
        if let Some(c) = contacts
            && c < 0
        {
            form.push_error(&contacts_field, "must not be negative");
        }

        if let (Some(price), Some(contact_count)) = (price, contacts) {
            entries.push(PricingEntry {
                hour,
                price_per_thousand_contacts: price,
                contact_count,
            });
        }
    }

    form.finish()?;
    Ok(entries)
}

/// `/dooh-plan/new`
pub fn parse_plan_form(fields: &FormFields) -> Result<PlanForm> {
    let mut form = FormReader::new(fields);
    let client = read_client_choice(&mut form);

    let campaign = match form.text("campaign_type").unwrap_or("existing") {
        "new" => {
            let campaign = NewCampaign {
                name: form.required_text("new_campaign_name"),
                description: form.optional_text("new_campaign_description"),
                start_date: form.optional_date("campaign_start_date"),
                end_date: form.optional_date("campaign_end_date"),
                budget: form.optional_f64("new_campaign_budget"),
            };
            check_date_order(
                &mut form,
                campaign.start_date,
                campaign.end_date,
                "campaign_end_date",
            );
            CampaignChoice::New(campaign)
        }
        "existing" => CampaignChoice::Existing(form.required_id("existing_campaign_id")),
        "kampanija" => CampaignChoice::FromKampanija(form.required_id("kampanija_id")),
        _ => {
            form.push_error("campaign_type", "must be one of: new, existing, kampanija");
            CampaignChoice::Existing(0)
        }
    };

    let plan = NewPlan {
        name: form.required_text("name"),
        start_date: form.required_date("start_date"),
        end_date: form.required_date("end_date"),
    };
    if !form.has_errors() {
        check_date_order(
            &mut form,
            Some(plan.start_date),
            Some(plan.end_date),
            "end_date",
        );
    }

    form.finish()?;
    Ok(PlanForm {
        client,
        campaign,
        plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CrmError;
    use chrono::NaiveDate;

    fn fields(pairs: &[(&str, &str)]) -> FormFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn error_fields(err: CrmError) -> Vec<String> {
        err.field_errors().iter().map(|e| e.field.clone()).collect()
    }

    #[test]
    fn test_client_form_only_name() {
        let client = parse_client_form(&fields(&[("name", "Acme")])).unwrap();
        assert_eq!(client, NewClient::named("Acme"));
    }

    #[test]
    fn test_client_form_requires_name() {
        let err = parse_client_form(&fields(&[("email", "a@b.lt")])).unwrap_err();
        assert_eq!(error_fields(err), vec!["name"]);
    }

    #[test]
    fn test_screen_form_reports_all_missing_fields() {
        let err = parse_screen_form(&fields(&[("name", "Gedimino 9"), ("width", "x")]))
            .unwrap_err();
        assert_eq!(
            error_fields(err),
            vec![
                "provider_id",
                "screen_type",
                "content_type",
                "width",
                "height",
                "city",
                "address"
            ]
        );
    }

    #[test]
    fn test_screen_form_valid() {
        let form = parse_screen_form(&fields(&[
            ("provider_id", "1"),
            ("name", "Gedimino 9"),
            ("screen_type", "vertical"),
            ("content_type", "static"),
            ("width", "2.5"),
            ("height", "4"),
            ("pixel_width", ""),
            ("city", "Vilnius"),
            ("address", "Gedimino pr. 9"),
            ("side", "D"),
            ("gps_coordinates", "54.6872, 25.2797"),
        ]))
        .unwrap();
        assert_eq!(form.screen.screen_type, ScreenType::Vertical);
        assert_eq!(form.screen.content_type, ContentType::Static);
        assert_eq!(form.screen.pixel_width, None);
        assert_eq!(form.screen.side.as_deref(), Some("D"));
        assert_eq!(form.gps_text, "54.6872, 25.2797");
    }

    #[test]
    fn test_screen_form_rejects_unknown_type() {
        let err = parse_screen_form(&fields(&[
            ("provider_id", "1"),
            ("name", "A"),
            ("screen_type", "diagonal"),
            ("content_type", "video"),
            ("width", "1"),
            ("height", "1"),
            ("city", "Kaunas"),
            ("address", "Laisvės al. 1"),
        ]))
        .unwrap_err();
        assert_eq!(error_fields(err), vec!["screen_type"]);
    }

    #[test]
    fn test_pricing_form_skips_incomplete_hours() {
        let entries = parse_pricing_form(&fields(&[
            ("price_0", "12.5"),
            ("contacts_0", "1000"),
            ("price_1", "10"),
            ("contacts_1", ""),
            ("contacts_2", "500"),
            ("price_23", "3"),
            ("contacts_23", "40"),
        ]))
        .unwrap();
        let hours: Vec<i32> = entries.iter().map(|e| e.hour).collect();
        assert_eq!(hours, vec![0, 23]);
        assert_eq!(entries[0].price_per_thousand_contacts, 12.5);
        assert_eq!(entries[0].contact_count, 1000);
    }

    #[test]
    fn test_pricing_form_reports_every_bad_hour() {
        let err = parse_pricing_form(&fields(&[
            ("price_3", "abc"),
            ("contacts_3", "10"),
            ("price_4", "1"),
            ("contacts_4", "1.5"),
        ]))
        .unwrap_err();
        assert_eq!(error_fields(err), vec!["price_3", "contacts_4"]);
    }

    #[test]
    fn test_plan_form_new_client_new_campaign() {
        let form = parse_plan_form(&fields(&[
            ("client_type", "new"),
            ("new_client_name", "Acme"),
            ("campaign_type", "new"),
            ("new_campaign_name", "Q1"),
            ("new_campaign_budget", "5000"),
            ("name", "Billboard Push"),
            ("start_date", "2025-01-01"),
            ("end_date", "2025-01-31"),
        ]))
        .unwrap();
        assert!(matches!(form.client, ClientChoice::New(ref c) if c.name == "Acme"));
        assert!(matches!(
            form.campaign,
            CampaignChoice::New(ref c) if c.name == "Q1" && c.budget == Some(5000.0)
        ));
        assert_eq!(
            form.plan.start_date,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
    }

    #[test]
    fn test_plan_form_kampanija_choice() {
        let form = parse_plan_form(&fields(&[
            ("existing_client_id", "3"),
            ("campaign_type", "kampanija"),
            ("kampanija_id", "9"),
            ("name", "Plan"),
            ("start_date", "2025-02-01"),
            ("end_date", "2025-02-02"),
        ]))
        .unwrap();
        assert_eq!(form.client, ClientChoice::Existing(3));
        assert_eq!(form.campaign, CampaignChoice::FromKampanija(9));
    }

    #[test]
    fn test_plan_form_bad_dates() {
        let err = parse_plan_form(&fields(&[
            ("existing_client_id", "1"),
            ("existing_campaign_id", "1"),
            ("name", "Plan"),
            ("start_date", "01/02/2025"),
        ]))
        .unwrap_err();
        assert_eq!(error_fields(err), vec!["start_date", "end_date"]);

        let err = parse_plan_form(&fields(&[
            ("existing_client_id", "1"),
            ("existing_campaign_id", "1"),
            ("name", "Plan"),
            ("start_date", "2025-03-01"),
            ("end_date", "2025-02-01"),
        ]))
        .unwrap_err();
        assert_eq!(error_fields(err), vec!["end_date"]);
    }
}
