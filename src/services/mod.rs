//! Service layer for business logic
//!
//! Each service wraps the shared storage and is handed to the HTTP layer
//! through `web::Data`. Operations that write more than one row open a
//! transaction and commit it once at the end.

mod client_service;
pub mod forms;
mod import_service;
mod plan_service;
mod pricing_service;
mod screen_service;

pub use client_service::ClientService;
pub use forms::{CampaignChoice, CampaignForm, ClientChoice, PlanForm, ScreenForm};
pub use import_service::{ImportReport, ImportService};
pub use plan_service::{AddScreenOutcome, PlanCreated, PlanService, kampanija_display_name};
pub use pricing_service::{PricingService, PricingTable};
pub use screen_service::{ScreenCreated, ScreenService, UploadedImage};
