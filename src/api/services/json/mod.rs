//! JSON API：下拉框查询与伙伴系统导入

pub mod error_code;
mod handlers;
mod helpers;
pub mod routes;
mod types;

pub use error_code::ErrorCode;
pub use helpers::{api_result, error_from_crm, json_ok};
pub use routes::api_routes;
pub use types::*;
