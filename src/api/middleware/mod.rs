pub mod api_key;
pub mod request_id;
pub mod timing;

pub use api_key::ApiKeyAuth;
pub use request_id::{RequestId, RequestIdMiddleware};
pub use timing::TimingMiddleware;
