//! Client side of the remote configuration API.
//!
//! Five calls, all authenticated with the session's [`ApiKey`]. Responses
//! are decoded leniently; any non-2xx status becomes an [`ApiError`]
//! carrying the status text.

pub mod error;
pub mod http;
pub mod model;

pub use error::{ApiError, ApiResult, Operation};
pub use http::HttpApi;
pub use model::{AllowableStatuses, ConfigNode, ParentFilter, Part, PartUpdate, ROOT_PARENT};

use crate::session::ApiKey;

pub const API_KEY_HEADER: &str = "x-api-key";

pub trait ConfigApi: Send + Sync {
    /// `GET /api/health`.
    fn health_check(&self, key: &ApiKey) -> ApiResult<serde_json::Value>;

    /// `GET /api/configs/children`, filtered by parent unless listing roots.
    fn get_configuration(&self, key: &ApiKey, parent: &ParentFilter)
    -> ApiResult<Vec<ConfigNode>>;

    fn get_part(&self, key: &ApiKey, part_uuid: &str) -> ApiResult<Part>;

    fn get_allowed_statuses(&self, key: &ApiKey, part_uuid: &str)
    -> ApiResult<AllowableStatuses>;

    fn update_part(&self, key: &ApiKey, part_uuid: &str, update: &PartUpdate)
    -> ApiResult<Part>;
}
