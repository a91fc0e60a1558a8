// ==========================================
// 易腐库存管理 - API 层
// ==========================================
// 职责: 提供业务 API 接口，供外部路由/CLI 调用
// ==========================================

pub mod error;
pub mod expiration_api;
pub mod import_api;
pub mod product_api;
pub mod validator;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use expiration_api::ExpirationApi;
pub use import_api::{ImportApi, UploadRequest, UploadResponse};
pub use product_api::{CreateEntryRequest, ProductApi};
pub use validator::{require_authenticated, require_moderator};
