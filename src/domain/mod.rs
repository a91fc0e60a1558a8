// ==========================================
// 易腐库存管理 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、读时视图
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod expiration;
pub mod product;
pub mod product_entry;
pub mod types;
pub mod upload;

// 重导出核心类型
pub use expiration::{ExpirationSummary, ProductWithExpiration};
pub use product::{NewProduct, Product, ProductCandidate};
pub use product_entry::{NewProductEntry, ProductEntry, DEFAULT_ENTRY_QUANTITY};
pub use types::{Caller, FreshnessTier, UploadStatus, UserRole};
pub use upload::{InventoryUpload, NewInventoryUpload};
