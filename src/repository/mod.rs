// ==========================================
// 易腐库存管理 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽数据库细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod product_entry_repo;
pub mod product_import_repo;
pub mod product_import_repo_impl;
pub mod product_repo;
pub mod upload_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use product_entry_repo::ProductEntryRepository;
pub use product_import_repo::ProductImportRepository;
pub use product_import_repo_impl::ProductImportRepositoryImpl;
pub use product_repo::ProductRepository;
pub use upload_repo::InventoryUploadRepository;
