// ==========================================
// 易腐库存管理 - 应用层
// ==========================================
// 职责: 装配仓储、配置与 API
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
