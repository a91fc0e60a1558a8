// ==========================================
// 易腐库存管理 - 引擎层
// ==========================================
// 职责: 效期分级与汇总，不拼 SQL
// 红线: Engine 不访问数据库，输入输出均为领域对象
// ==========================================

pub mod expiration;
pub mod summary;

// 重导出核心引擎
pub use expiration::{ExpirationClassifier, ATTENTION_MAX_DAYS, VENCENDO_MAX_DAYS};
pub use summary::ExpirationAggregator;
