// ==========================================
// 易腐库存管理 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 商品目录 CSV 导入 + 批次效期分级
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "pt-BR");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 效期分级与汇总
pub mod engine;

// 导入层 - CSV 商品目录
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA/建表）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{Caller, FreshnessTier, UploadStatus, UserRole};

// 领域实体
pub use domain::{
    ExpirationSummary, InventoryUpload, Product, ProductEntry, ProductWithExpiration,
};

// 引擎
pub use engine::{ExpirationAggregator, ExpirationClassifier};

// 导入
pub use importer::{parse_inventory_csv, InventoryImporter, InventoryImporterImpl};

// API
pub use api::{ExpirationApi, ImportApi, ProductApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "易腐库存管理";
