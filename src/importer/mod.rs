// ==========================================
// 易腐库存管理 - 导入层
// ==========================================
// 职责: 商品目录 CSV → 商品记录 + 上传记录
// 支持: 供应商导出格式（Material/Texto breve）、通用表头格式
// ==========================================

// 模块声明
pub mod catalog_parser;
pub mod conflict_handler;
pub mod data_cleaner;
pub mod delimiter;
pub mod diagnostics;
pub mod error;
pub mod field_mapper;
pub mod format_detector;
pub mod inventory_importer_impl;
pub mod inventory_importer_trait;
pub mod outcome;
pub mod record_extractor;

// 重导出核心类型
pub use catalog_parser::{parse_inventory_csv, parse_with_mapper, ParsedCatalog};
pub use conflict_handler::{ConflictHandler as ConflictHandlerImpl, DedupKey, Partitioned};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use delimiter::Delimiter;
pub use diagnostics::{
    ImportDiagnostic, ImportEvent, ImportObserver, NoOpObserver, SkipReason, TracingObserver,
};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper as FieldMapperImpl, MappedRows};
pub use format_detector::{FormatDecision, FormatDetector, FormatMode, GenericColumns};
pub use inventory_importer_impl::InventoryImporterImpl;
pub use outcome::{ImportOutcome, ImportSummary};
pub use record_extractor::{RecordExtractor, SourceRow};

// 重导出 Trait 接口
pub use inventory_importer_trait::{ConflictHandler, DataCleaner, FieldMapper, InventoryImporter};
