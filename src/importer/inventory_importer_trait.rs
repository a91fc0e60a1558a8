// ==========================================
// 易腐库存管理 - 库存导入 Trait
// ==========================================
// 职责: 定义导入接口（不包含实现）
// ==========================================

use crate::domain::product::ProductCandidate;
use crate::importer::conflict_handler::Partitioned;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::MappedRows;
use crate::importer::format_detector::FormatDecision;
use crate::importer::outcome::ImportOutcome;
use crate::importer::record_extractor::SourceRow;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::path::Path;

// ==========================================
// InventoryImporter Trait
// ==========================================
// 用途: 库存导入主接口
// 实现者: InventoryImporterImpl
#[async_trait]
pub trait InventoryImporter: Send + Sync {
    /// 从 CSV 文本导入商品目录
    ///
    /// # 参数
    /// - text: 原始 CSV 文本
    /// - filename: 上传文件名（写入上传记录）
    /// - uploaded_by: 上传人用户 ID
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 上传记录、新建商品、诊断、汇总
    /// - Err: 缺少名称列、数据库错误等（此时不落任何数据）
    ///
    /// # 导入流程
    /// 1. 格式识别（分隔符 / 表头 / 模式）
    /// 2. 字段映射（跳过行写入诊断）
    /// 3. 文件内去重（可配置）
    /// 4. 与库存比对
    /// 5. 批量插入，失败后逐行插入
    /// 6. 写入上传记录
    async fn import_csv_text(
        &self,
        text: &str,
        filename: &str,
        uploaded_by: i64,
    ) -> ImportResult<ImportOutcome>;

    /// 从 CSV 文件导入（文件名取路径末段）
    async fn import_csv_file(&self, path: &Path, uploaded_by: i64) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 源行 → 候选商品
// 实现者: field_mapper::FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 按解析决策映射全部数据行
    ///
    /// 表头行由 decision 过滤；被跳过的行进入 MappedRows.diagnostics
    fn map_rows(&self, decision: &FormatDecision, rows: &[SourceRow]) -> MappedRows;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 字段清洗与判定
// 实现者: data_cleaner::DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 去除首尾空白
    fn clean_text(&self, value: &str) -> String;

    /// 空字符串 → None
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 数值判定（空串、NaN、无穷均视为非数值）
    fn is_numeric(&self, value: &str) -> bool;

    /// 纯数字判定（仅 ASCII 数字，至少一位）
    fn is_all_digits(&self, value: &str) -> bool;

    /// 解析效期日期（YYYY-MM-DD / ISO 时间戳 / dd/MM/yyyy）
    fn parse_expiration_date(&self, value: &str) -> ImportResult<NaiveDate>;
}

// ==========================================
// ConflictHandler Trait
// ==========================================
// 用途: 重复检测
// 实现者: conflict_handler::ConflictHandler
pub trait ConflictHandler: Send + Sync {
    /// 检测文件内重复名称，返回 (行号, 名称)（不含首次出现）
    fn detect_duplicates(&self, candidates: &[ProductCandidate]) -> Vec<(u64, String)>;

    /// 按库中已存在的名称/编码拆分候选
    fn partition_existing(
        &self,
        candidates: Vec<ProductCandidate>,
        existing_names: &HashSet<String>,
        existing_codes: &HashSet<String>,
    ) -> Partitioned;
}
