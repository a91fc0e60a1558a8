// ==========================================
// 易腐库存管理 - 导入结果
// ==========================================

use crate::domain::product::Product;
use crate::domain::upload::InventoryUpload;
use crate::importer::diagnostics::ImportDiagnostic;
use serde::{Deserialize, Serialize};

/// 导入汇总
///
/// inserted 始终等于上传记录的 products_count，与文件行数无关
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,        // 数据行数
    pub candidates: usize,        // 映射成功的候选数
    pub skipped_rows: usize,      // 映射阶段跳过
    pub duplicates_in_file: usize,
    pub existing: usize,          // 库中已存在
    pub inserted: usize,
    pub failed: usize,            // 逐行插入失败
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub run_id: String,
    pub upload: InventoryUpload,
    pub created: Vec<Product>,
    pub diagnostics: Vec<ImportDiagnostic>,
    pub summary: ImportSummary,
    pub elapsed_ms: u128,
}

impl ImportOutcome {
    pub fn products_count(&self) -> usize {
        self.created.len()
    }
}
