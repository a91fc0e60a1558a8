// ==========================================
// 易腐库存管理 - 记录提取器
// ==========================================
// 职责: 文本 → 行/列（去空白、丢弃空行）+ 表头识别
// 工具: csv crate（不识别引号，允许变长行）
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::delimiter::Delimiter;
use crate::importer::error::ImportResult;
use crate::importer::inventory_importer_trait::DataCleaner as DataCleanerTrait;
use serde::{Deserialize, Serialize};

/// 一行源数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRow {
    pub line: u64,           // 源文件行号（1 起）
    pub fields: Vec<String>, // 已去空白的字段
}

impl SourceRow {
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

pub struct RecordExtractor;

impl RecordExtractor {
    /// 按分隔符切分文本
    ///
    /// # 规则
    /// - 兼容 `\n` 与 `\r\n` 换行
    /// - 每个字段去除首尾空白
    /// - 所有字段均为空的行整行丢弃
    pub fn extract(text: &str, delimiter: Delimiter) -> ImportResult<Vec<SourceRow>> {
        let cleaner = DataCleaner;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(csv::Trim::All)
            .delimiter(delimiter.as_byte())
            .from_reader(text.as_bytes());

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let fields: Vec<String> = record.iter().map(|f| cleaner.clean_text(f)).collect();
            if fields.iter().all(|f| f.is_empty()) {
                continue;
            }
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(idx as u64 + 1);
            rows.push(SourceRow { line, fields });
        }

        Ok(rows)
    }

    /// 表头识别: 首行含非数值字段即视为表头
    ///
    /// 以首列（编码列）为准: 首列为数值的行按数据行处理，
    /// 例如 `["123","abc"]` 是数据、`["codigo","nome"]` 是表头。
    /// 纯数值的无表头导出会被当作数据行，这是已知边界情况
    pub fn detect_header(first_row: &[String]) -> bool {
        let cleaner = DataCleaner;
        match first_row.first() {
            Some(leading) => !cleaner.is_numeric(leading),
            None => false,
        }
    }
}
