// ==========================================
// 易腐库存管理 - 格式识别（解析决策）
// ==========================================
// 职责: 一次性产出 FormatDecision（分隔符 + 表头 + 模式），
//       下游各阶段只读决策，不再回看原始文本
// ==========================================
// 模式:
// - Vendor: 固定三列（编码, 名称, 数量备注）
// - Generic: 按表头同义词定位 名称/编码/分类 列，数据行固定按逗号切分
// ==========================================

use crate::importer::data_cleaner::DataCleaner;
use crate::importer::delimiter::Delimiter;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::inventory_importer_trait::DataCleaner as DataCleanerTrait;
use crate::importer::record_extractor::{RecordExtractor, SourceRow};
use serde::{Deserialize, Serialize};

// ===== 表头同义词（小写精确匹配） =====
pub const NAME_SYNONYMS: &[&str] = &["name", "nome", "produto", "descrição", "descricao"];
pub const CODE_SYNONYMS: &[&str] = &["code", "codigo", "sku", "id", "material"];
pub const CATEGORY_SYNONYMS: &[&str] = &["category", "categoria", "tipo", "grupo"];

/// 通用模式下定位到的列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericColumns {
    pub name: usize,
    pub code: Option<usize>,
    pub category: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatMode {
    Vendor,
    Generic(GenericColumns),
}

impl FormatMode {
    pub fn label(&self) -> &'static str {
        match self {
            FormatMode::Vendor => "VENDOR",
            FormatMode::Generic(_) => "GENERIC",
        }
    }
}

/// 解析决策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDecision {
    pub delimiter: Delimiter, // 全文识别出的分隔符
    pub has_header: bool,
    pub header_line: u64,     // 首个非空行的源行号
    pub mode: FormatMode,
}

impl FormatDecision {
    /// 数据行切分所用分隔符（通用模式固定为逗号）
    pub fn row_delimiter(&self) -> Delimiter {
        match self.mode {
            FormatMode::Vendor => self.delimiter,
            FormatMode::Generic(_) => Delimiter::Comma,
        }
    }

    /// 判断源行是否为数据行
    pub fn is_data_line(&self, line: u64) -> bool {
        !self.has_header || line > self.header_line
    }
}

pub struct FormatDetector;

impl FormatDetector {
    /// 从原始文本产出解析决策
    pub fn decide(text: &str) -> ImportResult<FormatDecision> {
        let delimiter = Delimiter::detect(text);
        let rows = RecordExtractor::extract(text, delimiter)?;
        Self::decide_from_rows(delimiter, &rows)
    }

    /// 基于已切分的行产出决策
    pub fn decide_from_rows(delimiter: Delimiter, rows: &[SourceRow]) -> ImportResult<FormatDecision> {
        let first = rows.first().ok_or(ImportError::EmptyFile)?;
        let header: Vec<String> = first.fields.iter().map(|h| h.to_lowercase()).collect();

        if Self::is_vendor_layout(&header, rows.get(1)) {
            return Ok(FormatDecision {
                delimiter,
                has_header: RecordExtractor::detect_header(&first.fields),
                header_line: first.line,
                mode: FormatMode::Vendor,
            });
        }

        let columns = Self::locate_columns(&header).ok_or_else(|| ImportError::MissingNameColumn {
            header: first.fields.join(","),
        })?;

        // 通用模式首行恒为表头
        Ok(FormatDecision {
            delimiter,
            has_header: true,
            header_line: first.line,
            mode: FormatMode::Generic(columns),
        })
    }

    /// 供应商格式信号: 表头含 "material" / "texto"，或第二行首列为纯数字
    fn is_vendor_layout(header: &[String], second_row: Option<&SourceRow>) -> bool {
        let cleaner = DataCleaner;
        let header_signal = header
            .iter()
            .any(|h| h == "material" || h.contains("texto"));
        let second_row_signal = second_row
            .and_then(|row| row.field(0))
            .map(|code| cleaner.is_all_digits(code))
            .unwrap_or(false);
        header_signal || second_row_signal
    }

    /// 同义词定位列（取第一个命中）
    pub fn locate_columns(header: &[String]) -> Option<GenericColumns> {
        let find = |synonyms: &[&str]| header.iter().position(|h| synonyms.contains(&h.as_str()));
        let name = find(NAME_SYNONYMS)?;
        Some(GenericColumns {
            name,
            code: find(CODE_SYNONYMS),
            category: find(CATEGORY_SYNONYMS),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_by_header_token() {
        let text = "Material;Texto breve material;Utilização livre\n1001;Leite Integral;50";
        let decision = FormatDetector::decide(text).unwrap();

        assert_eq!(decision.delimiter, Delimiter::Semicolon);
        assert_eq!(decision.mode, FormatMode::Vendor);
        assert!(decision.has_header);
        assert_eq!(decision.row_delimiter(), Delimiter::Semicolon);
        assert!(!decision.is_data_line(1));
        assert!(decision.is_data_line(2));
    }

    #[test]
    fn test_vendor_by_numeric_second_row() {
        let text = "Cod\tDescricao\n1001\tLeite";
        let decision = FormatDetector::decide(text).unwrap();
        assert_eq!(decision.mode, FormatMode::Vendor);
        assert_eq!(decision.delimiter, Delimiter::Tab);
    }

    #[test]
    fn test_vendor_headerless_starts_at_first_row() {
        let text = "1001;Leite;50\n1002;Queijo;30";
        let decision = FormatDetector::decide(text).unwrap();
        assert_eq!(decision.mode, FormatMode::Vendor);
        assert!(!decision.has_header);
        assert!(decision.is_data_line(1));
    }

    #[test]
    fn test_generic_locates_columns() {
        let text = "Categoria,Nome,SKU\nLaticinios,Leite,A-1";
        let decision = FormatDetector::decide(text).unwrap();

        assert_eq!(
            decision.mode,
            FormatMode::Generic(GenericColumns {
                name: 1,
                code: Some(2),
                category: Some(0),
            })
        );
        assert_eq!(decision.row_delimiter(), Delimiter::Comma);
    }

    #[test]
    fn test_generic_semicolon_header_still_splits_rows_by_comma() {
        let text = "nome;tipo\nLeite,Laticinio";
        let decision = FormatDetector::decide(text).unwrap();

        assert_eq!(decision.delimiter, Delimiter::Semicolon);
        assert_eq!(decision.row_delimiter(), Delimiter::Comma);
    }

    #[test]
    fn test_generic_without_name_column_fails() {
        let err = FormatDetector::decide("sku,categoria\nA-1,Frios").unwrap_err();
        assert!(matches!(err, ImportError::MissingNameColumn { .. }));
    }

    #[test]
    fn test_empty_text_fails() {
        let err = FormatDetector::decide("\n  \n").unwrap_err();
        assert!(matches!(err, ImportError::EmptyFile));
    }

    #[test]
    fn test_synonym_match_is_exact() {
        let header = vec!["nome do produto".to_string(), "codigo".to_string()];
        assert!(FormatDetector::locate_columns(&header).is_none());
    }
}
