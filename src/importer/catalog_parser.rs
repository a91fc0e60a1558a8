// ==========================================
// 易腐库存管理 - 商品目录解析（纯函数管道）
// ==========================================
// 流程: 分隔符识别 → 行提取 → 格式决策 → 字段映射
// 输出: ParsedCatalog（决策 + 候选 + 诊断），不访问数据库，不写日志
// ==========================================

use crate::domain::product::ProductCandidate;
use crate::importer::delimiter::Delimiter;
use crate::importer::diagnostics::ImportDiagnostic;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::format_detector::{FormatDecision, FormatDetector};
use crate::importer::inventory_importer_trait::FieldMapper as FieldMapperTrait;
use crate::importer::record_extractor::RecordExtractor;

/// 解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCatalog {
    pub decision: FormatDecision,
    pub total_rows: usize, // 数据行数（不含表头、空行）
    pub candidates: Vec<ProductCandidate>,
    pub diagnostics: Vec<ImportDiagnostic>,
}

/// 使用默认字段映射器解析
pub fn parse_inventory_csv(text: &str) -> ImportResult<ParsedCatalog> {
    parse_with_mapper(text, &FieldMapper::default())
}

/// 使用指定字段映射器解析
pub fn parse_with_mapper(text: &str, mapper: &dyn FieldMapperTrait) -> ImportResult<ParsedCatalog> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let delimiter = Delimiter::detect(text);
    let rows = RecordExtractor::extract(text, delimiter)?;
    let decision = FormatDetector::decide_from_rows(delimiter, &rows)?;

    // 通用模式数据行按逗号重新切分
    let rows = if decision.row_delimiter() == delimiter {
        rows
    } else {
        RecordExtractor::extract(text, decision.row_delimiter())?
    };

    let total_rows = rows
        .iter()
        .filter(|r| decision.is_data_line(r.line))
        .count();
    let mapped = mapper.map_rows(&decision, &rows);

    Ok(ParsedCatalog {
        decision,
        total_rows,
        candidates: mapped.candidates,
        diagnostics: mapped.diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::diagnostics::SkipReason;
    use crate::importer::error::ImportError;
    use crate::importer::format_detector::FormatMode;

    #[test]
    fn test_vendor_tab_file() {
        let text = "Material\tTexto breve material\tUtilização livre\r\n\
                    1001\tLeite Integral\t50\r\n\
                    1002\t\t30\r\n";
        let parsed = parse_inventory_csv(text).unwrap();

        assert_eq!(parsed.decision.delimiter, Delimiter::Tab);
        assert_eq!(parsed.decision.mode, FormatMode::Vendor);
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.candidates.len(), 2);
        assert_eq!(parsed.candidates[1].name, "Produto 1002");
    }

    #[test]
    fn test_generic_semicolon_header_comma_rows() {
        // 表头按分号识别，数据行固定按逗号切分
        let text = "nome;categoria\nLeite,Laticinios\nPão;Padaria";
        let parsed = parse_inventory_csv(text).unwrap();

        assert!(matches!(parsed.decision.mode, FormatMode::Generic(_)));
        assert_eq!(parsed.total_rows, 2);
        assert_eq!(parsed.candidates[0].name, "Leite");
        assert_eq!(parsed.candidates[0].category.as_deref(), Some("Laticinios"));
        // 该行没有逗号，整行作为名称
        assert_eq!(parsed.candidates[1].name, "Pão;Padaria");
    }

    #[test]
    fn test_generic_comma_file() {
        let text = "codigo,nome,categoria\nA-1,Leite,Laticinios\nA-2,,Frios\n";
        let parsed = parse_inventory_csv(text).unwrap();

        assert_eq!(parsed.candidates.len(), 1);
        assert_eq!(parsed.candidates[0].code.as_deref(), Some("A-1"));
        assert_eq!(parsed.candidates[0].category.as_deref(), Some("Laticinios"));
        assert_eq!(parsed.diagnostics[0].reason, SkipReason::BlankName);
    }

    #[test]
    fn test_missing_name_column() {
        let err = parse_inventory_csv("sku,categoria\nA-1,Frios").unwrap_err();
        assert!(matches!(err, ImportError::MissingNameColumn { .. }));
    }

    #[test]
    fn test_byte_order_mark_is_ignored() {
        let parsed = parse_inventory_csv("\u{feff}nome\nLeite").unwrap();
        assert_eq!(parsed.candidates[0].name, "Leite");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let text = "Material;Texto breve material\n1001;Leite\nx;y";
        assert_eq!(parse_inventory_csv(text).unwrap(), parse_inventory_csv(text).unwrap());
    }
}
