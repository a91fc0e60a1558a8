// ==========================================
// 易腐库存管理 - 字段映射器实现
// ==========================================
// 职责: 源行 → ProductCandidate（供应商格式 / 通用格式）
// 说明: 不满足条件的行不报错，写入诊断列表后跳过
// ==========================================

use crate::domain::product::ProductCandidate;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::diagnostics::{ImportDiagnostic, SkipReason};
use crate::importer::format_detector::{FormatDecision, FormatMode, GenericColumns};
use crate::importer::inventory_importer_trait::{
    DataCleaner as DataCleanerTrait, FieldMapper as FieldMapperTrait,
};
use crate::importer::record_extractor::SourceRow;

/// 映射结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedRows {
    pub candidates: Vec<ProductCandidate>,
    pub diagnostics: Vec<ImportDiagnostic>,
}

pub struct FieldMapper {
    cleaner: Box<dyn DataCleanerTrait>,
}

impl FieldMapper {
    pub fn new(cleaner: Box<dyn DataCleanerTrait>) -> Self {
        Self { cleaner }
    }
}

impl Default for FieldMapper {
    fn default() -> Self {
        Self::new(Box::new(DataCleaner))
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_rows(&self, decision: &FormatDecision, rows: &[SourceRow]) -> MappedRows {
        let mut mapped = MappedRows::default();

        for row in rows.iter().filter(|r| decision.is_data_line(r.line)) {
            let result = match &decision.mode {
                FormatMode::Vendor => self.map_vendor_row(row),
                FormatMode::Generic(columns) => self.map_generic_row(row, columns),
            };
            match result {
                Ok(candidate) => mapped.candidates.push(candidate),
                Err(diag) => mapped.diagnostics.push(diag),
            }
        }

        mapped
    }
}

impl FieldMapper {
    /// 供应商格式: 列0=编码, 列1=名称, 列2=数量备注
    fn map_vendor_row(&self, row: &SourceRow) -> Result<ProductCandidate, ImportDiagnostic> {
        let (code, name) = match (row.field(0), row.field(1)) {
            (Some(code), Some(name)) => (code, name),
            _ => {
                return Err(ImportDiagnostic::new(
                    row.line,
                    None,
                    SkipReason::TooFewColumns,
                    format!("列数不足: 期望至少 2 列，实际 {}", row.fields.len()),
                ))
            }
        };

        if !self.cleaner.is_numeric(code) {
            return Err(ImportDiagnostic::new(
                row.line,
                self.cleaner.normalize_null(Some(name.to_string())),
                SkipReason::NonNumericCode,
                format!("编码非数值: {}", code),
            ));
        }

        // 空名称视为非数值，稍后回填
        if self.cleaner.is_numeric(name) {
            return Err(ImportDiagnostic::new(
                row.line,
                Some(name.to_string()),
                SkipReason::NumericName,
                format!("名称为数值: {}", name),
            ));
        }

        let name = if name.is_empty() {
            format!("Produto {}", code)
        } else {
            name.to_string()
        };

        Ok(ProductCandidate {
            name,
            code: Some(code.to_string()),
            category: row.field(2).map(|qty| format!("Quantidade: {}", qty)),
            line_number: row.line,
        })
    }

    /// 通用格式: 按定位到的列取值，名称为空则跳过
    fn map_generic_row(
        &self,
        row: &SourceRow,
        columns: &GenericColumns,
    ) -> Result<ProductCandidate, ImportDiagnostic> {
        let pick = |index: Option<usize>| {
            self.cleaner
                .normalize_null(index.and_then(|i| row.field(i)).map(str::to_string))
        };

        let name = pick(Some(columns.name)).ok_or_else(|| {
            ImportDiagnostic::new(row.line, None, SkipReason::BlankName, "名称为空")
        })?;

        Ok(ProductCandidate {
            name,
            code: pick(columns.code),
            category: pick(columns.category),
            line_number: row.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::delimiter::Delimiter;

    fn row(line: u64, items: &[&str]) -> SourceRow {
        SourceRow {
            line,
            fields: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn vendor_decision() -> FormatDecision {
        FormatDecision {
            delimiter: Delimiter::Semicolon,
            has_header: true,
            header_line: 1,
            mode: FormatMode::Vendor,
        }
    }

    #[test]
    fn test_vendor_rows_with_quantity_and_blank_name() {
        let mapper = FieldMapper::default();
        let rows = vec![
            row(1, &["Material", "Texto breve material", "Utilização livre"]),
            row(2, &["1001", "Leite Integral", "50"]),
            row(3, &["1002", "", "30"]),
        ];

        let mapped = mapper.map_rows(&vendor_decision(), &rows);

        assert!(mapped.diagnostics.is_empty());
        assert_eq!(mapped.candidates.len(), 2);
        assert_eq!(mapped.candidates[0].code.as_deref(), Some("1001"));
        assert_eq!(mapped.candidates[0].name, "Leite Integral");
        assert_eq!(mapped.candidates[0].category.as_deref(), Some("Quantidade: 50"));
        assert_eq!(mapped.candidates[1].name, "Produto 1002");
        assert_eq!(mapped.candidates[1].category.as_deref(), Some("Quantidade: 30"));
        assert_eq!(mapped.candidates[1].line_number, 3);
    }

    #[test]
    fn test_vendor_guard_drops_stray_rows() {
        let mapper = FieldMapper::default();
        let rows = vec![
            row(2, &["Total", "Geral"]),
            row(3, &["1003", "42"]),
            row(4, &["1004"]),
            row(5, &["1005", "Queijo"]),
        ];

        let mapped = mapper.map_rows(&vendor_decision(), &rows);

        assert_eq!(mapped.candidates.len(), 1);
        assert_eq!(mapped.candidates[0].name, "Queijo");
        assert_eq!(mapped.candidates[0].category, None);

        let reasons: Vec<SkipReason> = mapped.diagnostics.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![
                SkipReason::NonNumericCode,
                SkipReason::NumericName,
                SkipReason::TooFewColumns
            ]
        );
    }

    #[test]
    fn test_generic_rows_skip_blank_names() {
        let mapper = FieldMapper::default();
        let decision = FormatDecision {
            delimiter: Delimiter::Comma,
            has_header: true,
            header_line: 1,
            mode: FormatMode::Generic(GenericColumns {
                name: 0,
                code: Some(1),
                category: None,
            }),
        };
        let rows = vec![
            row(1, &["nome", "sku"]),
            row(2, &["Leite", "A-1"]),
            row(3, &["", "A-2"]),
            row(4, &["Pão"]),
        ];

        let mapped = mapper.map_rows(&decision, &rows);

        assert_eq!(mapped.candidates.len(), 2);
        assert_eq!(mapped.candidates[0].code.as_deref(), Some("A-1"));
        assert_eq!(mapped.candidates[1].name, "Pão");
        assert_eq!(mapped.candidates[1].code, None);
        assert_eq!(mapped.diagnostics.len(), 1);
        assert_eq!(mapped.diagnostics[0].reason, SkipReason::BlankName);
        assert_eq!(mapped.diagnostics[0].line, 3);
    }
}
