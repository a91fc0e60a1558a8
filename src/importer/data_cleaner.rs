// ==========================================
// 易腐库存管理 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 数值判定 / 效期日期解析
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::inventory_importer_trait::DataCleaner as DataCleanerTrait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    fn is_numeric(&self, value: &str) -> bool {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return false;
        }
        trimmed
            .parse::<f64>()
            .map(|n| n.is_finite())
            .unwrap_or(false)
    }

    fn is_all_digits(&self, value: &str) -> bool {
        !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
    }

    fn parse_expiration_date(&self, value: &str) -> ImportResult<NaiveDate> {
        let trimmed = value.trim();
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
            .or_else(|_| {
                // ISO 时间戳（表单提交的 2024-03-10T00:00:00.000Z 等）
                DateTime::parse_from_rfc3339(trimmed)
                    .map(|dt| dt.date_naive())
                    .or_else(|_| {
                        NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
                            .map(|dt| dt.date())
                    })
            })
            .map_err(|_| ImportError::DateFormatError {
                value: trimmed.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text_basic() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.clean_text("  Leite  "), "Leite");
    }

    #[test]
    fn test_normalize_null() {
        let cleaner = DataCleaner;
        assert_eq!(cleaner.normalize_null(Some("  ".to_string())), None);
        assert_eq!(cleaner.normalize_null(Some("".to_string())), None);
        assert_eq!(
            cleaner.normalize_null(Some("  value  ".to_string())),
            Some("value".to_string())
        );
        assert_eq!(cleaner.normalize_null(None), None);
    }

    #[test]
    fn test_is_numeric() {
        let cleaner = DataCleaner;
        assert!(cleaner.is_numeric("1001"));
        assert!(cleaner.is_numeric(" 12.5 "));
        assert!(cleaner.is_numeric("-3"));
        assert!(!cleaner.is_numeric("Leite"));
        assert!(!cleaner.is_numeric(""));
        assert!(!cleaner.is_numeric("NaN"));
        assert!(!cleaner.is_numeric("inf"));
    }

    #[test]
    fn test_is_all_digits() {
        let cleaner = DataCleaner;
        assert!(cleaner.is_all_digits("000123"));
        assert!(!cleaner.is_all_digits("12.5"));
        assert!(!cleaner.is_all_digits(""));
    }

    #[test]
    fn test_parse_expiration_date_formats() {
        let cleaner = DataCleaner;
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        assert_eq!(cleaner.parse_expiration_date("2024-03-10").unwrap(), expected);
        assert_eq!(cleaner.parse_expiration_date("10/03/2024").unwrap(), expected);
        assert_eq!(
            cleaner.parse_expiration_date("2024-03-10T00:00:00.000Z").unwrap(),
            expected
        );
        assert_eq!(
            cleaner.parse_expiration_date("2024-03-10T15:30:00").unwrap(),
            expected
        );
    }

    #[test]
    fn test_parse_expiration_date_invalid() {
        let cleaner = DataCleaner;
        let err = cleaner.parse_expiration_date("amanha").unwrap_err();
        assert!(matches!(err, ImportError::DateFormatError { .. }));
    }
}
