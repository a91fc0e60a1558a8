// ==========================================
// 易腐库存管理 - 批次（入库记录）领域模型
// ==========================================
// 职责: 每个批次的效期、数量、过期快照
// ==========================================
// 注意: is_expired 是"创建时刻"的快照，之后不会自动重算；
//       实时效期分级见 ProductWithExpiration.status，两者会随时间分叉。
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// 默认批次数量
pub const DEFAULT_ENTRY_QUANTITY: i32 = 1;

// ==========================================
// ProductEntry - 批次
// ==========================================
// 对齐: product_entries 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductEntry {
    pub id: i64,
    pub product_id: i64,              // 关联 products（FK）
    pub expiration_date: NaiveDate,   // 效期（按天）
    pub quantity: i32,                // 数量（>= 1）
    pub notes: Option<String>,
    pub is_expired: bool,             // 创建时刻的过期快照
    pub created_at: DateTime<Utc>,
}

impl ProductEntry {
    /// 计算创建时刻的过期快照
    ///
    /// 规则: 效期当天 00:00 早于创建时刻即视为已过期。
    /// 因此"今天到期"的批次在创建时快照为 true，而实时分级为 VENCENDO。
    pub fn expired_at_creation(expiration_date: NaiveDate, created_at: NaiveDateTime) -> bool {
        expiration_date.and_time(NaiveTime::MIN) < created_at
    }
}

// ==========================================
// NewProductEntry - 待插入批次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductEntry {
    pub product_id: i64,
    pub expiration_date: NaiveDate,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

impl NewProductEntry {
    /// 实际落库数量（缺省为 1）
    pub fn effective_quantity(&self) -> i32 {
        self.quantity.unwrap_or(DEFAULT_ENTRY_QUANTITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_expired_at_creation_past_date() {
        let exp = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert!(ProductEntry::expired_at_creation(exp, at("2024-03-10", "08:00:00")));
    }

    #[test]
    fn test_expired_at_creation_same_day_after_midnight() {
        // 当天到期、创建于白天 → 快照为已过期
        let exp = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(ProductEntry::expired_at_creation(exp, at("2024-03-10", "08:00:00")));
        assert!(!ProductEntry::expired_at_creation(exp, at("2024-03-10", "00:00:00")));
    }

    #[test]
    fn test_expired_at_creation_future_date() {
        let exp = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert!(!ProductEntry::expired_at_creation(exp, at("2024-03-10", "23:59:59")));
    }

    #[test]
    fn test_effective_quantity_default() {
        let entry = NewProductEntry {
            product_id: 1,
            expiration_date: NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(),
            quantity: None,
            notes: None,
        };
        assert_eq!(entry.effective_quantity(), 1);
    }
}
