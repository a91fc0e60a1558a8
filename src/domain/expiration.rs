// ==========================================
// 易腐库存管理 - 效期视图与汇总
// ==========================================
// 职责: 读时投影（商品 + 批次 + 剩余天数 + 分级）与汇总统计
// 红线: 视图与汇总每次查询重算，不落库
// ==========================================

use crate::domain::types::FreshnessTier;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// ProductWithExpiration - 效期视图
// ==========================================
// status 由 days_remaining 唯一决定；
// is_expired 是批次创建时的快照，与 status 不等价（例如创建后自然过期的批次
// is_expired = false 但 status = VENCIDO）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithExpiration {
    // ===== 商品 =====
    pub product_id: i64,
    pub name: String,
    pub code: Option<String>,
    pub category: Option<String>,

    // ===== 批次 =====
    pub entry_id: i64,
    pub expiration_date: NaiveDate,
    pub quantity: i32,
    pub notes: Option<String>,
    pub is_expired: bool, // 创建时快照

    // ===== 读时计算 =====
    pub days_remaining: i64,
    pub status: FreshnessTier,
}

// ==========================================
// ExpirationSummary - 效期汇总
// ==========================================
// 不变量:
// - valid = total - expired
// - ok + attention + vencendo = valid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationSummary {
    pub total: usize,
    pub valid: usize,
    pub expired: usize,
    pub ok: usize,
    pub attention: usize,
    pub vencendo: usize,
}

impl ExpirationSummary {
    /// 按分级取计数
    pub fn count_of(&self, tier: FreshnessTier) -> usize {
        match tier {
            FreshnessTier::Ok => self.ok,
            FreshnessTier::Attention => self.attention,
            FreshnessTier::Vencendo => self.vencendo,
            FreshnessTier::Vencido => self.expired,
        }
    }

    /// 占总数的百分比（四舍五入），total 为 0 时返回 0
    pub fn share_percent(&self, count: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((count as f64 / self.total as f64) * 100.0).round() as u32
    }
}
