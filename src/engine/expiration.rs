// ==========================================
// 易腐库存管理 - 效期分级引擎
// ==========================================
// 红线: 效期分级是"等级制"，由剩余天数唯一决定
// 红线: 各档上界闭区间（0/7 → VENCENDO，15 → ATTENTION）
// ==========================================
// 职责: 计算剩余天数 + 判定效期分级
// 输入: 商品 + 批次 + 当天日期
// 输出: ProductWithExpiration（读时视图，不落库）
// ==========================================

use crate::domain::expiration::ProductWithExpiration;
use crate::domain::product::Product;
use crate::domain::product_entry::ProductEntry;
use crate::domain::types::FreshnessTier;
use chrono::NaiveDate;
use tracing::instrument;

/// 临期上界（含）
pub const VENCENDO_MAX_DAYS: i64 = 7;
/// 关注上界（含）
pub const ATTENTION_MAX_DAYS: i64 = 15;

// ==========================================
// ExpirationClassifier - 效期分级引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpirationClassifier;

impl ExpirationClassifier {
    pub fn new() -> Self {
        Self
    }

    /// 剩余天数（按自然日，当天到期为 0，已过期为负）
    pub fn days_remaining(&self, expiration_date: NaiveDate, today: NaiveDate) -> i64 {
        (expiration_date - today).num_days()
    }

    /// 按剩余天数分级（顺序判定，先命中先返回）
    pub fn classify_days(&self, days_remaining: i64) -> FreshnessTier {
        if days_remaining < 0 {
            FreshnessTier::Vencido
        } else if days_remaining <= VENCENDO_MAX_DAYS {
            FreshnessTier::Vencendo
        } else if days_remaining <= ATTENTION_MAX_DAYS {
            FreshnessTier::Attention
        } else {
            FreshnessTier::Ok
        }
    }

    /// 按效期日期分级
    ///
    /// # 返回
    /// - (剩余天数, 分级)
    pub fn classify(&self, expiration_date: NaiveDate, today: NaiveDate) -> (i64, FreshnessTier) {
        let days = self.days_remaining(expiration_date, today);
        (days, self.classify_days(days))
    }

    /// 构建单条效期视图
    pub fn build_view(
        &self,
        product: &Product,
        entry: &ProductEntry,
        today: NaiveDate,
    ) -> ProductWithExpiration {
        let (days_remaining, status) = self.classify(entry.expiration_date, today);

        ProductWithExpiration {
            product_id: product.id,
            name: product.name.clone(),
            code: product.code.clone(),
            category: product.category.clone(),
            entry_id: entry.id,
            expiration_date: entry.expiration_date,
            quantity: entry.quantity,
            notes: entry.notes.clone(),
            is_expired: entry.is_expired,
            days_remaining,
            status,
        }
    }

    /// 批量构建效期视图（保持输入顺序）
    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub fn classify_batch(
        &self,
        rows: &[(Product, ProductEntry)],
        today: NaiveDate,
    ) -> Vec<ProductWithExpiration> {
        rows.iter()
            .map(|(product, entry)| self.build_view(product, entry, today))
            .collect()
    }
}
