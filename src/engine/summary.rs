// ==========================================
// 易腐库存管理 - 效期汇总引擎
// ==========================================
// 职责: 按分级统计效期视图
// 红线: 纯函数，无隐藏状态
// ==========================================

use crate::domain::expiration::{ExpirationSummary, ProductWithExpiration};
use crate::domain::types::FreshnessTier;

pub struct ExpirationAggregator;

impl ExpirationAggregator {
    /// 汇总效期视图
    ///
    /// 空集合返回全 0，展示层据此计算百分比
    pub fn summarize(views: &[ProductWithExpiration]) -> ExpirationSummary {
        let mut summary = ExpirationSummary {
            total: views.len(),
            ..Default::default()
        };

        for view in views {
            match view.status {
                FreshnessTier::Ok => summary.ok += 1,
                FreshnessTier::Attention => summary.attention += 1,
                FreshnessTier::Vencendo => summary.vencendo += 1,
                FreshnessTier::Vencido => summary.expired += 1,
            }
        }

        summary.valid = summary.total - summary.expired;
        summary
    }
}
