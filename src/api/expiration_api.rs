// ==========================================
// 易腐库存管理 - 效期 API
// ==========================================
// 职责: 效期视图、汇总、按分级筛选
// 红线: 视图每次读时重算，不使用批次上的 is_expired 快照分级
// ==========================================

use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::debug;

use crate::api::error::ApiResult;
use crate::domain::expiration::{ExpirationSummary, ProductWithExpiration};
use crate::domain::types::FreshnessTier;
use crate::engine::{ExpirationAggregator, ExpirationClassifier};
use crate::repository::ProductEntryRepository;

pub struct ExpirationApi {
    entry_repo: Arc<ProductEntryRepository>,
    classifier: ExpirationClassifier,
}

impl ExpirationApi {
    pub fn new(entry_repo: Arc<ProductEntryRepository>) -> Self {
        Self {
            entry_repo,
            classifier: ExpirationClassifier::new(),
        }
    }

    /// 效期视图（以本地当天为基准）
    pub fn list_with_expiration(&self) -> ApiResult<Vec<ProductWithExpiration>> {
        self.list_with_expiration_at(Local::now().date_naive())
    }

    /// 效期视图（指定基准日）
    pub fn list_with_expiration_at(&self, today: NaiveDate) -> ApiResult<Vec<ProductWithExpiration>> {
        let rows = self.entry_repo.list_with_products()?;
        let views = self.classifier.classify_batch(&rows, today);
        debug!(today = %today, count = views.len(), "效期视图已生成");
        Ok(views)
    }

    pub fn get_expiration_summary(&self) -> ApiResult<ExpirationSummary> {
        self.get_expiration_summary_at(Local::now().date_naive())
    }

    pub fn get_expiration_summary_at(&self, today: NaiveDate) -> ApiResult<ExpirationSummary> {
        let views = self.list_with_expiration_at(today)?;
        Ok(ExpirationAggregator::summarize(&views))
    }

    /// 按分级筛选
    ///
    /// VENCIDO 按最近过期在前排序；其余按剩余天数升序
    pub fn list_by_status_at(
        &self,
        tier: FreshnessTier,
        today: NaiveDate,
    ) -> ApiResult<Vec<ProductWithExpiration>> {
        let mut views: Vec<_> = self
            .list_with_expiration_at(today)?
            .into_iter()
            .filter(|v| v.status == tier)
            .collect();

        if tier == FreshnessTier::Vencido {
            views.sort_by(|a, b| b.days_remaining.cmp(&a.days_remaining));
        } else {
            views.sort_by_key(|v| v.days_remaining);
        }
        Ok(views)
    }
}
