// ==========================================
// 易腐库存管理 - 商品与批次 API
// ==========================================
// 职责: 商品查询/搜索，批次登记与标记过期
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::config::ConfigManager;
use crate::domain::product::Product;
use crate::domain::product_entry::{NewProductEntry, ProductEntry};
use crate::i18n::{t, t_with_args};
use crate::importer::{DataCleaner, DataCleanerImpl};
use crate::repository::{ProductEntryRepository, ProductRepository};

/// 批次登记请求
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub product_id: i64,
    /// YYYY-MM-DD / ISO 时间戳 / dd/MM/yyyy
    pub expiration_date: String,
    pub quantity: Option<i32>,
    pub notes: Option<String>,
}

// ==========================================
// ProductApi - 商品与批次 API
// ==========================================
pub struct ProductApi {
    product_repo: Arc<ProductRepository>,
    entry_repo: Arc<ProductEntryRepository>,
    config: Arc<ConfigManager>,
    cleaner: DataCleanerImpl,
}

impl ProductApi {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        entry_repo: Arc<ProductEntryRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            product_repo,
            entry_repo,
            config,
            cleaner: DataCleanerImpl,
        }
    }

    // ==========================================
    // 商品查询
    // ==========================================

    pub fn list_products(&self) -> ApiResult<Vec<Product>> {
        Ok(self.product_repo.list_all()?)
    }

    /// 按名称子串搜索（不区分大小写）
    ///
    /// 空查询返回空列表；结果数上限取配置 search_max_results
    pub fn search_products(&self, query: &str) -> ApiResult<Vec<Product>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let limit = self
            .config
            .get_search_max_results()
            .map_err(|e| ApiError::InternalError(e.to_string()))?;

        let products = self.product_repo.search_by_name(query, limit)?;
        debug!(query, limit, found = products.len(), "商品搜索");
        Ok(products)
    }

    // ==========================================
    // 批次操作
    // ==========================================

    /// 登记批次
    ///
    /// # 返回
    /// - Err(InvalidInput): 数量 < 1 或日期无法解析
    /// - Err(NotFound): 商品不存在
    pub fn create_entry(&self, request: CreateEntryRequest) -> ApiResult<ProductEntry> {
        if let Some(quantity) = request.quantity {
            if quantity < 1 {
                return Err(ApiError::InvalidInput(t("entry.invalid_quantity")));
            }
        }

        let expiration_date = self
            .cleaner
            .parse_expiration_date(&request.expiration_date)
            .map_err(|_| {
                ApiError::InvalidInput(t_with_args(
                    "entry.invalid_date",
                    &[("value", request.expiration_date.as_str())],
                ))
            })?;

        if self.product_repo.find_by_id(request.product_id)?.is_none() {
            return Err(ApiError::NotFound(t_with_args(
                "entry.product_not_found",
                &[("id", &request.product_id.to_string())],
            )));
        }

        let entry = self.entry_repo.insert(&NewProductEntry {
            product_id: request.product_id,
            expiration_date,
            quantity: request.quantity,
            notes: request.notes,
        })?;

        info!(
            entry_id = entry.id,
            product_id = entry.product_id,
            expiration_date = %entry.expiration_date,
            is_expired = entry.is_expired,
            "批次已登记"
        );
        Ok(entry)
    }

    /// 标记批次已过期
    pub fn mark_entry_expired(&self, entry_id: i64) -> ApiResult<ProductEntry> {
        match self.entry_repo.set_expired(entry_id, true)? {
            Some(entry) => {
                info!(entry_id, "批次已标记过期");
                Ok(entry)
            }
            None => Err(ApiError::NotFound(t_with_args(
                "entry.not_found",
                &[("id", &entry_id.to_string())],
            ))),
        }
    }
}
