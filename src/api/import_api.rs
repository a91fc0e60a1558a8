// ==========================================
// 易腐库存管理 - 库存上传 API
// ==========================================
// 职责: 接收 CSV 上传、查询/删除上传记录
// 红线: 上传/删除仅限 MODERADOR，权限校验先于负载处理
// ==========================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::api::validator::require_moderator;
use crate::config::{ConfigManager, ImportConfigReader};
use crate::domain::types::Caller;
use crate::domain::upload::InventoryUpload;
use crate::i18n::{t, t_with_args};
use crate::importer::{ImportDiagnostic, InventoryImporter};
use crate::repository::InventoryUploadRepository;

/// 上传请求
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadRequest {
    pub csv: Option<String>,
    pub filename: Option<String>,
}

/// 上传响应
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub message: String,
    pub upload: InventoryUpload,
    /// 实际新建的商品数（不是文件行数）
    pub products_count: usize,
    /// 被跳过的行
    pub diagnostics: Vec<ImportDiagnostic>,
}

// ==========================================
// ImportApi - 库存上传 API
// ==========================================
pub struct ImportApi {
    importer: Arc<dyn InventoryImporter>,
    upload_repo: Arc<InventoryUploadRepository>,
    config: Arc<ConfigManager>,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(
        importer: Arc<dyn InventoryImporter>,
        upload_repo: Arc<InventoryUploadRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            importer,
            upload_repo,
            config,
        }
    }

    /// 上传库存 CSV
    ///
    /// # 参数
    /// - caller: 调用方（需 MODERADOR）
    /// - request: {csv, filename}
    ///
    /// # 返回
    /// - Ok(UploadResponse): 上传记录 + 新建数量 + 诊断
    /// - Err(Unauthorized/Forbidden): 权限不足
    /// - Err(InvalidInput): 缺少 CSV
    /// - Err(ValidationError): 缺少名称列等文件问题
    pub async fn upload_inventory(
        &self,
        caller: Option<&Caller>,
        request: UploadRequest,
    ) -> ApiResult<UploadResponse> {
        let caller = require_moderator(caller)?;

        let csv = match request.csv {
            Some(csv) if !csv.trim().is_empty() => csv,
            _ => return Err(ApiError::InvalidInput(t("upload.csv_required"))),
        };

        let filename = match request.filename.filter(|f| !f.trim().is_empty()) {
            Some(name) => name,
            None => self
                .config
                .get_default_upload_filename()
                .await
                .map_err(|e| ApiError::InternalError(e.to_string()))?,
        };

        let outcome = self
            .importer
            .import_csv_text(&csv, &filename, caller.user_id)
            .await
            .map_err(|e| {
                warn!(filename = %filename, error = %e, "库存上传失败");
                ApiError::from(e)
            })?;

        let products_count = outcome.products_count();
        info!(
            upload_id = outcome.upload.id,
            products_count,
            skipped = outcome.diagnostics.len(),
            "库存上传完成"
        );

        Ok(UploadResponse {
            message: t_with_args("upload.success", &[("count", &products_count.to_string())]),
            upload: outcome.upload,
            products_count,
            diagnostics: outcome.diagnostics,
        })
    }

    /// 查询上传记录（最新在前）
    pub fn list_uploads(&self) -> ApiResult<Vec<InventoryUpload>> {
        Ok(self.upload_repo.list_all()?)
    }

    /// 删除上传记录（不删除其引入的商品）
    pub fn delete_upload(&self, caller: Option<&Caller>, upload_id: i64) -> ApiResult<()> {
        require_moderator(caller)?;

        if !self.upload_repo.delete(upload_id)? {
            return Err(ApiError::NotFound(t_with_args(
                "upload.not_found",
                &[("id", &upload_id.to_string())],
            )));
        }

        info!(upload_id, "上传记录已删除");
        Ok(())
    }
}
