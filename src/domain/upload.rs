// ==========================================
// 易腐库存管理 - 上传记录领域模型
// ==========================================
// 职责: 记录每次 CSV 导入事件的元信息
// 红线: products_count = 实际新建商品数，而非文件行数
// ==========================================

use crate::domain::types::UploadStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// InventoryUpload - 上传记录
// ==========================================
// 对齐: inventory_uploads 表
// 删除上传记录不会级联删除其导入的商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryUpload {
    pub id: i64,
    pub filename: String,
    pub uploaded_by: i64,        // 上传人用户 ID
    pub products_count: i64,     // 本次新建商品数
    pub status: UploadStatus,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInventoryUpload {
    pub filename: String,
    pub uploaded_by: i64,
    pub products_count: i64,
    pub status: UploadStatus,
}
