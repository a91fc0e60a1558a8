// ==========================================
// 易腐库存管理 - 商品领域模型
// ==========================================
// 职责: 商品主数据 / 导入中间结构体
// 红线: 商品创建后不可修改（无更新路径）
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品主数据
// ==========================================
// 用途: 导入层写入，查询层只读
// 对齐: products 表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,                     // 主键（自增）
    pub name: String,                // 商品名称（展示键，用于去重）
    pub code: Option<String>,        // 供应商物料号
    pub category: Option<String>,    // 分类（供应商格式下存放数量备注）
    pub created_at: DateTime<Utc>,   // 创建时间
}

// ==========================================
// NewProduct - 待插入商品
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub code: Option<String>,
    pub category: Option<String>,
}

impl NewProduct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            category: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

// ==========================================
// ProductCandidate - 导入中间结构体（规范记录）
// ==========================================
// 用途: 导入管道中间产物（解析 → 归一化 → 此结构）
// 生命周期: 仅在导入流程内
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCandidate {
    pub name: String,
    pub code: Option<String>,
    pub category: Option<String>,

    // 元信息
    pub line_number: u64, // 原始文件行号（用于诊断）
}

impl ProductCandidate {
    pub fn to_new_product(&self) -> NewProduct {
        NewProduct {
            name: self.name.clone(),
            code: self.code.clone(),
            category: self.category.clone(),
        }
    }
}

impl From<ProductCandidate> for NewProduct {
    fn from(candidate: ProductCandidate) -> Self {
        NewProduct {
            name: candidate.name,
            code: candidate.code,
            category: candidate.category,
        }
    }
}
