// ==========================================
// 易腐库存管理 - 冲突处理器实现
// ==========================================
// 职责: 候选商品与库存比对（按名称，可选按编码）+ 文件内重复检测
// 说明: 默认不做文件内去重，保持历史导入计数口径
// ==========================================

use crate::domain::product::ProductCandidate;
use crate::importer::inventory_importer_trait::ConflictHandler as ConflictHandlerTrait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 去重键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DedupKey {
    Name,       // 仅按名称精确匹配
    NameOrCode, // 名称或编码任一命中即视为已存在
}

impl DedupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            DedupKey::Name => "NAME",
            DedupKey::NameOrCode => "NAME_OR_CODE",
        }
    }

    pub fn uses_code(&self) -> bool {
        matches!(self, DedupKey::NameOrCode)
    }
}

impl std::str::FromStr for DedupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NAME" => Ok(DedupKey::Name),
            "NAME_OR_CODE" => Ok(DedupKey::NameOrCode),
            other => Err(format!("未知去重键: {}", other)),
        }
    }
}

/// 比对结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partitioned {
    pub to_create: Vec<ProductCandidate>,
    pub existing: Vec<ProductCandidate>,
}

pub struct ConflictHandler;

impl ConflictHandlerTrait for ConflictHandler {
    /// 检测文件内重复名称
    ///
    /// # 返回
    /// - Vec<(行号, 名称)>: 重复记录列表（不包括第一次出现）
    fn detect_duplicates(&self, candidates: &[ProductCandidate]) -> Vec<(u64, String)> {
        let mut first_occurrence: HashMap<&str, u64> = HashMap::new();
        let mut duplicates = Vec::new();

        for candidate in candidates {
            if first_occurrence.contains_key(candidate.name.as_str()) {
                duplicates.push((candidate.line_number, candidate.name.clone()));
            } else {
                first_occurrence.insert(candidate.name.as_str(), candidate.line_number);
            }
        }

        duplicates
    }

    /// 按库中已存在的名称/编码拆分候选
    ///
    /// # 参数
    /// - existing_names: 库中已存在的名称
    /// - existing_codes: 库中已存在的编码（仅 NameOrCode 时非空）
    fn partition_existing(
        &self,
        candidates: Vec<ProductCandidate>,
        existing_names: &HashSet<String>,
        existing_codes: &HashSet<String>,
    ) -> Partitioned {
        let (existing, to_create) = candidates.into_iter().partition(|c| {
            existing_names.contains(&c.name)
                || c.code
                    .as_ref()
                    .map(|code| existing_codes.contains(code))
                    .unwrap_or(false)
        });

        Partitioned { to_create, existing }
    }
}
