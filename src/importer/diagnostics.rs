// ==========================================
// 易腐库存管理 - 导入诊断与遥测
// ==========================================
// 职责: 被静默跳过的行 → 诊断列表；导入过程事件 → ImportObserver
// 说明: 解析核心不直接写日志，事件由导入器转交给观察者
// ==========================================

use crate::importer::delimiter::Delimiter;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

// ==========================================
// 诊断
// ==========================================

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    TooFewColumns,   // 供应商格式列数 < 2
    NonNumericCode,  // 供应商格式编码非数值
    NumericName,     // 供应商格式名称为数值（疑似串行表头/表尾）
    BlankName,       // 通用格式名称为空
    AlreadyExists,   // 库中已存在同名（或同编码）商品
    DuplicateInFile, // 文件内重复（需开启配置）
    InsertFailed,    // 逐行插入失败
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TooFewColumns => "TOO_FEW_COLUMNS",
            SkipReason::NonNumericCode => "NON_NUMERIC_CODE",
            SkipReason::NumericName => "NUMERIC_NAME",
            SkipReason::BlankName => "BLANK_NAME",
            SkipReason::AlreadyExists => "ALREADY_EXISTS",
            SkipReason::DuplicateInFile => "DUPLICATE_IN_FILE",
            SkipReason::InsertFailed => "INSERT_FAILED",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 单行诊断
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDiagnostic {
    pub line: u64,
    pub name: Option<String>,
    pub reason: SkipReason,
    pub message: String,
}

impl ImportDiagnostic {
    pub fn new(line: u64, name: Option<String>, reason: SkipReason, message: impl Into<String>) -> Self {
        Self {
            line,
            name,
            reason,
            message: message.into(),
        }
    }
}

// ==========================================
// 遥测事件
// ==========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ImportEvent {
    /// 识别出的分隔符
    DelimiterDetected { delimiter: Delimiter },
    /// 识别出的格式
    FormatDetected {
        mode: String,
        has_header: bool,
        header_line: u64,
    },
    /// 行被跳过
    RowSkipped(ImportDiagnostic),
    /// 候选记录就绪
    CandidatesReady { total_rows: usize, candidates: usize },
    /// 已存在商品跳过
    ExistingSkipped { count: usize },
    /// 批量插入失败，转为逐行插入
    BulkInsertFailed { error: String, pending: usize },
    /// 逐行插入失败
    RowInsertFailed { line: u64, name: String, error: String },
    /// 导入完成
    ImportCompleted {
        inserted: usize,
        skipped: usize,
        elapsed_ms: u128,
    },
}

/// 导入观察者 Trait
///
/// 导入器把过程事件交给观察者，测试中可替换为收集器
pub trait ImportObserver: Send + Sync {
    fn on_event(&self, run_id: &str, event: &ImportEvent);
}

/// 以 tracing 结构化事件输出
#[derive(Debug, Clone, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_event(&self, run_id: &str, event: &ImportEvent) {
        match event {
            ImportEvent::DelimiterDetected { delimiter } => {
                debug!(run_id = %run_id, delimiter = %delimiter, "分隔符识别完成");
            }
            ImportEvent::FormatDetected {
                mode,
                has_header,
                header_line,
            } => {
                info!(
                    run_id = %run_id,
                    mode = %mode,
                    has_header = has_header,
                    header_line = header_line,
                    "格式识别完成"
                );
            }
            ImportEvent::RowSkipped(diag) => {
                debug!(
                    run_id = %run_id,
                    line = diag.line,
                    reason = %diag.reason,
                    "跳过行: {}",
                    diag.message
                );
            }
            ImportEvent::CandidatesReady {
                total_rows,
                candidates,
            } => {
                info!(
                    run_id = %run_id,
                    total_rows = total_rows,
                    candidates = candidates,
                    "候选商品就绪"
                );
            }
            ImportEvent::ExistingSkipped { count } => {
                info!(run_id = %run_id, count = count, "已存在商品跳过");
            }
            ImportEvent::BulkInsertFailed { error, pending } => {
                warn!(
                    run_id = %run_id,
                    pending = pending,
                    error = %error,
                    "批量插入失败，转为逐行插入"
                );
            }
            ImportEvent::RowInsertFailed { line, name, error } => {
                warn!(
                    run_id = %run_id,
                    line = line,
                    name = %name,
                    error = %error,
                    "单行插入失败，已跳过"
                );
            }
            ImportEvent::ImportCompleted {
                inserted,
                skipped,
                elapsed_ms,
            } => {
                info!(
                    run_id = %run_id,
                    inserted = inserted,
                    skipped = skipped,
                    elapsed_ms = elapsed_ms,
                    "导入完成"
                );
            }
        }
    }
}

/// 空操作观察者
///
/// 用于不需要遥测的场景（如单元测试）
#[derive(Debug, Clone, Default)]
pub struct NoOpObserver;

impl ImportObserver for NoOpObserver {
    fn on_event(&self, _run_id: &str, _event: &ImportEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_reason_serde_name() {
        let json = serde_json::to_string(&SkipReason::NonNumericCode).unwrap();
        assert_eq!(json, "\"NON_NUMERIC_CODE\"");
        assert_eq!(SkipReason::AlreadyExists.to_string(), "ALREADY_EXISTS");
    }

    #[test]
    fn test_observers_accept_events() {
        let event = ImportEvent::RowSkipped(ImportDiagnostic::new(
            3,
            Some("Leite".to_string()),
            SkipReason::AlreadyExists,
            "já existe",
        ));
        TracingObserver.on_event("run-1", &event);
        NoOpObserver.on_event("run-1", &event);
    }
}
