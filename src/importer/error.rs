// ==========================================
// 易腐库存管理 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级问题不走错误通道，统一进入诊断列表；
//       这里只保留会中止整个文件的错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件内容为空")]
    EmptyFile,

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 格式识别错误 =====
    #[error("CSV 缺少名称/商品列（表头: {header}）")]
    MissingNameColumn { header: String },

    #[error("日期格式错误: 期望 YYYY-MM-DD 或 dd/MM/yyyy，实际 {value}")]
    DateFormatError { value: String },

    // ===== 数据库错误 =====
    #[error("数据库操作失败: {0}")]
    DatabaseError(String),

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否属于文件内容问题（调用方应按输入错误处理）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ImportError::EmptyFile
                | ImportError::MissingNameColumn { .. }
                | ImportError::DateFormatError { .. }
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for ImportError {
    fn from(err: rusqlite::Error) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}

// 实现 From<RepositoryError>
impl From<RepositoryError> for ImportError {
    fn from(err: RepositoryError) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
