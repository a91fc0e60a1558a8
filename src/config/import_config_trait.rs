// ==========================================
// 易腐库存管理 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::importer::conflict_handler::DedupKey;
use async_trait::async_trait;
use std::error::Error;

/// 配置读取结果
pub type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    /// 获取去重键
    ///
    /// # 默认值
    /// - NAME（仅按名称，保持历史导入计数口径）
    async fn get_dedup_key(&self) -> ConfigResult<DedupKey>;

    /// 是否在文件内去重（同一文件内同名只保留首次出现）
    ///
    /// # 默认值
    /// - false
    async fn get_dedupe_within_file(&self) -> ConfigResult<bool>;

    /// 未提供文件名时使用的默认上传文件名
    ///
    /// # 默认值
    /// - estoque.csv
    async fn get_default_upload_filename(&self) -> ConfigResult<String>;
}
