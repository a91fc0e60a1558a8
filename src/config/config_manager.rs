// ==========================================
// 易腐库存管理 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::{ConfigResult, ImportConfigReader};
use crate::db::open_sqlite_connection;
use crate::importer::conflict_handler::DedupKey;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tracing::warn;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value, updated_at)
             VALUES ('global', ?1, ?2, datetime('now'))
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 从 config_kv 表读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .get_config_value(key)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> ConfigResult<String> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: BTreeMap<String, String> = BTreeMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        Ok(serde_json::to_string(&json!(config_map))?)
    }

    // ===== 查询配置 =====

    /// 商品名称搜索的最大返回条数
    ///
    /// # 默认值
    /// - 100（非正数或非法值回退到默认）
    pub fn get_search_max_results(&self) -> ConfigResult<usize> {
        let value = self.get_config_or_default(config_keys::SEARCH_MAX_RESULTS, "100")?;
        match value.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => {
                warn!(value = %value, "search_max_results 配置非法，使用默认值 100");
                Ok(defaults::SEARCH_MAX_RESULTS)
            }
        }
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_dedup_key(&self) -> ConfigResult<DedupKey> {
        let value = self.get_config_or_default(config_keys::IMPORT_DEDUP_KEY, "NAME")?;
        Ok(value.parse::<DedupKey>().unwrap_or_else(|e| {
            warn!(value = %value, error = %e, "去重键配置非法，使用 NAME");
            DedupKey::Name
        }))
    }

    async fn get_dedupe_within_file(&self) -> ConfigResult<bool> {
        let value = self.get_config_or_default(config_keys::IMPORT_DEDUPE_WITHIN_FILE, "false")?;
        Ok(matches!(
            value.trim().to_lowercase().as_str(),
            "1" | "true" | "yes" | "y"
        ))
    }

    async fn get_default_upload_filename(&self) -> ConfigResult<String> {
        let value = self.get_config_or_default(
            config_keys::UPLOAD_DEFAULT_FILENAME,
            defaults::UPLOAD_FILENAME,
        )?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Ok(defaults::UPLOAD_FILENAME.to_string())
        } else {
            Ok(trimmed.to_string())
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 导入
    pub const IMPORT_DEDUP_KEY: &str = "import_dedup_key";
    pub const IMPORT_DEDUPE_WITHIN_FILE: &str = "import_dedupe_within_file";
    pub const UPLOAD_DEFAULT_FILENAME: &str = "upload_default_filename";

    // 查询
    pub const SEARCH_MAX_RESULTS: &str = "search_max_results";
}

/// 默认值
pub mod defaults {
    pub const UPLOAD_FILENAME: &str = "estoque.csv";
    pub const SEARCH_MAX_RESULTS: usize = 100;
}
