// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、调用方、夹具读取
// ==========================================

#![allow(dead_code)]

use perishable_inventory::domain::types::{Caller, UserRole};
use rusqlite::{params, Connection};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = perishable_inventory::db::open_sqlite_connection(&db_path)?;
    perishable_inventory::db::init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入全局配置项
pub fn set_config(db_path: &str, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    conn.execute(
        r#"
        INSERT INTO config_kv (scope_id, key, value, updated_at)
        VALUES ('global', ?1, ?2, datetime('now'))
        ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value
        "#,
        params![key, value],
    )?;
    Ok(())
}

/// 读取 tests/fixtures 下的夹具文件
pub fn read_fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("读取夹具失败 {}: {}", path, e))
}

pub fn fixture_path(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn moderator() -> Caller {
    Caller::moderator(1)
}

pub fn regular_user() -> Caller {
    Caller::new(2, UserRole::User)
}
