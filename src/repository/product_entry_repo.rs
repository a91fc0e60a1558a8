// ==========================================
// 易腐库存管理 - 批次数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 说明: is_expired 在插入时按创建时刻写入快照，之后仅通过 set_expired 修改
// ==========================================

use crate::domain::product::Product;
use crate::domain::product_entry::{NewProductEntry, ProductEntry};
use crate::repository::error::{parse_date, parse_timestamp, RepositoryError, RepositoryResult};
use chrono::{DateTime, Local, Utc};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const ENTRY_COLUMNS: &str = "id, product_id, expiration_date, quantity, notes, is_expired, created_at";

/// 行 → ProductEntry（从 offset 列开始）
fn map_entry_row(row: &Row, offset: usize) -> SqliteResult<ProductEntry> {
    let expiration_date: String = row.get(offset + 2)?;
    let created_at: String = row.get(offset + 6)?;
    Ok(ProductEntry {
        id: row.get(offset)?,
        product_id: row.get(offset + 1)?,
        expiration_date: parse_date(offset + 2, &expiration_date)?,
        quantity: row.get(offset + 3)?,
        notes: row.get(offset + 4)?,
        is_expired: row.get::<_, i32>(offset + 5)? != 0,
        created_at: parse_timestamp(offset + 6, &created_at)?,
    })
}

// ==========================================
// ProductEntryRepository - 批次仓储
// ==========================================
pub struct ProductEntryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductEntryRepository {
    /// 创建新的 ProductEntryRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部批次（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ProductEntry>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM product_entries ORDER BY id ASC",
            ENTRY_COLUMNS
        ))?;

        let entries = stmt
            .query_map([], |row| map_entry_row(row, 0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(entries)
    }

    /// 按主键查询
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<ProductEntry>> {
        let conn = self.get_conn()?;
        let entry = conn
            .query_row(
                &format!("SELECT {} FROM product_entries WHERE id = ?1", ENTRY_COLUMNS),
                params![id],
                |row| map_entry_row(row, 0),
            )
            .optional()?;
        Ok(entry)
    }

    /// 插入批次（创建时刻取当前本地时间）
    pub fn insert(&self, entry: &NewProductEntry) -> RepositoryResult<ProductEntry> {
        self.insert_at(entry, Local::now())
    }

    /// 插入批次（指定创建时刻）
    ///
    /// # 说明
    /// - quantity 缺省为 1，必须 >= 1
    /// - is_expired = 效期当天 00:00 早于创建时刻（本地时间）
    /// - product_id 不存在时返回 ForeignKeyViolation
    pub fn insert_at(
        &self,
        entry: &NewProductEntry,
        created_at: DateTime<Local>,
    ) -> RepositoryResult<ProductEntry> {
        let quantity = entry.effective_quantity();
        if quantity < 1 {
            return Err(RepositoryError::FieldValueError {
                field: "quantity".to_string(),
                message: format!("数量必须 >= 1，实际 {}", quantity),
            });
        }

        let is_expired =
            ProductEntry::expired_at_creation(entry.expiration_date, created_at.naive_local());
        let created_at_utc: DateTime<Utc> = created_at.with_timezone(&Utc);
        let notes = entry
            .notes
            .as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO product_entries (
                product_id, expiration_date, quantity, notes, is_expired, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                entry.product_id,
                entry.expiration_date.format("%Y-%m-%d").to_string(),
                quantity,
                notes,
                is_expired as i32,
                created_at_utc.to_rfc3339(),
            ],
        )?;

        Ok(ProductEntry {
            id: conn.last_insert_rowid(),
            product_id: entry.product_id,
            expiration_date: entry.expiration_date,
            quantity,
            notes,
            is_expired,
            created_at: created_at_utc,
        })
    }

    /// 设置过期标记
    ///
    /// # 返回
    /// - Ok(Some(ProductEntry)): 更新后的批次
    /// - Ok(None): 批次不存在（无任何修改）
    pub fn set_expired(&self, id: i64, is_expired: bool) -> RepositoryResult<Option<ProductEntry>> {
        {
            let conn = self.get_conn()?;
            let affected = conn.execute(
                "UPDATE product_entries SET is_expired = ?1 WHERE id = ?2",
                params![is_expired as i32, id],
            )?;
            if affected == 0 {
                return Ok(None);
            }
        }
        self.find_by_id(id)
    }

    /// 查询批次及其商品（内连接，孤儿批次被跳过）
    pub fn list_with_products(&self) -> RepositoryResult<Vec<(Product, ProductEntry)>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT
                p.id, p.name, p.code, p.category, p.created_at,
                e.id, e.product_id, e.expiration_date, e.quantity, e.notes, e.is_expired, e.created_at
            FROM product_entries e
            INNER JOIN products p ON p.id = e.product_id
            ORDER BY e.id ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row| {
                let product = crate::repository::product_repo::map_product_row(row)?;
                let entry = map_entry_row(row, 5)?;
                Ok((product, entry))
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(rows)
    }
}
