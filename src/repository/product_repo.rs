// ==========================================
// 易腐库存管理 - 商品数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::product::{NewProduct, Product};
use crate::repository::error::{parse_timestamp, RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const PRODUCT_COLUMNS: &str = "id, name, code, category, created_at";

/// 行 → Product
pub(crate) fn map_product_row(row: &Row) -> SqliteResult<Product> {
    let created_at: String = row.get(4)?;
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        category: row.get(3)?,
        created_at: parse_timestamp(4, &created_at)?,
    })
}

/// 在给定连接上插入一条商品（供事务内复用）
pub(crate) fn insert_product_on(conn: &Connection, product: &NewProduct) -> RepositoryResult<Product> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO products (name, code, category, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            product.name,
            product.code,
            product.category,
            created_at.to_rfc3339()
        ],
    )?;

    Ok(Product {
        id: conn.last_insert_rowid(),
        name: product.name.clone(),
        code: product.code.clone(),
        category: product.category.clone(),
        created_at,
    })
}

// ==========================================
// ProductRepository - 商品仓储
// ==========================================
/// 商品仓储
/// 职责: 管理 products 表的查询与插入
/// 红线: 不提供更新路径（商品创建后不可修改）
pub struct ProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ProductRepository {
    /// 创建新的 ProductRepository 实例
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

    /// 查询全部商品（按 id 升序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products ORDER BY id ASC",
            PRODUCT_COLUMNS
        ))?;

        let products = stmt
            .query_map([], map_product_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(products)
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(Product)): 找到
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                &format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS),
                params![id],
                map_product_row,
            )
            .optional()?;
        Ok(product)
    }

    /// 按名称精确查询（同名可能有多条，取最早一条）
    pub fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Product>> {
        let conn = self.get_conn()?;
        let product = conn
            .query_row(
                &format!(
                    "SELECT {} FROM products WHERE name = ?1 ORDER BY id ASC LIMIT 1",
                    PRODUCT_COLUMNS
                ),
                params![name],
                map_product_row,
            )
            .optional()?;
        Ok(product)
    }

    /// 名称子串搜索（不区分大小写，按 Unicode 小写比较）
    ///
    /// # 参数
    /// - `query`: 搜索词（按字面子串匹配）
    /// - `limit`: 最大返回条数
    pub fn search_by_name(&self, query: &str, limit: usize) -> RepositoryResult<Vec<Product>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let needle = query.to_lowercase();
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM products ORDER BY id ASC",
            PRODUCT_COLUMNS
        ))?;

        let mut found = Vec::new();
        let rows = stmt.query_map([], map_product_row)?;
        for row in rows {
            let product = row?;
            if product.name.to_lowercase().contains(&needle) {
                found.push(product);
                if found.len() >= limit {
                    break;
                }
            }
        }
        Ok(found)
    }

    /// 插入单条商品
    pub fn insert(&self, product: &NewProduct) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        insert_product_on(&conn, product)
    }

    /// 商品总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> ProductRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        ProductRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_insert_and_find() {
        let repo = repo();
        let created = repo
            .insert(&NewProduct::new("Leite Integral").with_code("1001"))
            .unwrap();

        assert!(created.id > 0);
        let found = repo.find_by_id(created.id).unwrap().unwrap();
        assert_eq!(found.name, "Leite Integral");
        assert_eq!(found.code.as_deref(), Some("1001"));
        assert!(repo.find_by_id(9999).unwrap().is_none());
        assert_eq!(repo.find_by_name("Leite Integral").unwrap().unwrap().id, created.id);
        assert!(repo.find_by_name("leite integral").unwrap().is_none());
    }

    #[test]
    fn test_search_case_insensitive_with_limit() {
        let repo = repo();
        for name in ["Leite Integral", "LEITE Desnatado", "Queijo", "Doce de leite"] {
            repo.insert(&NewProduct::new(name)).unwrap();
        }

        let found = repo.search_by_name("leite", 100).unwrap();
        assert_eq!(found.len(), 3);

        let capped = repo.search_by_name("leite", 2).unwrap();
        assert_eq!(capped.len(), 2);
    }

    #[test]
    fn test_search_unicode_case() {
        let repo = repo();
        repo.insert(&NewProduct::new("PÃO FRANCÊS")).unwrap();

        let found = repo.search_by_name("pão", 100).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let repo = repo();
        repo.insert(&NewProduct::new("Leite 100%")).unwrap();
        repo.insert(&NewProduct::new("Leite 1000")).unwrap();

        let found = repo.search_by_name("100%", 100).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Leite 100%");
    }

    #[test]
    fn test_same_name_allowed() {
        let repo = repo();
        repo.insert(&NewProduct::new("Leite")).unwrap();
        repo.insert(&NewProduct::new("Leite")).unwrap();
        assert_eq!(repo.count().unwrap(), 2);
    }
}
