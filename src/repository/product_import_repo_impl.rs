// ==========================================
// 易腐库存管理 - 商品导入 Repository 实现
// ==========================================
// 职责: 实现导入相关数据访问（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::product::{NewProduct, Product};
use crate::domain::upload::{InventoryUpload, NewInventoryUpload};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_import_repo::ProductImportRepository;
use crate::repository::product_repo::insert_product_on;
use crate::repository::upload_repo::insert_upload_on;
use async_trait::async_trait;
use rusqlite::{params_from_iter, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// IN 查询单批参数上限
const LOOKUP_CHUNK_SIZE: usize = 500;

// ==========================================
// ProductImportRepositoryImpl
// ==========================================
pub struct ProductImportRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl ProductImportRepositoryImpl {
    /// 创建新的 Repository 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
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

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 分批 IN 查询指定列中已存在的值
    fn find_existing(&self, column: &str, values: Vec<String>) -> RepositoryResult<HashSet<String>> {
        let unique: Vec<String> = values
            .into_iter()
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();

        let mut found = HashSet::new();
        if unique.is_empty() {
            return Ok(found);
        }

        let conn = self.get_conn()?;
        for chunk in unique.chunks(LOOKUP_CHUNK_SIZE) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT DISTINCT {col} FROM products WHERE {col} IN ({})",
                placeholders,
                col = column
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), |row| row.get::<_, String>(0))?;
            for row in rows {
                found.insert(row?);
            }
        }

        Ok(found)
    }
}

#[async_trait]
impl ProductImportRepository for ProductImportRepositoryImpl {
    async fn find_existing_names(&self, names: Vec<String>) -> RepositoryResult<HashSet<String>> {
        self.find_existing("name", names)
    }

    async fn find_existing_codes(&self, codes: Vec<String>) -> RepositoryResult<HashSet<String>> {
        self.find_existing("code", codes)
    }

    /// 批量插入商品（事务化）
    async fn batch_insert_products(&self, products: Vec<NewProduct>) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let mut created = Vec::with_capacity(products.len());
        for product in &products {
            created.push(insert_product_on(&tx, product)?);
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(created)
    }

    async fn insert_product(&self, product: NewProduct) -> RepositoryResult<Product> {
        let conn = self.get_conn()?;
        insert_product_on(&conn, &product)
    }

    async fn insert_upload(&self, upload: NewInventoryUpload) -> RepositoryResult<InventoryUpload> {
        let conn = self.get_conn()?;
        insert_upload_on(&conn, &upload)
    }
}
