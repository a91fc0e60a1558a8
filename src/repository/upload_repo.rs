// ==========================================
// 易腐库存管理 - 上传记录仓储
// ==========================================
// 红线: 删除上传记录不级联删除商品
// ==========================================

use crate::domain::types::UploadStatus;
use crate::domain::upload::{InventoryUpload, NewInventoryUpload};
use crate::repository::error::{parse_timestamp, RepositoryError, RepositoryResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const UPLOAD_COLUMNS: &str = "id, filename, uploaded_by, products_count, status, uploaded_at";

fn map_upload_row(row: &Row) -> SqliteResult<InventoryUpload> {
    let status: String = row.get(4)?;
    let uploaded_at: String = row.get(5)?;
    Ok(InventoryUpload {
        id: row.get(0)?,
        filename: row.get(1)?,
        uploaded_by: row.get(2)?,
        products_count: row.get(3)?,
        status: UploadStatus::from_db(&status),
        uploaded_at: parse_timestamp(5, &uploaded_at)?,
    })
}

/// 在给定连接上插入上传记录
pub(crate) fn insert_upload_on(
    conn: &Connection,
    upload: &NewInventoryUpload,
) -> RepositoryResult<InventoryUpload> {
    let uploaded_at = Utc::now();
    conn.execute(
        r#"
        INSERT INTO inventory_uploads (filename, uploaded_by, products_count, status, uploaded_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![
            upload.filename,
            upload.uploaded_by,
            upload.products_count,
            upload.status.as_str(),
            uploaded_at.to_rfc3339(),
        ],
    )?;

    Ok(InventoryUpload {
        id: conn.last_insert_rowid(),
        filename: upload.filename.clone(),
        uploaded_by: upload.uploaded_by,
        products_count: upload.products_count,
        status: upload.status,
        uploaded_at,
    })
}

// ==========================================
// InventoryUploadRepository - 上传记录仓储
// ==========================================
pub struct InventoryUploadRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InventoryUploadRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 查询全部上传记录（最新在前）
    pub fn list_all(&self) -> RepositoryResult<Vec<InventoryUpload>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM inventory_uploads ORDER BY uploaded_at DESC, id DESC",
            UPLOAD_COLUMNS
        ))?;

        let uploads = stmt
            .query_map([], map_upload_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(uploads)
    }

    pub fn find_by_id(&self, id: i64) -> RepositoryResult<Option<InventoryUpload>> {
        let conn = self.get_conn()?;
        let upload = conn
            .query_row(
                &format!("SELECT {} FROM inventory_uploads WHERE id = ?1", UPLOAD_COLUMNS),
                params![id],
                map_upload_row,
            )
            .optional()?;
        Ok(upload)
    }

    pub fn insert(&self, upload: &NewInventoryUpload) -> RepositoryResult<InventoryUpload> {
        let conn = self.get_conn()?;
        insert_upload_on(&conn, upload)
    }

    /// 删除上传记录
    ///
    /// # 返回
    /// - Ok(true): 已删除
    /// - Ok(false): 记录不存在
    pub fn delete(&self, id: i64) -> RepositoryResult<bool> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM inventory_uploads WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::NewProduct;
    use crate::repository::product_repo::ProductRepository;

    fn setup() -> (ProductRepository, InventoryUploadRepository) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::init_schema(&conn).unwrap();
        let shared = Arc::new(Mutex::new(conn));
        (
            ProductRepository::from_connection(shared.clone()),
            InventoryUploadRepository::from_connection(shared),
        )
    }

    fn new_upload(filename: &str, count: i64) -> NewInventoryUpload {
        NewInventoryUpload {
            filename: filename.to_string(),
            uploaded_by: 7,
            products_count: count,
            status: UploadStatus::Active,
        }
    }

    #[test]
    fn test_list_newest_first() {
        let (_, uploads) = setup();
        uploads.insert(&new_upload("a.csv", 1)).unwrap();
        uploads.insert(&new_upload("b.csv", 2)).unwrap();

        let listed = uploads.list_all().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].filename, "b.csv");
        assert_eq!(listed[0].status, UploadStatus::Active);
    }

    #[test]
    fn test_delete_does_not_cascade() {
        let (products, uploads) = setup();
        products.insert(&NewProduct::new("Leite")).unwrap();
        let upload = uploads.insert(&new_upload("estoque.csv", 1)).unwrap();

        assert!(uploads.delete(upload.id).unwrap());
        assert!(!uploads.delete(upload.id).unwrap());
        assert!(uploads.find_by_id(upload.id).unwrap().is_none());
        assert_eq!(products.count().unwrap(), 1);
    }
}
