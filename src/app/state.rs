// ==========================================
// 易腐库存管理 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ExpirationApi, ImportApi, ProductApi};
use crate::config::ConfigManager;
use crate::importer::{InventoryImporter, InventoryImporterImpl};
use crate::repository::{
    InventoryUploadRepository, ProductEntryRepository, ProductImportRepositoryImpl,
    ProductRepository,
};

/// 应用状态
///
/// 所有仓储共享同一个连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 库存上传API
    pub import_api: Arc<ImportApi>,

    /// 商品与批次API
    pub product_api: Arc<ProductApi>,

    /// 效期API
    pub expiration_api: Arc<ExpirationApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState，数据库路径: {}", db_path);

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        Self::from_connection(db_path, conn)
    }

    /// 基于内存数据库创建（CLI 试运行与测试）
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory().map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::configure_sqlite_connection(&conn)
            .map_err(|e| format!("无法配置数据库: {}", e))?;
        Self::from_connection(":memory:".to_string(), conn)
    }

    fn from_connection(db_path: String, conn: Connection) -> Result<Self, String> {
        crate::db::init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let product_repo = Arc::new(ProductRepository::from_connection(conn.clone()));
        let entry_repo = Arc::new(ProductEntryRepository::from_connection(conn.clone()));
        let upload_repo = Arc::new(InventoryUploadRepository::from_connection(conn.clone()));
        let import_repo = ProductImportRepositoryImpl::from_connection(conn.clone());

        // ==========================================
        // 配置与导入器
        // ==========================================
        let config_manager = Arc::new(
            ConfigManager::from_connection(conn.clone())
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );
        let importer_config = ConfigManager::from_connection(conn)
            .map_err(|e| format!("无法创建ConfigManager: {}", e))?;
        let importer: Arc<dyn InventoryImporter> =
            Arc::new(InventoryImporterImpl::with_defaults(import_repo, importer_config));

        // ==========================================
        // 初始化API层
        // ==========================================
        let import_api = Arc::new(ImportApi::new(
            importer,
            upload_repo,
            config_manager.clone(),
        ));
        let product_api = Arc::new(ProductApi::new(
            product_repo,
            entry_repo.clone(),
            config_manager.clone(),
        ));
        let expiration_api = Arc::new(ExpirationApi::new(entry_repo));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            import_api,
            product_api,
            expiration_api,
            config_manager,
        })
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 PERISHABLE_INVENTORY_DB_PATH > 用户数据目录 > 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    if let Ok(path) = std::env::var("PERISHABLE_INVENTORY_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./perishable_inventory.db");

    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("perishable-inventory");
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("perishable_inventory.db");
        }
    }

    path.to_string_lossy().to_string()
}
