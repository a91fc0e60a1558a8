// ==========================================
// 易腐库存管理 - 商品导入 Repository Trait
// ==========================================
// 职责: 定义导入相关数据访问接口（不包含业务逻辑）
// 红线: Repository 不含业务规则，只做数据 CRUD
// ==========================================

use crate::domain::product::{NewProduct, Product};
use crate::domain::upload::{InventoryUpload, NewInventoryUpload};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::collections::HashSet;

// ==========================================
// ProductImportRepository Trait
// ==========================================
// 用途: 商品导入相关数据访问
// 实现者: ProductImportRepositoryImpl（使用 rusqlite）
#[async_trait]
pub trait ProductImportRepository: Send + Sync {
    // ===== 存在性查询 =====

    /// 查询库中已存在的名称（精确匹配）
    ///
    /// # 返回
    /// - 入参中已存在于 products.name 的子集
    async fn find_existing_names(&self, names: Vec<String>) -> RepositoryResult<HashSet<String>>;

    /// 查询库中已存在的编码（精确匹配）
    async fn find_existing_codes(&self, codes: Vec<String>) -> RepositoryResult<HashSet<String>>;

    // ===== 写入 =====

    /// 批量插入商品（事务化）
    ///
    /// # 返回
    /// - Ok(Vec<Product>): 全部插入成功
    /// - Err: 任一条失败，整个事务回滚
    async fn batch_insert_products(&self, products: Vec<NewProduct>) -> RepositoryResult<Vec<Product>>;

    /// 插入单条商品
    async fn insert_product(&self, product: NewProduct) -> RepositoryResult<Product>;

    /// 插入上传记录
    async fn insert_upload(&self, upload: NewInventoryUpload) -> RepositoryResult<InventoryUpload>;
}
