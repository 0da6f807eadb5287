//! 产品存储抽象
//!
//! 处理器只依赖 [`ProductStore`]，具体存储（PostgreSQL 或内存）在启动时注入。

use async_trait::async_trait;
use uuid::Uuid;

use crate::app::product::model::{Product, ProductFields};

/// 存储错误类型
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 插入一条记录，由存储分配标识符
    async fn insert_one(&self, fields: ProductFields) -> Result<Product, StoreError>;

    /// 批量插入完整记录（保留已有标识符），返回插入数量
    async fn insert_many(&self, products: Vec<Product>) -> Result<usize, StoreError>;

    /// 按插入顺序返回全部记录
    async fn find_all(&self) -> Result<Vec<Product>, StoreError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// 整体替换可变字段，返回更新后的记录
    async fn update_by_id(
        &self,
        id: Uuid,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError>;

    /// 删除记录，返回被删除的记录
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;

    /// 释放底层连接
    async fn close(&self) {}
}
