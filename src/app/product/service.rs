//! 产品业务服务
//!
//! 每个写操作是一个两阶段流水线：先写存储，再刷新快照。
//! 快照结果单独返回，存储写入不会因快照失败而回滚。

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::model::{Product, ProductFields};
use crate::infrastructure::snapshot::{SnapshotOutcome, SnapshotWriter};
use crate::infrastructure::store::{ProductStore, StoreError};

/// 写操作结果：存储写入的值加上随后的快照结果
#[derive(Debug)]
pub struct Mutation<T> {
    pub value: T,
    pub snapshot: SnapshotOutcome,
}

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn ProductStore>,
    snapshot: Arc<SnapshotWriter>,
}

impl ProductService {
    pub fn new(store: Arc<dyn ProductStore>, snapshot: Arc<SnapshotWriter>) -> Self {
        Self { store, snapshot }
    }

    pub async fn create_product(
        &self,
        fields: ProductFields,
    ) -> Result<Mutation<Product>, StoreError> {
        let product = self.store.insert_one(fields).await?;
        info!("Created product {}", product.id);
        Ok(self.after_write(product).await)
    }

    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        self.store.find_all().await
    }

    pub async fn get_product(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        self.store.find_by_id(id).await
    }

    /// 整体替换可变字段；记录不存在时返回 `None`，且不刷新快照
    pub async fn update_product(
        &self,
        id: Uuid,
        fields: ProductFields,
    ) -> Result<Option<Mutation<Product>>, StoreError> {
        match self.store.update_by_id(id, fields).await? {
            Some(product) => {
                info!("Updated product {}", product.id);
                Ok(Some(self.after_write(product).await))
            }
            None => Ok(None),
        }
    }

    pub async fn delete_product(
        &self,
        id: Uuid,
    ) -> Result<Option<Mutation<Product>>, StoreError> {
        match self.store.delete_by_id(id).await? {
            Some(product) => {
                info!("Deleted product {}", product.id);
                Ok(Some(self.after_write(product).await))
            }
            None => Ok(None),
        }
    }

    pub async fn count(&self) -> Result<u64, StoreError> {
        self.store.count().await
    }

    async fn after_write(&self, value: Product) -> Mutation<Product> {
        let snapshot = self.snapshot.refresh(self.store.as_ref()).await;
        Mutation { value, snapshot }
    }
}
