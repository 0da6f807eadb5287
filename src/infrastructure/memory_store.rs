//! 内存存储
//!
//! 以插入顺序保存记录，用于测试以及 `memory://` 数据库地址。

use async_trait::async_trait;
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::store::{ProductStore, StoreError};
use crate::app::product::model::{Product, ProductFields};

#[derive(Default)]
pub struct InMemoryProductStore {
    products: RwLock<Vec<Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: RwLock::new(products),
        }
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn insert_one(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let product = Product::new(fields);
        self.products.write().await.push(product.clone());
        Ok(product)
    }

    async fn insert_many(&self, products: Vec<Product>) -> Result<usize, StoreError> {
        let mut guard = self.products.write().await;
        // 批内重复与已存在的标识符都拒绝，整批不插入
        let mut seen: HashSet<Uuid> = guard.iter().map(|p| p.id).collect();
        for product in &products {
            if !seen.insert(product.id) {
                return Err(StoreError::Unavailable(format!(
                    "duplicate product id {}",
                    product.id
                )));
            }
        }
        let inserted = products.len();
        guard.extend(products);
        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        Ok(self.products.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        Ok(self
            .products
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        let mut guard = self.products.write().await;
        Ok(guard.iter_mut().find(|p| p.id == id).map(|product| {
            product.replace_fields(fields);
            product.clone()
        }))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let mut guard = self.products.write().await;
        Ok(guard
            .iter()
            .position(|p| p.id == id)
            .map(|index| guard.remove(index)))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        Ok(self.products.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(name: &str) -> ProductFields {
        ProductFields {
            name: Some(name.to_string()),
            price: Some(1.5),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_preserve_order() {
        let store = InMemoryProductStore::new();
        let a = store.insert_one(fields("a")).await.unwrap();
        let b = store.insert_one(fields("b")).await.unwrap();

        let all = store.find_all().await.unwrap();
        assert_eq!(all, vec![a.clone(), b]);
        assert_eq!(store.find_by_id(a.id).await.unwrap(), Some(a));
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_return_none() {
        let store = InMemoryProductStore::new();
        let id = Uuid::new_v4();

        assert!(store.update_by_id(id, fields("x")).await.unwrap().is_none());
        assert!(store.delete_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let store = InMemoryProductStore::new();
        let a = store.insert_one(fields("a")).await.unwrap();

        let removed = store.delete_by_id(a.id).await.unwrap();
        assert_eq!(removed, Some(a));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insert_many_rejects_duplicate_ids() {
        let existing = Product::new(fields("a"));
        let store = InMemoryProductStore::with_products(vec![existing.clone()]);

        let err = store.insert_many(vec![existing]).await.unwrap_err();
        assert!(err.to_string().contains("duplicate product id"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_many_rejects_duplicates_within_batch() {
        let store = InMemoryProductStore::new();
        let first = Product::new(fields("a"));
        let mut second = Product::new(fields("b"));
        second.id = first.id;
        let other = Product::new(fields("c"));

        let err = store
            .insert_many(vec![other, first.clone(), second])
            .await
            .unwrap_err();

        assert!(err.to_string().contains(&first.id.to_string()));
        // 整批不插入
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
