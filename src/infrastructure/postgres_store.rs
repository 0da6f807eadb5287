//! PostgreSQL 产品存储

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use tracing::info;
use uuid::Uuid;

use super::database::DatabaseManager;
use super::store::{ProductStore, StoreError};
use crate::app::product::model::{Product, ProductFields};
use crate::config::DatabaseConfig;

const COLUMNS: &str = "id, name, price, description, image_url, created_at, updated_at";

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: Option<String>,
    price: Option<f64>,
    description: Option<String>,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: row.price,
            description: row.description,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    /// 建立连接池并确保表存在
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!("Connecting to database: {}", config.redacted_url());

        let manager = DatabaseManager::new(config).await?;
        manager.create_tables().await?;

        Ok(Self {
            pool: manager.into_pool(),
        })
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn insert_one(&self, fields: ProductFields) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (id, name, price, description, image_url) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(fields.name)
        .bind(fields.price)
        .bind(fields.description)
        .bind(fields.image_url)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn insert_many(&self, products: Vec<Product>) -> Result<usize, StoreError> {
        let mut tx = self.pool.begin().await?;
        let inserted = products.len();

        for product in products {
            sqlx::query(
                "INSERT INTO products \
                 (id, name, price, description, image_url, created_at, updated_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(product.id)
            .bind(product.name)
            .bind(product.price)
            .bind(product.description)
            .bind(product.image_url)
            .bind(product.created_at)
            .bind(product.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(inserted)
    }

    async fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products ORDER BY seq"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        fields: ProductFields,
    ) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET name = $1, price = $2, description = $3, image_url = $4, \
             updated_at = NOW() WHERE id = $5 RETURNING {COLUMNS}"
        ))
        .bind(fields.name)
        .bind(fields.price)
        .bind(fields.description)
        .bind(fields.image_url)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0 as u64)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
