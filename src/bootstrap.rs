//! 启动流程
//!
//! `Connecting -> (空库? -> Seeding ->) Ready`，全部完成后才开始监听。

use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::infrastructure::memory_store::InMemoryProductStore;
use crate::infrastructure::snapshot::{read_seed, SeedError};
use crate::infrastructure::store::{ProductStore, StoreError};

/// 启动阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Connecting,
    Seeding,
    Ready,
}

/// 种子加载错误
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Seed(#[from] SeedError),
    #[error("failed to insert seed records: {0}")]
    Store(#[from] StoreError),
}

/// 种子加载结果
#[derive(Debug, PartialEq, Eq)]
pub enum SeedOutcome {
    /// 存储非空，未加载
    Skipped { existing: u64 },
    Seeded { inserted: usize },
}

/// 按配置连接存储；`memory://` 使用内存存储
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    info!(stage = ?Stage::Connecting, "Connecting to product store");

    if config.is_memory() {
        info!("Using in-memory product store");
        return Ok(Arc::new(InMemoryProductStore::new()));
    }

    connect_database(config).await
}

#[cfg(feature = "database")]
async fn connect_database(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    use crate::infrastructure::postgres_store::PgProductStore;

    let store = PgProductStore::connect(config).await?;
    info!("Connected to database");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "database"))]
async fn connect_database(config: &DatabaseConfig) -> Result<Arc<dyn ProductStore>, StoreError> {
    Err(StoreError::Unavailable(format!(
        "{} requires the `database` feature",
        config.redacted_url()
    )))
}

/// 存储为空时从种子文件批量导入
pub async fn seed_if_empty(
    store: &dyn ProductStore,
    seed_path: &Path,
) -> Result<SeedOutcome, BootstrapError> {
    let existing = store.count().await?;
    if existing > 0 {
        info!("Store already contains {} products, skipping seed", existing);
        return Ok(SeedOutcome::Skipped { existing });
    }

    info!(stage = ?Stage::Seeding, "Loading initial data from {}", seed_path.display());
    let products = read_seed(seed_path).await?;
    let inserted = store.insert_many(products).await?;
    info!("Initial data loaded ({} products)", inserted);

    Ok(SeedOutcome::Seeded { inserted })
}

/// 执行种子阶段；失败只记录日志并返回，服务照常启动
pub async fn prepare(
    store: &dyn ProductStore,
    seed_path: &Path,
) -> Result<SeedOutcome, BootstrapError> {
    let result = seed_if_empty(store, seed_path).await;
    match &result {
        Ok(_) => {}
        Err(BootstrapError::Seed(SeedError::Read { path, source }))
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            warn!("Seed file {} not found, starting with an empty store", path.display());
        }
        Err(err) => error!("Failed to load initial data: {}", err),
    }

    info!(stage = ?Stage::Ready, "Product store ready");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::{Product, ProductFields};
    use crate::infrastructure::snapshot::SnapshotWriter;

    fn product(name: &str) -> Product {
        Product::new(ProductFields {
            name: Some(name.to_string()),
            price: Some(3.0),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_seeds_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let seed = vec![product("a"), product("b"), product("c")];
        SnapshotWriter::new(&path).write(&seed).await.unwrap();

        let store = InMemoryProductStore::new();
        let outcome = seed_if_empty(&store, &path).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Seeded { inserted: 3 });
        assert_eq!(store.count().await.unwrap(), 3);
        assert_eq!(store.find_all().await.unwrap(), seed);
    }

    #[tokio::test]
    async fn test_skips_non_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        SnapshotWriter::new(&path)
            .write(&[product("a"), product("b")])
            .await
            .unwrap();

        let store = InMemoryProductStore::with_products(vec![product("existing")]);
        let outcome = seed_if_empty(&store, &path).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Skipped { existing: 1 });
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_accepts_foreign_seed_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(
            &path,
            r#"[
                {"_id": "65a1f0c2e4b0a1b2c3d4e5f6", "name": "Lamp", "price": 19.5, "__v": 0},
                {"name": "Chair", "price": 45, "imageUrl": "http://x/c.png"}
            ]"#,
        )
        .unwrap();

        let store = InMemoryProductStore::new();
        let outcome = seed_if_empty(&store, &path).await.unwrap();

        assert_eq!(outcome, SeedOutcome::Seeded { inserted: 2 });
        let all = store.find_all().await.unwrap();
        assert_eq!(all[0].name.as_deref(), Some("Lamp"));
        assert_eq!(all[1].image_url.as_deref(), Some("http://x/c.png"));
    }

    #[tokio::test]
    async fn test_prepare_reports_bad_seed() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryProductStore::new();

        let missing = prepare(&store, &dir.path().join("missing.json")).await;
        assert!(matches!(
            missing,
            Err(BootstrapError::Seed(SeedError::Read { .. }))
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "not json").unwrap();
        let malformed = prepare(&store, &path).await;
        assert!(matches!(
            malformed,
            Err(BootstrapError::Seed(SeedError::Parse { .. }))
        ));
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_prepare_returns_seed_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        SnapshotWriter::new(&path)
            .write(&[product("a"), product("b")])
            .await
            .unwrap();

        let store = InMemoryProductStore::new();
        let first = prepare(&store, &path).await.unwrap();
        assert_eq!(first, SeedOutcome::Seeded { inserted: 2 });

        let second = prepare(&store, &path).await.unwrap();
        assert_eq!(second, SeedOutcome::Skipped { existing: 2 });
    }

    #[tokio::test]
    async fn test_seed_with_duplicate_ids_leaves_store_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");
        let id = uuid::Uuid::new_v4();
        std::fs::write(
            &path,
            format!(r#"[{{"_id": "{id}", "name": "a"}}, {{"_id": "{id}", "name": "b"}}]"#),
        )
        .unwrap();

        let store = InMemoryProductStore::new();
        let result = seed_if_empty(&store, &path).await;

        assert!(matches!(result, Err(BootstrapError::Store(_))));
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(store.find_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_connect_memory_store() {
        let config = DatabaseConfig {
            url: "memory://".to_string(),
            ..Default::default()
        };
        let store = connect(&config).await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
