//! 快照文件
//!
//! 每次成功的写操作之后，把整个产品集合以格式化 JSON 覆盖写入同一个文件。
//! 该文件在启动时也作为种子来源。

use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::store::{ProductStore, StoreError};
use crate::app::product::model::{Product, SeedRecord};

/// 快照错误类型
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read products for snapshot: {0}")]
    Store(#[from] StoreError),
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 一次快照写入的结果
///
/// 写操作本身已经成功，调用方决定失败时是返回错误还是仅记录日志。
#[derive(Debug)]
pub enum SnapshotOutcome {
    Written { records: usize },
    Failed(SnapshotError),
}

impl SnapshotOutcome {
    pub fn into_result(self) -> Result<usize, SnapshotError> {
        match self {
            SnapshotOutcome::Written { records } => Ok(records),
            SnapshotOutcome::Failed(err) => Err(err),
        }
    }
}

pub struct SnapshotWriter {
    path: PathBuf,
    // 串行化 读集合 -> 写文件，避免较慢的刷新用旧数据覆盖较新的快照
    lock: Mutex<()>,
}

impl SnapshotWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 从存储读取完整集合并覆盖快照文件
    pub async fn refresh(&self, store: &dyn ProductStore) -> SnapshotOutcome {
        let _guard = self.lock.lock().await;

        let result = match store.find_all().await {
            Ok(products) => self.write(&products).await,
            Err(err) => Err(err.into()),
        };

        match result {
            Ok(records) => {
                debug!("Snapshot written to {} ({} records)", self.path.display(), records);
                SnapshotOutcome::Written { records }
            }
            Err(err) => {
                warn!("Snapshot write failed: {}", err);
                SnapshotOutcome::Failed(err)
            }
        }
    }

    /// 写入给定集合：先写同目录下的临时文件，再原子替换
    pub async fn write(&self, products: &[Product]) -> Result<usize, SnapshotError> {
        let content = serde_json::to_vec_pretty(products)?;
        let tmp_path = self.tmp_path();

        let io_err = |source: io::Error| SnapshotError::Io {
            path: self.path.clone(),
            source,
        };

        tokio::fs::write(&tmp_path, &content).await.map_err(io_err)?;
        if let Err(err) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(io_err(err));
        }

        Ok(products.len())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// 种子文件读取错误
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// 读取并解析种子文件（JSON 数组）
pub async fn read_seed(path: &Path) -> Result<Vec<Product>, SeedError> {
    let raw = tokio::fs::read(path).await.map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let records: Vec<SeedRecord> =
        serde_json::from_slice(&raw).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(records.into_iter().map(SeedRecord::into_product).collect())
}
