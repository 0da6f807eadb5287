//! # 产品目录服务
//!
//! 基于 Axum 的产品 CRUD 服务：
//! - 五个 `/api/products` 路由映射到存储的增删改查
//! - 每次写操作后把完整集合快照到 JSON 文件
//! - 启动时若存储为空，从同一个快照文件导入初始数据

pub mod app;
pub mod bootstrap;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::create_router;
pub use app::product::handler::AppState;
pub use app::product::model::{Product, ProductFields};
pub use app::product::service::ProductService;
pub use infrastructure::snapshot::SnapshotWriter;
pub use infrastructure::store::{ProductStore, StoreError};
