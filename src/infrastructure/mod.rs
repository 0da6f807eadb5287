//! 基础设施层：存储、快照、日志

#[cfg(feature = "database")]
pub mod database;
pub mod logger;
pub mod memory_store;
#[cfg(feature = "database")]
pub mod postgres_store;
pub mod snapshot;
pub mod store;
