//! 核心响应处理模块

use serde::{Deserialize, Serialize};

pub const PRODUCT_DELETED: &str = "Product deleted successfully";

/// `{"message": ...}` 响应体，用于删除确认以及所有错误
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products: u64,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy(products: u64) -> Self {
        Self {
            status: "healthy",
            products,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
