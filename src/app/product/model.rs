//! 产品数据模型

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 产品记录
///
/// 序列化字段顺序即快照文件中的字段顺序，缺省字段不输出。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// 以给定字段构造新记录，分配标识符和时间戳
    pub fn new(fields: ProductFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: fields.name,
            price: fields.price,
            description: fields.description,
            image_url: fields.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// 整体替换四个可变字段，未提供的字段被清空
    pub fn replace_fields(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.price = fields.price;
        self.description = fields.description;
        self.image_url = fields.image_url;
        self.updated_at = Utc::now();
    }

    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            price: self.price,
            description: self.description.clone(),
            image_url: self.image_url.clone(),
        }
    }
}

/// 产品的四个可变字段
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFields {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// 创建产品请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    pub name: Option<String>,

    #[validate(
        required(message = "price is required"),
        range(min = 0.0, message = "price must not be negative")
    )]
    pub price: Option<f64>,

    pub description: Option<String>,

    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl From<CreateProductRequest> for ProductFields {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            description: req.description,
            image_url: req.image_url,
        }
    }
}

/// 更新产品请求
///
/// 更新是整体替换：请求中省略的字段在存储结果中变为空。
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: Option<String>,

    #[validate(range(min = 0.0, message = "price must not be negative"))]
    pub price: Option<f64>,

    pub description: Option<String>,

    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

impl From<UpdateProductRequest> for ProductFields {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            name: req.name,
            price: req.price,
            description: req.description,
            image_url: req.image_url,
        }
    }
}

/// 种子文件中的一条记录
///
/// 快照文件同时作为种子来源，因此接受 `_id` 和时间戳，其余未知字段忽略。
#[derive(Debug, Clone, Deserialize)]
pub struct SeedRecord {
    #[serde(rename = "_id", default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "imageUrl", default)]
    pub image_url: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl SeedRecord {
    /// 转换为产品记录；非 UUID 的 `_id` 会被替换为新分配的标识符
    pub fn into_product(self) -> Product {
        let now = Utc::now();
        let id = self
            .id
            .as_ref()
            .and_then(|v| v.as_str())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);
        let created_at = self.created_at.unwrap_or(now);

        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            image_url: self.image_url,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}
