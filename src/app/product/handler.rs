//! 产品处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::warn;
use uuid::Uuid;

use super::{
    model::{CreateProductRequest, Product, UpdateProductRequest},
    service::{Mutation, ProductService},
};
use crate::core::{
    error::CoreError,
    extract::ValidatedJson,
    response::{HealthResponse, MessageResponse, PRODUCT_DELETED},
};

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    /// 快照失败时是否让请求失败
    pub fail_on_snapshot_error: bool,
}

impl AppState {
    pub fn new(product_service: ProductService) -> Self {
        Self {
            product_service,
            fail_on_snapshot_error: false,
        }
    }

    pub fn with_fail_on_snapshot_error(mut self, fail: bool) -> Self {
        self.fail_on_snapshot_error = fail;
        self
    }

    fn settle(&self, mutation: Mutation<Product>) -> Result<Product, CoreError> {
        let Mutation { value, snapshot } = mutation;
        if let Err(err) = snapshot.into_result() {
            if self.fail_on_snapshot_error {
                return Err(err.into());
            }
            warn!("Snapshot is stale after writing product {}: {}", value.id, err);
        }
        Ok(value)
    }
}

fn parse_id(raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw).map_err(|_| CoreError::BadRequest(format!("Invalid product id: {}", raw)))
}

pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let mutation = state.product_service.create_product(payload.into()).await?;
    let product = state.settle(mutation)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    let id = parse_id(&id)?;
    let product = state
        .product_service
        .get_product(id)
        .await?
        .ok_or_else(CoreError::product_not_found)?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateProductRequest>,
) -> Result<Json<Product>, CoreError> {
    let id = parse_id(&id)?;
    let mutation = state
        .product_service
        .update_product(id, payload.into())
        .await?
        .ok_or_else(CoreError::product_not_found)?;
    Ok(Json(state.settle(mutation)?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, CoreError> {
    let id = parse_id(&id)?;
    let mutation = state
        .product_service
        .delete_product(id)
        .await?
        .ok_or_else(CoreError::product_not_found)?;
    state.settle(mutation)?;
    Ok(Json(MessageResponse::new(PRODUCT_DELETED)))
}

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, CoreError> {
    let products = state.product_service.count().await?;
    Ok(Json(HealthResponse::healthy(products)))
}
