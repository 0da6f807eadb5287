//! 产品管理

pub mod handler;
pub mod model;
pub mod service;

use axum::{routing::get, Router};

use handler::AppState;

/// 产品 CRUD 路由
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/products",
            get(handler::list_products).post(handler::create_product),
        )
        .route(
            "/api/products/:id",
            get(handler::get_product)
                .put(handler::update_product)
                .delete(handler::delete_product),
        )
}
