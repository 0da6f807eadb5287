//! 应用层

pub mod product;

use axum::{error_handling::HandleErrorLayer, middleware, routing::get, BoxError, Router};
use std::time::Duration;
use tower::{timeout::error::Elapsed, ServiceBuilder};
use tower_http::trace::TraceLayer;

use crate::core::{error::CoreError, middleware::request_logging_middleware};
use product::handler::{self, AppState};

/// 组装完整路由及中间件
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    let router = Router::new()
        .route("/health", get(handler::health_check))
        .merge(product::routes());

    with_request_timeout(router, request_timeout)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware)),
        )
        .with_state(state)
}

/// 超时的请求返回 408 `{"message"}`
fn with_request_timeout<S>(router: Router<S>, timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(timeout),
    )
}

async fn handle_timeout_error(err: BoxError) -> CoreError {
    if err.is::<Elapsed>() {
        CoreError::RequestTimeout
    } else {
        CoreError::InternalServerError(err.to_string())
    }
}
