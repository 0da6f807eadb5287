//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::MessageResponse;
use crate::infrastructure::snapshot::SnapshotError;
use crate::infrastructure::store::StoreError;

pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// 核心错误类型
#[derive(Debug)]
pub enum CoreError {
    BadRequest(String),
    NotFound(String),
    RequestTimeout,
    InternalServerError(String),
}

impl CoreError {
    pub fn product_not_found() -> Self {
        CoreError::NotFound(PRODUCT_NOT_FOUND.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            CoreError::BadRequest(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            CoreError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            CoreError::BadRequest(msg) | CoreError::NotFound(msg) => msg,
            CoreError::RequestTimeout => "Request timed out".to_string(),
            CoreError::InternalServerError(msg) => {
                error!("Internal error: {}", msg);
                msg
            }
        };

        (status, Json(MessageResponse::new(message))).into_response()
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::InternalServerError(err.to_string())
    }
}

impl From<SnapshotError> for CoreError {
    fn from(err: SnapshotError) -> Self {
        CoreError::InternalServerError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for CoreError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field))
                })
            })
            .collect();
        messages.sort();

        CoreError::BadRequest(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::CreateProductRequest;
    use validator::Validate;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CoreError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoreError::product_not_found().into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CoreError::from(StoreError::Unavailable("down".into()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_error_keeps_raw_text() {
        let err = CoreError::from(StoreError::Unavailable("connection reset".into()));
        match err {
            CoreError::InternalServerError(msg) => {
                assert_eq!(msg, "store unavailable: connection reset")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validation_errors_joined() {
        let req = CreateProductRequest {
            name: None,
            price: Some(-3.0),
            description: None,
            image_url: None,
        };
        let err = CoreError::from(req.validate().unwrap_err());
        match err {
            CoreError::BadRequest(msg) => {
                assert_eq!(msg, "name is required, price must not be negative")
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
