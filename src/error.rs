use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::directory::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    Validation(String),

}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::Store(ref e) => match e {
                StoreError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
                StoreError::ReferenceError { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "Referenced record does not exist")
                }
                StoreError::ConstraintViolation { .. } => {
                    (StatusCode::CONFLICT, "Record was rejected by the database")
                }
                StoreError::TransientStoreFailure { .. } => {
                    tracing::error!("Store failure: {}", e);
                    (StatusCode::SERVICE_UNAVAILABLE, "Database temporarily unavailable")
                }
            },
            Self::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error occurred")
            }
            Self::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
        };

        let entity = match &self {
            Self::Store(e) => Some(e.entity()),
            _ => None,
        };

        let body = Json(json!({
            "error": error_message,
            "entity": entity,
            "details": self.to_string(),
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
