use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;
use crate::validation::FieldErrors;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error")]
    Validation(FieldErrors),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(msg) => AppError::NotFound(msg),
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<FieldErrors> for AppError {
    fn from(fields: FieldErrors) -> Self {
        AppError::Validation(fields)
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound(msg) => {
                tracing::warn!("{msg}");
                json!({ "error": { "code": "NOT_FOUND", "message": msg } })
            }
            AppError::Conflict(msg) => {
                tracing::warn!("{msg}");
                json!({ "error": { "code": "CONFLICT", "message": msg } })
            }
            AppError::Validation(fields) => {
                tracing::warn!("Error while validating input data: {fields:?}");
                json!({
                    "error": {
                        "code": "VALIDATION_ERROR",
                        "message": "Validation error",
                        "fields": fields
                    }
                })
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                json!({
                    "error": {
                        "code": "DATABASE_ERROR",
                        "message": "A database error occurred"
                    }
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
