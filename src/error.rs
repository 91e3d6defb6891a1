use axum::{Json, http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No json received..")]
    NotJson,

    #[error("Incorrect request data..")]
    MalformedRequest,

    #[error("Field '{0}' not found..")]
    MissingField(String),

    #[error("Incorrect type of '{0}' field..")]
    TypeMismatch(String),

    /// Store rejected a new course.
    #[error("{0}")]
    InsertFailed(#[source] sqlx::Error),

    /// Store failed while changing or removing an existing course.
    #[error("{0}")]
    WriteFailed(#[source] sqlx::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Non-existent address..")]
    RouteNotFound,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotJson
            | AppError::MalformedRequest
            | AppError::MissingField(_)
            | AppError::TypeMismatch(_)
            | AppError::InsertFailed(_) => StatusCode::BAD_REQUEST,
            AppError::WriteFailed(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::InsertFailed(e) | AppError::WriteFailed(e) => {
                error!("persistence failure: {}", e);
                self.to_string()
            }
            AppError::Database(e) => {
                error!("database error: {}", e);
                "Database error occurred".to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
