use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::meals::services::MealError;
use crate::photos::services::PhotoError;

/// Request-layer error; every variant renders as `{"error": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<MealError> for AppError {
    fn from(e: MealError) -> Self {
        match e {
            MealError::Validation(msg) => AppError::BadRequest(msg),
            MealError::Duplicate(_) => AppError::Conflict("Meal with this ID already exists".into()),
            MealError::NotFound(_) => {
                AppError::NotFound("Meal with the specified ID not found".into())
            }
            MealError::HasPhotos(_) => {
                AppError::Conflict("Meal still has photos; delete them first".into())
            }
            MealError::Repo(e) => {
                error!(error = %e, "meal storage failure");
                AppError::Internal("Failed to access meals".into())
            }
        }
    }
}

impl From<PhotoError> for AppError {
    fn from(e: PhotoError) -> Self {
        match e {
            PhotoError::UploadFailed { .. } => {
                AppError::Internal("Failed to upload photo".into())
            }
            PhotoError::AssociationConflict { .. } => {
                AppError::Conflict("Meal photo with this ID already exists".into())
            }
            PhotoError::AssociationFailed { cause, .. } => {
                error!(error = %cause, "meal photo insert failed");
                AppError::Internal("Failed to create meal photo record".into())
            }
            PhotoError::NotFound { .. } => AppError::NotFound("Meal photo not found".into()),
            PhotoError::Repo(e) => {
                error!(error = %e, "meal photo storage failure");
                AppError::Internal("Failed to delete meal photo record".into())
            }
        }
    }
}
