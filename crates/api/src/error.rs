use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::maintenance::MaintenanceError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            // Form problems answer in plain text, like the browser posted them.
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                let body = ErrorBody {
                    error: "internal_error".into(),
                    message: "An internal error occurred".into(),
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl From<MaintenanceError> for ApiError {
    fn from(err: MaintenanceError) -> Self {
        match err {
            MaintenanceError::Invalid(errors) => errors.into(),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut missing = Vec::new();
        let mut too_long = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            if field_errors.iter().any(|e| e.code == "too_long") {
                too_long.push(field.to_string());
            } else {
                missing.push(field.to_string());
            }
        }
        missing.sort();
        too_long.sort();

        let mut problems = Vec::new();
        if !missing.is_empty() {
            problems.push(format!("Required fields missing: {}", missing.join(", ")));
        }
        if !too_long.is_empty() {
            problems.push(format!("Fields too long: {}", too_long.join(", ")));
        }
        ApiError::Validation(problems.join("; "))
    }
}

impl From<askama::Error> for ApiError {
    fn from(err: askama::Error) -> Self {
        ApiError::Internal(format!("Template error: {}", err))
    }
}
