use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use shared::ErrorResponse;
use tracing::error;

use crate::domain::DomainError;

/// A domain error on its way out as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError(error)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_)
            | DomainError::IdMismatch { .. }
            | DomainError::InvalidDate(_)
            | DomainError::InvalidDateRange { .. } => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } | DomainError::AlreadyDeleted { .. } => {
                StatusCode::NOT_FOUND
            }
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self.0 {
            DomainError::Validation(errors) => ErrorResponse {
                message: "Validation failed".to_string(),
                errors,
            },
            DomainError::Storage(e) => {
                // Detail goes to the log only
                error!("Storage failure: {:#}", e);
                ErrorResponse {
                    message: "Internal server error".to_string(),
                    errors: vec![],
                }
            }
            other => ErrorResponse {
                message: other.to_string(),
                errors: vec![],
            },
        };

        (status, Json(body)).into_response()
    }
}
