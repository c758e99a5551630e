use shared::{FieldError, ValidationError};
use thiserror::Error;

/// Errors returned by the domain services
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("{entity} already deleted: {id}")]
    AlreadyDeleted { entity: &'static str, id: String },

    #[error("Path id {path_id} does not match body id {body_id}")]
    IdMismatch { path_id: String, body_id: String },

    #[error("Invalid date '{0}', expected YYYY-MM-DD or RFC 3339")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl DomainError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Single-field validation failure
    pub fn invalid(field: &str, error: ValidationError) -> Self {
        DomainError::Validation(vec![FieldError::new(field, error)])
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
