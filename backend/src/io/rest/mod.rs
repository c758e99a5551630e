//! # REST API Interface Layer
//!
//! One handler module per resource. Handlers log their route, map DTOs to
//! domain commands, call the service and map the result back. Business rules
//! stay in the domain layer.

pub mod error;
pub mod health_apis;
pub mod mappers;
pub mod payment_apis;
pub mod summary_apis;
pub mod transaction_apis;
pub mod user_apis;

pub use error::ApiError;
