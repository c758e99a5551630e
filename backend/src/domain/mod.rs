//! # Domain Module
//!
//! Business rules for shared expenses.
//!
//! - **balance_aggregator**: pure balance and total computation
//! - **settlement**: plans the transfers that settle a set of balances
//! - **user_service / transaction_service / payment_service**: validated CRUD
//! - **summary_service**: loads data, aggregates and rounds into reports
//!
//! A balance is what a user is owed (positive) or owes (negative). For each
//! live transaction the payer is credited the amount and every member is
//! debited an equal share.

pub mod balance_aggregator;
pub mod commands;
pub mod date_range;
pub mod error;
pub mod models;
pub mod pagination;
pub mod payment_service;
pub mod settlement;
pub mod summary_service;
pub mod transaction_service;
pub mod user_service;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use pagination::PageSettings;
pub use payment_service::PaymentService;
pub use summary_service::SummaryService;
pub use transaction_service::TransactionService;
pub use user_service::UserService;
