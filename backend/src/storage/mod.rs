//! # Storage Module
//!
//! SQLite persistence for users, transactions and payments.
//!
//! Services depend on the traits in [`traits`]; [`DbConnection`] is the only
//! implementation and hands out one repository per table.

pub mod connection;
pub mod repositories;
pub mod traits;

pub use connection::DbConnection;
pub use repositories::{PaymentRepository, TransactionRepository, UserRepository};
pub use traits::{Connection, ListFilter, PaymentStorage, TransactionStorage, UserStorage};
