pub mod payment;
pub mod summary;
pub mod transaction;
pub mod user;
