//! Storage abstraction traits.
//!
//! The domain services only talk to these traits, so a different backend can
//! be swapped in without touching business logic.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::models::{payment::Payment, transaction::Transaction, user::User};

/// Filter shared by the transaction and payment listings.
///
/// `created_from` is inclusive and `created_before` exclusive. Rows come back
/// newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListFilter {
    pub payer_id: Option<Uuid>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
    pub include_deleted: bool,
    pub limit: Option<u32>,
    pub offset: u32,
}

#[async_trait]
pub trait UserStorage: Send + Sync {
    async fn store_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Users ordered by name
    async fn list_users(&self, include_inactive: bool) -> Result<Vec<User>>;

    /// Returns false when no row matched
    async fn update_user(&self, user: &User) -> Result<bool>;

    async fn delete_user(&self, user_id: Uuid) -> Result<bool>;

    /// True when any transaction or payment, deleted or not, mentions the user
    async fn is_user_referenced(&self, user_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait TransactionStorage: Send + Sync {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()>;

    async fn get_transaction(&self, transaction_id: Uuid) -> Result<Option<Transaction>>;

    async fn list_transactions(&self, filter: &ListFilter) -> Result<Vec<Transaction>>;

    async fn update_transaction(&self, transaction: &Transaction) -> Result<bool>;

    /// Marks a live row deleted. Returns false if it is missing or already deleted.
    async fn soft_delete_transaction(
        &self,
        transaction_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool>;

    async fn delete_transaction(&self, transaction_id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait PaymentStorage: Send + Sync {
    async fn store_payment(&self, payment: &Payment) -> Result<()>;

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>>;

    async fn list_payments(&self, filter: &ListFilter) -> Result<Vec<Payment>>;

    async fn update_payment(&self, payment: &Payment) -> Result<bool>;

    async fn soft_delete_payment(&self, payment_id: Uuid, deleted_at: DateTime<Utc>) -> Result<bool>;

    async fn delete_payment(&self, payment_id: Uuid) -> Result<bool>;
}

/// A storage connection that hands out repositories
pub trait Connection: Send + Sync + Clone {
    type UserRepository: UserStorage + Clone;
    type TransactionRepository: TransactionStorage + Clone;
    type PaymentRepository: PaymentStorage + Clone;

    fn create_user_repository(&self) -> Self::UserRepository;

    fn create_transaction_repository(&self) -> Self::TransactionRepository;

    fn create_payment_repository(&self) -> Self::PaymentRepository;
}
