//! Transaction service: validated writes, paging and soft delete.
use chrono::{SubsecRound, Utc};
use shared::validation::{parse_id, validate_transaction_input, ValidatedTransaction};
use shared::ValidationLimits;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::commands::transactions::{
    CreateTransactionCommand, TransactionListQuery, TransactionListResult,
    UpdateTransactionCommand,
};
use super::date_range::DateRange;
use super::error::{DomainError, DomainResult};
use super::models::transaction::Transaction;
use super::pagination::PageSettings;
use super::validation::check_known_users;
use crate::storage::{Connection, ListFilter, TransactionStorage};

#[derive(Clone)]
pub struct TransactionService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    user_repository: C::UserRepository,
    limits: ValidationLimits,
    page_settings: PageSettings,
}

impl<C: Connection> TransactionService<C> {
    pub fn new(connection: Arc<C>, limits: ValidationLimits, page_settings: PageSettings) -> Self {
        Self {
            transaction_repository: connection.create_transaction_repository(),
            user_repository: connection.create_user_repository(),
            limits,
            page_settings,
        }
    }

    /// Run the shared rules, then make sure every referenced user exists.
    async fn validate(
        &self,
        payer_id: &str,
        amount: rust_decimal::Decimal,
        members: &[String],
        remark: Option<&str>,
        grandfathered: &[Uuid],
    ) -> DomainResult<ValidatedTransaction> {
        let validated = validate_transaction_input(payer_id, amount, members, remark, &self.limits)
            .map_err(DomainError::Validation)?;

        let mut errors = check_known_users(
            &self.user_repository,
            "payer_id",
            &[validated.payer_id],
            grandfathered,
        )
        .await?;
        errors.extend(
            check_known_users(&self.user_repository, "members", &validated.members, grandfathered)
                .await?,
        );

        if errors.is_empty() {
            Ok(validated)
        } else {
            Err(DomainError::Validation(errors))
        }
    }

    pub async fn create_transaction(
        &self,
        command: CreateTransactionCommand,
    ) -> DomainResult<Transaction> {
        info!(
            "Creating transaction: payer={}, amount={}, members={}",
            command.payer_id,
            command.amount,
            command.members.len()
        );

        let validated = self
            .validate(
                &command.payer_id,
                command.amount,
                &command.members,
                command.remark.as_deref(),
                &[],
            )
            .await?;

        let transaction = Transaction {
            id: Uuid::new_v4(),
            payer_id: validated.payer_id,
            amount: validated.amount,
            members: validated.members,
            remark: validated.remark,
            created_at: Utc::now().trunc_subsecs(3),
            is_deleted: false,
            deleted_at: None,
        };

        self.transaction_repository.store_transaction(&transaction).await?;
        info!("Created transaction {}", transaction.id);
        Ok(transaction)
    }

    async fn load(&self, transaction_id: &str) -> DomainResult<Transaction> {
        let id = parse_id(transaction_id).map_err(|e| DomainError::invalid("id", e))?;

        self.transaction_repository
            .get_transaction(id)
            .await?
            .ok_or_else(|| {
                warn!("Transaction not found: {}", transaction_id);
                DomainError::not_found("Transaction", transaction_id)
            })
    }

    /// Fetch by id; soft-deleted rows are returned with their flag set
    pub async fn get_transaction(&self, transaction_id: &str) -> DomainResult<Transaction> {
        self.load(transaction_id).await
    }

    pub async fn list_transactions(
        &self,
        query: TransactionListQuery,
    ) -> DomainResult<TransactionListResult> {
        let page = self.page_settings.resolve(query.page, query.limit);
        let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
        let payer_id = match query.payer_id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_id(raw).map_err(|e| DomainError::invalid("payer_id", e))?),
        };

        let filter = ListFilter {
            payer_id,
            created_from: range.start(),
            created_before: range.end_exclusive(),
            include_deleted: false,
            limit: Some(page.fetch_limit()),
            offset: page.offset(),
        };
        let mut transactions = self.transaction_repository.list_transactions(&filter).await?;

        let has_more = transactions.len() > page.limit as usize;
        transactions.truncate(page.limit as usize);

        info!(
            "Listed {} transactions (page {}, limit {})",
            transactions.len(),
            page.number,
            page.limit
        );

        Ok(TransactionListResult {
            transactions,
            page: page.number,
            limit: page.limit,
            has_more,
        })
    }

    /// Replace payer, amount, members and remark. Id and creation time stay.
    pub async fn update_transaction(
        &self,
        command: UpdateTransactionCommand,
    ) -> DomainResult<Transaction> {
        info!("Updating transaction: {}", command.path_id);

        if command.path_id != command.body_id {
            return Err(DomainError::IdMismatch {
                path_id: command.path_id,
                body_id: command.body_id,
            });
        }

        let mut transaction = self.load(&command.path_id).await?;
        if transaction.is_deleted {
            return Err(DomainError::AlreadyDeleted {
                entity: "Transaction",
                id: command.path_id,
            });
        }

        let mut grandfathered = transaction.members.clone();
        grandfathered.push(transaction.payer_id);

        let validated = self
            .validate(
                &command.payer_id,
                command.amount,
                &command.members,
                command.remark.as_deref(),
                &grandfathered,
            )
            .await?;

        transaction.payer_id = validated.payer_id;
        transaction.amount = validated.amount;
        transaction.members = validated.members;
        transaction.remark = validated.remark;

        if !self.transaction_repository.update_transaction(&transaction).await? {
            return Err(DomainError::not_found("Transaction", transaction.id));
        }
        Ok(transaction)
    }

    /// Hide a transaction from listings and summaries; the row is kept.
    pub async fn soft_delete_transaction(&self, transaction_id: &str) -> DomainResult<Uuid> {
        info!("Soft deleting transaction: {}", transaction_id);

        let transaction = self.load(transaction_id).await?;
        let deleted = self
            .transaction_repository
            .soft_delete_transaction(transaction.id, Utc::now().trunc_subsecs(3))
            .await?;

        if !deleted {
            warn!("Transaction already deleted: {}", transaction_id);
            return Err(DomainError::AlreadyDeleted {
                entity: "Transaction",
                id: transaction_id.to_string(),
            });
        }
        Ok(transaction.id)
    }

    pub async fn delete_transaction(&self, transaction_id: &str) -> DomainResult<Uuid> {
        info!("Deleting transaction: {}", transaction_id);

        let transaction = self.load(transaction_id).await?;
        self.transaction_repository
            .delete_transaction(transaction.id)
            .await?;
        Ok(transaction.id)
    }
}
