use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_amount, parse_optional_timestamp, parse_timestamp, parse_uuid};
use crate::domain::models::transaction::Transaction;
use crate::storage::{
    connection::DbConnection,
    traits::{ListFilter, TransactionStorage},
};

/// Repository for transaction rows
#[derive(Clone)]
pub struct TransactionRepository {
    db: DbConnection,
}

impl TransactionRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn encode_members(members: &[Uuid]) -> Result<String> {
        let ids: Vec<String> = members.iter().map(Uuid::to_string).collect();
        Ok(serde_json::to_string(&ids)?)
    }

    fn row_to_transaction(row: &SqliteRow) -> Result<Transaction> {
        let members_json: &str = row.get("members");
        let member_ids: Vec<String> = serde_json::from_str(members_json)?;
        let members = member_ids
            .iter()
            .map(|id| parse_uuid(id))
            .collect::<Result<Vec<_>>>()?;

        Ok(Transaction {
            id: parse_uuid(row.get("id"))?,
            payer_id: parse_uuid(row.get("payer_id"))?,
            amount: parse_amount(row.get("amount"))?,
            members,
            remark: row.get("remark"),
            created_at: parse_timestamp(row.get("created_at"))?,
            is_deleted: row.get("is_deleted"),
            deleted_at: parse_optional_timestamp(row.get("deleted_at"))?,
        })
    }
}

#[async_trait]
impl TransactionStorage for TransactionRepository {
    async fn store_transaction(&self, transaction: &Transaction) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions
                (id, payer_id, amount, members, remark, created_at, is_deleted, deleted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id.to_string())
        .bind(transaction.payer_id.to_string())
        .bind(transaction.amount.to_string())
        .bind(Self::encode_members(&transaction.members)?)
        .bind(&transaction.remark)
        .bind(format_timestamp(&transaction.created_at))
        .bind(transaction.is_deleted)
        .bind(transaction.deleted_at.as_ref().map(format_timestamp))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_transaction(&self, transaction_id: Uuid) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            SELECT id, payer_id, amount, members, remark, created_at, is_deleted, deleted_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(transaction_id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_transaction).transpose()
    }

    async fn list_transactions(&self, filter: &ListFilter) -> Result<Vec<Transaction>> {
        let rows = sqlx::query(
            r#"
            SELECT id, payer_id, amount, members, remark, created_at, is_deleted, deleted_at
            FROM transactions
            WHERE (?1 OR is_deleted = 0)
              AND (?2 IS NULL OR payer_id = ?2)
              AND (?3 IS NULL OR created_at >= ?3)
              AND (?4 IS NULL OR created_at < ?4)
            ORDER BY created_at DESC, id DESC
            LIMIT ?5 OFFSET ?6
            "#,
        )
        .bind(filter.include_deleted)
        .bind(filter.payer_id.map(|id| id.to_string()))
        .bind(filter.created_from.as_ref().map(format_timestamp))
        .bind(filter.created_before.as_ref().map(format_timestamp))
        .bind(filter.limit.map(i64::from).unwrap_or(-1))
        .bind(i64::from(filter.offset))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    async fn update_transaction(&self, transaction: &Transaction) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET payer_id = ?, amount = ?, members = ?, remark = ?
            WHERE id = ?
            "#,
        )
        .bind(transaction.payer_id.to_string())
        .bind(transaction.amount.to_string())
        .bind(Self::encode_members(&transaction.members)?)
        .bind(&transaction.remark)
        .bind(transaction.id.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete_transaction(
        &self,
        transaction_id: Uuid,
        deleted_at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET is_deleted = 1, deleted_at = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(format_timestamp(&deleted_at))
        .bind(transaction_id.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_transaction(&self, transaction_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(transaction_id.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
