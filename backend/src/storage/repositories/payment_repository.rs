use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_amount, parse_optional_timestamp, parse_timestamp, parse_uuid};
use crate::domain::models::payment::Payment;
use crate::storage::{
    connection::DbConnection,
    traits::{ListFilter, PaymentStorage},
};

/// Repository for payment rows
#[derive(Clone)]
pub struct PaymentRepository {
    db: DbConnection,
}

impl PaymentRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_payment(row: &SqliteRow) -> Result<Payment> {
        Ok(Payment {
            id: parse_uuid(row.get("id"))?,
            payer_id: parse_uuid(row.get("payer_id"))?,
            receiver_id: parse_uuid(row.get("receiver_id"))?,
            amount: parse_amount(row.get("amount"))?,
            remark: row.get("remark"),
            created_at: parse_timestamp(row.get("created_at"))?,
            is_deleted: row.get("is_deleted"),
            deleted_at: parse_optional_timestamp(row.get("deleted_at"))?,
        })
    }
}

#[async_trait]
impl PaymentStorage for PaymentRepository {
    async fn store_payment(&self, payment: &Payment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO payments
                (id, payer_id, receiver_id, amount, remark, created_at, is_deleted, deleted_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(payment.id.to_string())
        .bind(payment.payer_id.to_string())
        .bind(payment.receiver_id.to_string())
        .bind(payment.amount.to_string())
        .bind(&payment.remark)
        .bind(format_timestamp(&payment.created_at))
        .bind(payment.is_deleted)
        .bind(payment.deleted_at.as_ref().map(format_timestamp))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_payment(&self, payment_id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query(
            r#"
            SELECT id, payer_id, receiver_id, amount, remark, created_at, is_deleted, deleted_at
            FROM payments
            WHERE id = ?
            "#,
        )
        .bind(payment_id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_payment).transpose()
    }

    async fn list_payments(&self, filter: &ListFilter) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, payer_id, receiver_id, amount, remark, created_at, is_deleted, deleted_at
            FROM payments
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

        rows.iter().map(Self::row_to_payment).collect()
    }

    async fn update_payment(&self, payment: &Payment) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET payer_id = ?, receiver_id = ?, amount = ?, remark = ?
            WHERE id = ?
            "#,
        )
        .bind(payment.payer_id.to_string())
        .bind(payment.receiver_id.to_string())
        .bind(payment.amount.to_string())
        .bind(&payment.remark)
        .bind(payment.id.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn soft_delete_payment(&self, payment_id: Uuid, deleted_at: DateTime<Utc>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE payments
            SET is_deleted = 1, deleted_at = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(format_timestamp(&deleted_at))
        .bind(payment_id.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_payment(&self, payment_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(payment_id.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
