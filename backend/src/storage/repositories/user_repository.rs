use anyhow::Result;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::domain::models::user::User;
use crate::storage::{connection::DbConnection, traits::UserStorage};

/// Repository for user rows
#[derive(Clone)]
pub struct UserRepository {
    db: DbConnection,
}

impl UserRepository {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User> {
        Ok(User {
            id: parse_uuid(row.get("id"))?,
            username: row.get("username"),
            email: row.get("email"),
            is_active: row.get("is_active"),
            created_at: parse_timestamp(row.get("created_at"))?,
        })
    }
}

#[async_trait]
impl UserStorage for UserRepository {
    async fn store_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, is_active, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(format_timestamp(&user.created_at))
        .execute(self.db.pool())
        .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, is_active, created_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id.to_string())
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn list_users(&self, include_inactive: bool) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, email, is_active, created_at
            FROM users
            WHERE is_active = 1 OR ?
            ORDER BY username COLLATE NOCASE ASC, id ASC
            "#,
        )
        .bind(include_inactive)
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    async fn update_user(&self, user: &User) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.id.to_string())
        .execute(self.db.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .execute(self.db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_user_referenced(&self, user_id: Uuid) -> Result<bool> {
        let referenced: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM transactions
                WHERE payer_id = ?1
                   OR EXISTS (SELECT 1 FROM json_each(transactions.members) WHERE value = ?1)
            ) OR EXISTS (
                SELECT 1 FROM payments
                WHERE payer_id = ?1 OR receiver_id = ?1
            )
            "#,
        )
        .bind(user_id.to_string())
        .fetch_one(self.db.pool())
        .await?;
        Ok(referenced)
    }
}
