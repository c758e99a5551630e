//! Domain model for a settlement payment.
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Money handed from `payer_id` to `receiver_id` to settle shared expenses
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    pub id: Uuid,
    pub payer_id: Uuid,
    pub receiver_id: Uuid,
    pub amount: Decimal,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}
