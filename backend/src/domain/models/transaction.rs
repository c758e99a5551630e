//! Domain model for a shared expense.
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub payer_id: Uuid,
    pub amount: Decimal,
    /// Users sharing the cost equally. The payer is only a member if listed.
    pub members: Vec<Uuid>,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Amount each member owes, at full precision.
    /// `None` for a row without members, which can only come from bad data.
    pub fn share(&self) -> Option<Decimal> {
        if self.members.is_empty() {
            None
        } else {
            Some(self.amount / Decimal::from(self.members.len()))
        }
    }
}
