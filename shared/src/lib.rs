//! Wire types shared between the splitledger backend and its clients.
//!
//! Everything in this crate is plain data plus pure helpers: money rounding,
//! the write-time validation rules, presentation helpers and the client-side
//! view state. Nothing here performs I/O.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod money;
pub mod presentation;
pub mod validation;
pub mod view_state;

pub use validation::{FieldError, ValidationError, ValidationLimits};

/// A participant in shared expenses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Request for creating a new user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Request for updating a user's display fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A shared expense fronted by one payer and split equally among members
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub payer_id: String,
    pub amount: Decimal,
    pub members: Vec<String>,
    #[serde(default)]
    pub remark: Option<String>,
    /// RFC 3339 timestamp (UTC)
    pub created_at: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

/// Body of `POST /transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    pub payer_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Body of `PUT /transactions/{id}`; replaces every editable field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTransactionRequest {
    pub id: String,
    pub payer_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionListRequest {
    /// 1-based page number
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub payer_id: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339, inclusive
    pub start_date: Option<String>,
    /// `YYYY-MM-DD` or RFC 3339, inclusive
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

/// A settlement transfer recorded between two users
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub payer_id: String,
    pub receiver_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub remark: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
}

/// Body of `POST /payments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub payer_id: String,
    pub receiver_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub remark: Option<String>,
}

/// Body of `PUT /payments/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdatePaymentRequest {
    pub id: String,
    pub payer_id: String,
    pub receiver_id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
    pub page: u32,
    pub limit: u32,
    pub has_more: bool,
}

/// Query window for summaries
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryPeriod {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Per-day statistics inside a summary window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTrend {
    /// `YYYY-MM-DD`
    pub date: String,
    pub total: Decimal,
    pub count: u32,
    pub max_amount: Decimal,
    pub avg_amount: Decimal,
}

/// One planned transfer that moves balances toward zero
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementTransfer {
    pub from: String,
    pub to: String,
    pub amount: Decimal,
}

/// Aggregate over the non-deleted transactions of a window. All amounts are
/// rounded to two decimal places.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_expenses: Decimal,
    pub transaction_count: u32,
    pub average_transaction: Decimal,
    pub largest_transaction: Decimal,
    pub active_users: u32,
    pub user_expenses: BTreeMap<String, Decimal>,
    pub user_balances: BTreeMap<String, Decimal>,
    pub daily_trends: Vec<DailyTrend>,
    pub users: Vec<User>,
    pub period: SummaryPeriod,
    pub settlements: Vec<SettlementTransfer>,
    pub settlement_efficiency: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentSummary {
    pub total_payments: Decimal,
    pub payment_count: u32,
    pub user_payments: BTreeMap<String, Decimal>,
    pub user_balances: BTreeMap<String, Decimal>,
    /// Transaction balances with recorded payments applied
    pub outstanding_balances: BTreeMap<String, Decimal>,
    pub settlements: Vec<SettlementTransfer>,
}

/// Response after deleting (hard or soft) a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
