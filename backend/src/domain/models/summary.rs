//! Report models produced by the summary service. Amounts are rounded to
//! cents; the full-precision figures live in the aggregator.
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use uuid::Uuid;

use super::user::User;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total: Decimal,
    pub count: u32,
    pub max_amount: Decimal,
    pub avg_amount: Decimal,
}

/// A planned transfer of `amount` from a debtor to a creditor
#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub from: Uuid,
    pub to: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryReport {
    pub total_expenses: Decimal,
    pub transaction_count: u32,
    pub average_transaction: Decimal,
    pub largest_transaction: Decimal,
    pub active_users: u32,
    pub user_expenses: BTreeMap<Uuid, Decimal>,
    pub user_balances: BTreeMap<Uuid, Decimal>,
    pub daily_trends: Vec<DailyStats>,
    pub users: Vec<User>,
    /// Window as requested, echoed back verbatim
    pub period_start: Option<String>,
    pub period_end: Option<String>,
    pub settlements: Vec<Transfer>,
    pub settlement_efficiency: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentReport {
    pub total_payments: Decimal,
    pub payment_count: u32,
    pub user_payments: BTreeMap<Uuid, Decimal>,
    pub user_balances: BTreeMap<Uuid, Decimal>,
    pub outstanding_balances: BTreeMap<Uuid, Decimal>,
    pub settlements: Vec<Transfer>,
}
