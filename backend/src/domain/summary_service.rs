//! Summaries over the transaction store.
//!
//! Loads rows, hands them to the pure aggregator and rounds the result to
//! cents. Rounding happens here and nowhere earlier.

use rust_decimal::Decimal;
use shared::money::round_money;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::balance_aggregator::{aggregate, aggregate_payments, combine_balances, Aggregation};
use super::commands::summary::SummaryQuery;
use super::date_range::DateRange;
use super::error::DomainResult;
use super::models::summary::{DailyStats, PaymentReport, SummaryReport};
use super::models::user::User;
use super::settlement::{plan_settlements, settlement_efficiency};
use crate::storage::{Connection, ListFilter, PaymentStorage, TransactionStorage, UserStorage};

fn round_map(values: &BTreeMap<Uuid, Decimal>) -> BTreeMap<Uuid, Decimal> {
    values
        .iter()
        .map(|(id, amount)| (*id, round_money(*amount)))
        .collect()
}

/// Turn a full-precision aggregation into a rounded report
pub fn build_report(
    aggregation: &Aggregation,
    users: Vec<User>,
    period_start: Option<String>,
    period_end: Option<String>,
) -> SummaryReport {
    let settlements = plan_settlements(&aggregation.user_balances);
    let settlement_efficiency = settlement_efficiency(aggregation.debts.len(), settlements.len());

    let daily_trends = aggregation
        .daily
        .iter()
        .map(|(date, day)| DailyStats {
            date: *date,
            total: round_money(day.total),
            count: day.count,
            max_amount: round_money(day.max_amount),
            avg_amount: round_money(day.average()),
        })
        .collect();

    SummaryReport {
        total_expenses: round_money(aggregation.total_expenses),
        transaction_count: aggregation.transaction_count,
        average_transaction: round_money(aggregation.average_transaction()),
        largest_transaction: round_money(aggregation.largest_transaction),
        active_users: aggregation.participants.len() as u32,
        user_expenses: round_map(&aggregation.user_expenses),
        user_balances: round_map(&aggregation.user_balances),
        daily_trends,
        users,
        period_start,
        period_end,
        settlements,
        settlement_efficiency,
    }
}

#[derive(Clone)]
pub struct SummaryService<C: Connection> {
    transaction_repository: C::TransactionRepository,
    payment_repository: C::PaymentRepository,
    user_repository: C::UserRepository,
}

impl<C: Connection> SummaryService<C> {
    pub fn new(connection: Arc<C>) -> Self {
        Self {
            transaction_repository: connection.create_transaction_repository(),
            payment_repository: connection.create_payment_repository(),
            user_repository: connection.create_user_repository(),
        }
    }

    pub async fn get_summary(&self, query: SummaryQuery) -> DomainResult<SummaryReport> {
        let range = DateRange::parse(query.start_date.as_deref(), query.end_date.as_deref())?;
        info!(
            "Building summary for {:?} .. {:?}",
            query.start_date, query.end_date
        );

        // Inactive users are included so historical balances keep their names
        let users = self.user_repository.list_users(true).await?;
        let filter = ListFilter {
            created_from: range.start(),
            created_before: range.end_exclusive(),
            ..Default::default()
        };
        let transactions = self.transaction_repository.list_transactions(&filter).await?;

        let aggregation = aggregate(&transactions, &users, &range);
        Ok(build_report(
            &aggregation,
            users,
            query.start_date,
            query.end_date,
        ))
    }

    /// Payment totals plus what is still owed once payments are applied to
    /// the all-time transaction balances
    pub async fn get_payment_summary(&self) -> DomainResult<PaymentReport> {
        info!("Building payment summary");

        let users = self.user_repository.list_users(true).await?;
        let payments = self.payment_repository.list_payments(&ListFilter::default()).await?;
        let transactions = self
            .transaction_repository
            .list_transactions(&ListFilter::default())
            .await?;

        let totals = aggregate_payments(&payments, &users);
        let balances = aggregate(&transactions, &users, &DateRange::all()).user_balances;
        let outstanding = combine_balances(&balances, &totals.user_balances);

        Ok(PaymentReport {
            total_payments: round_money(totals.total_payments),
            payment_count: totals.payment_count,
            user_payments: round_map(&totals.user_payments),
            user_balances: round_map(&totals.user_balances),
            settlements: plan_settlements(&outstanding),
            outstanding_balances: round_map(&outstanding),
        })
    }
}
