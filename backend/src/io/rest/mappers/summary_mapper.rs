use rust_decimal::Decimal;
use shared::{DailyTrend, PaymentSummary, SettlementTransfer, Summary, SummaryPeriod};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::UserMapper;
use crate::domain::models::summary::{PaymentReport, SummaryReport, Transfer};

pub struct SummaryMapper;

impl SummaryMapper {
    fn keyed_by_id(values: BTreeMap<Uuid, Decimal>) -> BTreeMap<String, Decimal> {
        values
            .into_iter()
            .map(|(id, amount)| (id.to_string(), amount))
            .collect()
    }

    fn transfer_to_dto(transfer: Transfer) -> SettlementTransfer {
        SettlementTransfer {
            from: transfer.from.to_string(),
            to: transfer.to.to_string(),
            amount: transfer.amount,
        }
    }

    pub fn to_dto(report: SummaryReport) -> Summary {
        Summary {
            total_expenses: report.total_expenses,
            transaction_count: report.transaction_count,
            average_transaction: report.average_transaction,
            largest_transaction: report.largest_transaction,
            active_users: report.active_users,
            user_expenses: Self::keyed_by_id(report.user_expenses),
            user_balances: Self::keyed_by_id(report.user_balances),
            daily_trends: report
                .daily_trends
                .into_iter()
                .map(|day| DailyTrend {
                    date: day.date.format("%Y-%m-%d").to_string(),
                    total: day.total,
                    count: day.count,
                    max_amount: day.max_amount,
                    avg_amount: day.avg_amount,
                })
                .collect(),
            users: report.users.into_iter().map(UserMapper::to_dto).collect(),
            period: SummaryPeriod {
                start_date: report.period_start,
                end_date: report.period_end,
            },
            settlements: report
                .settlements
                .into_iter()
                .map(Self::transfer_to_dto)
                .collect(),
            settlement_efficiency: report.settlement_efficiency,
        }
    }

    pub fn payment_report_to_dto(report: PaymentReport) -> PaymentSummary {
        PaymentSummary {
            total_payments: report.total_payments,
            payment_count: report.payment_count,
            user_payments: Self::keyed_by_id(report.user_payments),
            user_balances: Self::keyed_by_id(report.user_balances),
            outstanding_balances: Self::keyed_by_id(report.outstanding_balances),
            settlements: report
                .settlements
                .into_iter()
                .map(Self::transfer_to_dto)
                .collect(),
        }
    }
}
