//! # Balance Aggregator
//!
//! Pure functions that turn transactions (and payments) into per-user net
//! balances and totals. Nothing here touches storage or rounds: callers get
//! full `Decimal` precision and round once when building a report.
//!
//! For every included transaction the payer is credited the full amount and
//! each member is debited an equal share, so the balances of a window always
//! sum to zero. The payer only shares the cost when listed as a member.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;
use uuid::Uuid;

use super::date_range::DateRange;
use super::models::{payment::Payment, transaction::Transaction, user::User};

/// Running figures for one calendar day (UTC)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayTotals {
    pub total: Decimal,
    pub count: u32,
    pub max_amount: Decimal,
}

impl DayTotals {
    pub fn average(&self) -> Decimal {
        if self.count == 0 {
            Decimal::ZERO
        } else {
            self.total / Decimal::from(self.count)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub total_expenses: Decimal,
    pub transaction_count: u32,
    pub largest_transaction: Decimal,
    /// Sum of amounts fronted, per payer
    pub user_expenses: BTreeMap<Uuid, Decimal>,
    /// Positive: owed money. Negative: owes money.
    pub user_balances: BTreeMap<Uuid, Decimal>,
    /// Users appearing as payer or member in the window
    pub participants: BTreeSet<Uuid>,
    pub daily: BTreeMap<NaiveDate, DayTotals>,
    /// Distinct (member, payer) pairs where a member owes someone else
    pub debts: BTreeSet<(Uuid, Uuid)>,
}

impl Aggregation {
    pub fn average_transaction(&self) -> Decimal {
        if self.transaction_count == 0 {
            Decimal::ZERO
        } else {
            self.total_expenses / Decimal::from(self.transaction_count)
        }
    }
}

fn seed(users: &[User]) -> BTreeMap<Uuid, Decimal> {
    users.iter().map(|user| (user.id, Decimal::ZERO)).collect()
}

/// Aggregate the live transactions of `range`.
///
/// Every known user appears in both maps, with zero if they took no part.
/// Ids that are not in `users` still accumulate.
pub fn aggregate(transactions: &[Transaction], users: &[User], range: &DateRange) -> Aggregation {
    let mut aggregation = Aggregation {
        user_expenses: seed(users),
        user_balances: seed(users),
        ..Default::default()
    };

    for transaction in transactions
        .iter()
        .filter(|t| !t.is_deleted && range.contains(&t.created_at))
    {
        let Some(share) = transaction.share() else {
            warn!(
                "Skipping transaction {} with no members in balance aggregation",
                transaction.id
            );
            continue;
        };

        let amount = transaction.amount;
        aggregation.total_expenses += amount;
        aggregation.transaction_count += 1;
        aggregation.largest_transaction = aggregation.largest_transaction.max(amount);

        *aggregation
            .user_expenses
            .entry(transaction.payer_id)
            .or_insert(Decimal::ZERO) += amount;
        *aggregation
            .user_balances
            .entry(transaction.payer_id)
            .or_insert(Decimal::ZERO) += amount;
        aggregation.participants.insert(transaction.payer_id);

        for member in &transaction.members {
            *aggregation
                .user_balances
                .entry(*member)
                .or_insert(Decimal::ZERO) -= share;
            aggregation.participants.insert(*member);
            if *member != transaction.payer_id {
                aggregation.debts.insert((*member, transaction.payer_id));
            }
        }

        let day = aggregation
            .daily
            .entry(transaction.created_at.date_naive())
            .or_default();
        day.total += amount;
        day.count += 1;
        day.max_amount = day.max_amount.max(amount);
    }

    aggregation
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentTotals {
    pub total_payments: Decimal,
    pub payment_count: u32,
    /// Sum sent, per payer
    pub user_payments: BTreeMap<Uuid, Decimal>,
    /// Payer +amount, receiver -amount
    pub user_balances: BTreeMap<Uuid, Decimal>,
}

/// Aggregate live payments. A payment moves the payer's balance up and the
/// receiver's down by the amount, so paying off a debt brings both toward zero.
pub fn aggregate_payments(payments: &[Payment], users: &[User]) -> PaymentTotals {
    let mut totals = PaymentTotals {
        user_payments: seed(users),
        user_balances: seed(users),
        ..Default::default()
    };

    for payment in payments.iter().filter(|p| !p.is_deleted) {
        totals.total_payments += payment.amount;
        totals.payment_count += 1;
        *totals
            .user_payments
            .entry(payment.payer_id)
            .or_insert(Decimal::ZERO) += payment.amount;
        *totals
            .user_balances
            .entry(payment.payer_id)
            .or_insert(Decimal::ZERO) += payment.amount;
        *totals
            .user_balances
            .entry(payment.receiver_id)
            .or_insert(Decimal::ZERO) -= payment.amount;
    }

    totals
}

/// Sum two balance maps key by key
pub fn combine_balances(
    left: &BTreeMap<Uuid, Decimal>,
    right: &BTreeMap<Uuid, Decimal>,
) -> BTreeMap<Uuid, Decimal> {
    let mut combined = left.clone();
    for (user_id, amount) in right {
        *combined.entry(*user_id).or_insert(Decimal::ZERO) += *amount;
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::date_range::DateRange;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use shared::money::round_money;

    fn user() -> User {
        User::new("someone".to_string(), None, Utc::now())
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    fn transaction(payer: Uuid, amount: Decimal, members: &[Uuid], created_at: DateTime<Utc>) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            payer_id: payer,
            amount,
            members: members.to_vec(),
            remark: None,
            created_at,
            is_deleted: false,
            deleted_at: None,
        }
    }

    fn tolerance(transactions: usize) -> Decimal {
        dec!(0.01) * Decimal::from(transactions.max(1))
    }

    #[test]
    fn test_payer_included_three_way_split() {
        let (p, a, b) = (user(), user(), user());
        let users = vec![p.clone(), a.clone(), b.clone()];
        let transactions = vec![transaction(p.id, dec!(100), &[p.id, a.id, b.id], at(1, 10))];

        let result = aggregate(&transactions, &users, &DateRange::all());

        assert_eq!(round_money(result.user_balances[&p.id]), dec!(66.67));
        assert_eq!(round_money(result.user_balances[&a.id]), dec!(-33.33));
        assert_eq!(round_money(result.user_balances[&b.id]), dec!(-33.33));
        assert_eq!(result.user_expenses[&p.id], dec!(100));
        assert_eq!(result.user_expenses[&a.id], dec!(0));
    }

    #[test]
    fn test_payer_not_a_member_is_credited_in_full() {
        let (p, a, b) = (user(), user(), user());
        let users = vec![p.clone(), a.clone(), b.clone()];
        let transactions = vec![transaction(p.id, dec!(50), &[a.id, b.id], at(1, 10))];

        let result = aggregate(&transactions, &users, &DateRange::all());

        assert_eq!(result.user_balances[&p.id], dec!(50));
        assert_eq!(result.user_balances[&a.id], dec!(-25));
        assert_eq!(result.user_balances[&b.id], dec!(-25));
        assert_eq!(result.debts.len(), 2);
    }

    #[test]
    fn test_balances_sum_to_zero_and_totals_match() {
        let users: Vec<User> = (0..4).map(|_| user()).collect();
        let ids: Vec<Uuid> = users.iter().map(|u| u.id).collect();
        let transactions = vec![
            transaction(ids[0], dec!(100), &[ids[0], ids[1], ids[2]], at(1, 9)),
            transaction(ids[1], dec!(45.10), &[ids[1], ids[3]], at(2, 9)),
            transaction(ids[2], dec!(10), &[ids[0], ids[1], ids[2], ids[3]], at(2, 18)),
            transaction(ids[3], dec!(0.01), &[ids[0], ids[1], ids[2]], at(3, 9)),
        ];

        let result = aggregate(&transactions, &users, &DateRange::all());

        let sum: Decimal = result.user_balances.values().sum();
        assert!(sum.abs() <= tolerance(transactions.len()));

        let rounded_sum: Decimal = result.user_balances.values().map(|b| round_money(*b)).sum();
        assert!(rounded_sum.abs() <= tolerance(transactions.len()));

        let expected_total: Decimal = transactions.iter().map(|t| t.amount).sum();
        assert_eq!(result.total_expenses, expected_total);
        assert_eq!(result.transaction_count, 4);
        assert_eq!(result.largest_transaction, dec!(100));
    }

    #[test]
    fn test_shares_add_back_to_amount() {
        let transaction = transaction(Uuid::new_v4(), dec!(100), &[Uuid::new_v4(); 3], at(1, 1));
        let members = Decimal::from(transaction.members.len());
        let share = transaction.share().unwrap();

        assert!((share * members - transaction.amount).abs() <= dec!(0.01));
    }

    #[test]
    fn test_soft_deleted_transactions_do_not_contribute() {
        let (p, a) = (user(), user());
        let users = vec![p.clone(), a.clone()];
        let kept = transaction(p.id, dec!(20), &[p.id, a.id], at(1, 10));
        let mut deleted = transaction(a.id, dec!(500), &[p.id, a.id], at(1, 11));
        deleted.is_deleted = true;
        deleted.deleted_at = Some(at(2, 0));

        let result = aggregate(&[kept, deleted], &users, &DateRange::all());

        assert_eq!(result.total_expenses, dec!(20));
        assert_eq!(result.transaction_count, 1);
        assert_eq!(result.user_balances[&p.id], dec!(10));
        assert_eq!(result.user_balances[&a.id], dec!(-10));
    }

    #[test]
    fn test_range_is_inclusive_on_both_ends() {
        let p = user();
        let users = vec![p.clone()];
        let transactions = vec![
            transaction(p.id, dec!(1), &[p.id], at(9, 23)),
            transaction(p.id, dec!(2), &[p.id], at(10, 0)),
            transaction(p.id, dec!(4), &[p.id], at(12, 23)),
            transaction(p.id, dec!(8), &[p.id], at(13, 0)),
        ];
        let range = DateRange::parse(Some("2025-01-10"), Some("2025-01-12")).unwrap();

        let result = aggregate(&transactions, &users, &range);

        assert_eq!(result.total_expenses, dec!(6));
        assert_eq!(result.daily.len(), 2);
    }

    #[test]
    fn test_all_known_users_seeded_and_unknown_ids_accumulate() {
        let (p, idle) = (user(), user());
        let stranger = Uuid::new_v4();
        let users = vec![p.clone(), idle.clone()];
        let transactions = vec![transaction(p.id, dec!(30), &[stranger], at(1, 10))];

        let result = aggregate(&transactions, &users, &DateRange::all());

        assert_eq!(result.user_balances[&idle.id], dec!(0));
        assert_eq!(result.user_expenses[&idle.id], dec!(0));
        assert_eq!(result.user_balances[&stranger], dec!(-30));
        assert_eq!(result.participants.len(), 2);
    }

    #[test]
    fn test_empty_members_row_is_skipped() {
        let p = user();
        let users = vec![p.clone()];
        let transactions = vec![
            transaction(p.id, dec!(30), &[], at(1, 10)),
            transaction(p.id, dec!(5), &[p.id], at(1, 11)),
        ];

        let result = aggregate(&transactions, &users, &DateRange::all());

        assert_eq!(result.transaction_count, 1);
        assert_eq!(result.total_expenses, dec!(5));
        assert_eq!(result.user_balances[&p.id], dec!(0));
    }

    #[test]
    fn test_daily_totals() {
        let p = user();
        let users = vec![p.clone()];
        let transactions = vec![
            transaction(p.id, dec!(10), &[p.id], at(5, 8)),
            transaction(p.id, dec!(30), &[p.id], at(5, 20)),
            transaction(p.id, dec!(7), &[p.id], at(6, 8)),
        ];

        let result = aggregate(&transactions, &users, &DateRange::all());

        let day = &result.daily[&at(5, 0).date_naive()];
        assert_eq!(day.total, dec!(40));
        assert_eq!(day.count, 2);
        assert_eq!(day.max_amount, dec!(30));
        assert_eq!(day.average(), dec!(20));
        assert_eq!(result.average_transaction(), dec!(47) / dec!(3));
    }

    #[test]
    fn test_recomputing_gives_identical_results() {
        let (p, a) = (user(), user());
        let users = vec![p.clone(), a.clone()];
        let transactions = vec![
            transaction(p.id, dec!(10), &[p.id, a.id], at(1, 8)),
            transaction(a.id, dec!(3.33), &[p.id, a.id], at(1, 9)),
        ];

        let first = aggregate(&transactions, &users, &DateRange::all());
        let second = aggregate(&transactions, &users, &DateRange::all());

        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let p = user();
        let result = aggregate(&[], &[p.clone()], &DateRange::all());

        assert_eq!(result.total_expenses, dec!(0));
        assert_eq!(result.average_transaction(), dec!(0));
        assert_eq!(result.user_balances[&p.id], dec!(0));
        assert!(result.daily.is_empty());
    }

    #[test]
    fn test_payments_move_balances_toward_zero() {
        let (p, a) = (user(), user());
        let users = vec![p.clone(), a.clone()];
        let transactions = vec![transaction(p.id, dec!(100), &[p.id, a.id], at(1, 8))];
        let payments = vec![Payment {
            id: Uuid::new_v4(),
            payer_id: a.id,
            receiver_id: p.id,
            amount: dec!(50),
            remark: None,
            created_at: at(2, 8),
            is_deleted: false,
            deleted_at: None,
        }];

        let balances = aggregate(&transactions, &users, &DateRange::all()).user_balances;
        let totals = aggregate_payments(&payments, &users);
        let outstanding = combine_balances(&balances, &totals.user_balances);

        assert_eq!(totals.total_payments, dec!(50));
        assert_eq!(totals.user_payments[&a.id], dec!(50));
        assert_eq!(totals.user_payments[&p.id], dec!(0));
        assert_eq!(outstanding[&p.id], dec!(0));
        assert_eq!(outstanding[&a.id], dec!(0));
        assert_eq!(totals.user_balances.values().sum::<Decimal>(), dec!(0));
    }
}
