//! Settlement planning.
//!
//! Plans over the balances as displayed, rounded to cents, so the transfers
//! into each creditor add up to exactly what that creditor is shown as owed.
//! Rounding can leave the debtor side a few cents off from the creditor side;
//! those cents are moved one at a time onto the debtors whose rounding is
//! furthest from their exact debt.
//!
//! Matching is greedy: the largest creditor takes from the largest debtor.
//! Ties go to the smaller user id so the plan is deterministic.

use rust_decimal::Decimal;
use shared::money::{one_cent, round_money};
use std::collections::BTreeMap;
use uuid::Uuid;

use super::models::summary::Transfer;

struct Debt {
    id: Uuid,
    exact: Decimal,
    settled: Decimal,
}

/// Index of the eligible debt with the largest key, preferring the smaller id on ties
fn pick_debt(
    debts: &[Debt],
    eligible: impl Fn(&Debt) -> bool,
    key: impl Fn(&Debt) -> Decimal,
) -> Option<usize> {
    debts
        .iter()
        .enumerate()
        .filter(|(_, debt)| eligible(debt))
        .max_by(|(_, a), (_, b)| key(a).cmp(&key(b)).then_with(|| b.id.cmp(&a.id)))
        .map(|(index, _)| index)
}

/// Shift whole cents between debtors until they owe `owed_total` together
fn reconcile_debts(debts: &mut [Debt], owed_total: Decimal) {
    let cent = one_cent();
    let mut gap = owed_total - debts.iter().map(|debt| debt.settled).sum::<Decimal>();

    while gap >= cent {
        let Some(index) = pick_debt(debts, |_| true, |debt| debt.exact - debt.settled) else {
            break;
        };
        debts[index].settled += cent;
        gap -= cent;
    }

    while gap <= -cent {
        let Some(index) = pick_debt(
            debts,
            |debt| debt.settled >= cent,
            |debt| debt.settled - debt.exact,
        ) else {
            break;
        };
        debts[index].settled -= cent;
        gap += cent;
    }
}

/// Index of the largest amount, preferring the smaller id on ties
fn largest(parties: &[(Uuid, Decimal)]) -> Option<usize> {
    parties
        .iter()
        .enumerate()
        .max_by(|(_, (id_a, amount_a)), (_, (id_b, amount_b))| {
            amount_a.cmp(amount_b).then_with(|| id_b.cmp(id_a))
        })
        .map(|(index, _)| index)
}

/// Transfers, in whole cents, that settle the displayed balances.
/// `balances` are at full precision.
pub fn plan_settlements(balances: &BTreeMap<Uuid, Decimal>) -> Vec<Transfer> {
    let mut creditors: Vec<(Uuid, Decimal)> = balances
        .iter()
        .map(|(id, amount)| (*id, round_money(*amount)))
        .filter(|(_, amount)| *amount > Decimal::ZERO)
        .collect();
    let mut debts: Vec<Debt> = balances
        .iter()
        .filter(|(_, amount)| **amount < Decimal::ZERO)
        .map(|(id, amount)| Debt {
            id: *id,
            exact: -*amount,
            settled: round_money(-*amount),
        })
        .collect();

    let owed_total = creditors.iter().map(|(_, amount)| *amount).sum();
    reconcile_debts(&mut debts, owed_total);

    let mut debtors: Vec<(Uuid, Decimal)> = debts
        .into_iter()
        .filter(|debt| debt.settled > Decimal::ZERO)
        .map(|debt| (debt.id, debt.settled))
        .collect();

    let mut transfers = Vec::new();

    while let (Some(c), Some(d)) = (largest(&creditors), largest(&debtors)) {
        let amount = creditors[c].1.min(debtors[d].1);
        transfers.push(Transfer {
            from: debtors[d].0,
            to: creditors[c].0,
            amount,
        });

        creditors[c].1 -= amount;
        debtors[d].1 -= amount;
        if creditors[c].1.is_zero() {
            creditors.swap_remove(c);
        }
        if debtors[d].1.is_zero() {
            debtors.swap_remove(d);
        }
    }

    transfers
}

/// Share of transfers saved compared to every member paying every payer
/// directly, clamped to `[0, 1]` and rounded to two places.
pub fn settlement_efficiency(naive_transfers: usize, planned_transfers: usize) -> Decimal {
    if naive_transfers == 0 {
        return Decimal::ZERO;
    }

    let naive = Decimal::from(naive_transfers);
    let planned = Decimal::from(planned_transfers);
    let ratio = ((naive - planned) / naive).clamp(Decimal::ZERO, Decimal::ONE);
    round_money(ratio)
}
