//! Presentation helpers.
//!
//! These only decorate data for display (names instead of ids, formatted
//! amounts). Balances are never recomputed or altered here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::money::{format_money, round_money};
use crate::{Summary, Transaction, User};

/// Label shown for ids that do not resolve to a known user
pub const UNKNOWN_USER: &str = "Unknown User";

/// Id to display-name lookup
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    names: HashMap<String, String>,
}

impl UserDirectory {
    pub fn new(users: &[User]) -> Self {
        let names = users
            .iter()
            .map(|user| (user.id.clone(), user.username.clone()))
            .collect();
        Self { names }
    }

    pub fn name_of(&self, user_id: &str) -> &str {
        self.names
            .get(user_id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_USER)
    }
}

/// A transaction row as displayed in the transaction list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionView {
    pub id: String,
    pub payer_name: String,
    pub member_names: Vec<String>,
    pub amount: Decimal,
    pub formatted_amount: String,
    /// Amount each member owes, formatted
    pub formatted_share: String,
    pub remark: Option<String>,
    pub created_at: String,
}

impl TransactionView {
    pub fn from_transaction(
        transaction: &Transaction,
        directory: &UserDirectory,
        currency_symbol: &str,
    ) -> Self {
        let share = if transaction.members.is_empty() {
            Decimal::ZERO
        } else {
            transaction.amount / Decimal::from(transaction.members.len())
        };

        Self {
            id: transaction.id.clone(),
            payer_name: directory.name_of(&transaction.payer_id).to_string(),
            member_names: transaction
                .members
                .iter()
                .map(|id| directory.name_of(id).to_string())
                .collect(),
            amount: transaction.amount,
            formatted_amount: format_money(transaction.amount, currency_symbol),
            formatted_share: format_money(share, currency_symbol),
            remark: transaction.remark.clone(),
            created_at: transaction.created_at.clone(),
        }
    }
}

/// Whether a user is owed money, owes money, or is even
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStanding {
    Owed,
    Owes,
    Settled,
}

/// One row of the balances table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub user_id: String,
    pub name: String,
    pub expenses: Decimal,
    pub balance: Decimal,
    pub formatted_balance: String,
    pub standing: BalanceStanding,
}

pub fn balance_rows(
    summary: &Summary,
    directory: &UserDirectory,
    currency_symbol: &str,
) -> Vec<BalanceRow> {
    let mut rows: Vec<BalanceRow> = summary
        .user_balances
        .iter()
        .map(|(user_id, balance)| {
            let rounded = round_money(*balance);
            let standing = if rounded > Decimal::ZERO {
                BalanceStanding::Owed
            } else if rounded < Decimal::ZERO {
                BalanceStanding::Owes
            } else {
                BalanceStanding::Settled
            };
            BalanceRow {
                user_id: user_id.clone(),
                name: directory.name_of(user_id).to_string(),
                expenses: summary
                    .user_expenses
                    .get(user_id)
                    .copied()
                    .unwrap_or(Decimal::ZERO),
                balance: rounded,
                formatted_balance: format_money(rounded, currency_symbol),
                standing,
            }
        })
        .collect();

    // Largest creditor first, largest debtor last
    rows.sort_by(|a, b| b.balance.cmp(&a.balance).then_with(|| a.name.cmp(&b.name)));
    rows
}
