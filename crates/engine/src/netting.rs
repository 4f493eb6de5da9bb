//! Netting: turning signed balances into settling payments.
//!
//! [`GreedyNetting`] repeatedly matches the largest remaining debtor with
//! the largest remaining creditor. It is fast and deterministic but does not
//! guarantee the minimum number of payments. [`OptimalNetting`] is the slot
//! for a solver-backed implementation.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::{Balances, Currency, MemberId, Money};

/// A payment from a debtor to a creditor. `amount` is always positive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub from_member: MemberId,
    pub to_member: MemberId,
    pub amount: Money,
    pub explanation: String,
}

impl Transaction {
    fn settling(
        from_member: MemberId,
        to_member: MemberId,
        amount: Money,
        currency: Currency,
    ) -> Self {
        Self {
            from_member,
            to_member,
            amount,
            explanation: format!("Debt settlement of {}", currency.format(amount)),
        }
    }
}

/// Strategy converting balances into payments.
///
/// Implementations must be pure: the same balances always yield the same
/// transactions, in the same order.
pub trait NettingStrategy: Send + Sync {
    /// Short name used in logs and configuration.
    fn name(&self) -> &'static str;

    fn net(&self, balances: &Balances, currency: Currency) -> Vec<Transaction>;
}

/// Largest-debtor-to-largest-creditor matching.
#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyNetting;

impl NettingStrategy for GreedyNetting {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn net(&self, balances: &Balances, currency: Currency) -> Vec<Transaction> {
        let mut debtors: Vec<(MemberId, Money)> = balances
            .iter()
            .filter(|(_, amount)| amount.is_negative())
            .map(|(member_id, amount)| (member_id, amount.abs()))
            .collect();
        let mut creditors: Vec<(MemberId, Money)> = balances
            .iter()
            .filter(|(_, amount)| amount.is_positive())
            .collect();

        // `sort_by` is stable: equal amounts keep balance order.
        debtors.sort_by(largest_first);
        creditors.sort_by(largest_first);

        let mut transactions = Vec::new();
        let (mut d, mut c) = (0, 0);
        while d < debtors.len() && c < creditors.len() {
            let (debtor, debt) = debtors[d];
            let (creditor, credit) = creditors[c];
            let amount = debt.min(credit);

            if amount.is_positive() {
                transactions.push(Transaction::settling(debtor, creditor, amount, currency));
                debtors[d].1 -= amount;
                creditors[c].1 -= amount;
            }

            if debtors[d].1.is_zero() {
                d += 1;
            }
            if creditors[c].1.is_zero() {
                c += 1;
            }
        }

        transactions
    }
}

fn largest_first(a: &(MemberId, Money), b: &(MemberId, Money)) -> Ordering {
    b.1.cmp(&a.1)
}

/// Provably minimal netting.
///
/// Minimizing the number of payments is an integer programming problem and no
/// solver is wired in yet, so this strategy falls back to [`GreedyNetting`].
#[derive(Clone, Copy, Debug, Default)]
pub struct OptimalNetting;

impl NettingStrategy for OptimalNetting {
    fn name(&self) -> &'static str {
        "optimal"
    }

    fn net(&self, balances: &Balances, currency: Currency) -> Vec<Transaction> {
        tracing::info!("no optimal netting solver available, falling back to greedy");
        GreedyNetting.net(balances, currency)
    }
}

/// Balances left over after applying `transactions` to `balances`.
///
/// Every entry is zero when the transactions settle the balances completely.
pub fn residual_balances(balances: &Balances, transactions: &[Transaction]) -> Balances {
    let mut residual = balances.clone();
    for tx in transactions {
        residual.credit(tx.from_member, tx.amount);
        residual.credit(tx.to_member, -tx.amount);
    }
    residual
}
