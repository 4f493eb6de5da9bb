//! Expense and split records.

use serde::{Deserialize, Serialize};

use crate::{MemberId, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(pub u64);

/// The share of an expense owed by one member.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRecord {
    pub member_id: MemberId,
    pub amount_owed: Money,
}

impl SplitRecord {
    pub fn new(member_id: u64, amount_owed: impl Into<Money>) -> Self {
        Self {
            member_id: MemberId(member_id),
            amount_owed: amount_owed.into(),
        }
    }
}

/// An expense paid by one member on behalf of the group.
///
/// Amounts are expected to be non-negative. The engine does not validate the
/// relation between the splits and the total: it sums whatever it receives.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub payer_id: MemberId,
    pub amount_subtotal: Money,
    pub amount_tax: Money,
    /// Settled expenses were paid back outside the engine and are skipped.
    pub is_settled: bool,
    pub splits: Vec<SplitRecord>,
}

impl ExpenseRecord {
    /// Creates an unsettled, tax free expense with no splits.
    pub fn new(id: u64, payer_id: u64, amount: impl Into<Money>) -> Self {
        Self {
            id: ExpenseId(id),
            payer_id: MemberId(payer_id),
            amount_subtotal: amount.into(),
            amount_tax: Money::ZERO,
            is_settled: false,
            splits: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_tax(mut self, amount_tax: impl Into<Money>) -> Self {
        self.amount_tax = amount_tax.into();
        self
    }

    #[must_use]
    pub fn with_split(mut self, split: SplitRecord) -> Self {
        self.splits.push(split);
        self
    }

    #[must_use]
    pub fn settled(mut self) -> Self {
        self.is_settled = true;
        self
    }

    /// Subtotal plus tax.
    #[must_use]
    pub fn total_amount(&self) -> Money {
        self.amount_subtotal + self.amount_tax
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn total_includes_tax() {
        let expense = ExpenseRecord::new(1, 1, dec!(300.00)).with_tax(dec!(54.00));
        assert_eq!(expense.total_amount(), Money::new(dec!(354)));
    }
}
