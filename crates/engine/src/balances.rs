//! Net balance aggregation.
//!
//! A net balance is the signed amount a member is owed (positive) or owes
//! (negative) once every unsettled expense is taken into account.

use std::collections::HashMap;

use crate::{ExpenseRecord, Member, MemberId, Money};

/// Insertion-ordered mapping from member to net balance.
///
/// Iteration order is stable: active members come first in snapshot order,
/// followed by any id only referenced by expenses, in first-seen order. The
/// netting walk relies on this order to break ties deterministically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Balances {
    entries: Vec<(MemberId, Money)>,
    index: HashMap<MemberId, usize>,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of `member_id`, if present.
    pub fn get(&self, member_id: MemberId) -> Option<Money> {
        self.index.get(&member_id).map(|&i| self.entries[i].1)
    }

    pub fn contains(&self, member_id: MemberId) -> bool {
        self.index.contains_key(&member_id)
    }

    /// Sets the balance of `member_id`, keeping its original position when
    /// already present.
    pub fn set(&mut self, member_id: MemberId, amount: Money) {
        *self.entry(member_id) = amount;
    }

    /// Adds `amount` (possibly negative) to the balance of `member_id`,
    /// starting from zero for unknown members.
    pub fn credit(&mut self, member_id: MemberId, amount: Money) {
        *self.entry(member_id) += amount;
    }

    fn entry(&mut self, member_id: MemberId) -> &mut Money {
        let position = match self.index.get(&member_id) {
            Some(&i) => i,
            None => {
                self.entries.push((member_id, Money::ZERO));
                let i = self.entries.len() - 1;
                self.index.insert(member_id, i);
                i
            }
        };
        &mut self.entries[position].1
    }

    pub fn iter(&self) -> impl Iterator<Item = (MemberId, Money)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every balance. Zero for a consistent ledger.
    pub fn total(&self) -> Money {
        self.entries.iter().map(|(_, amount)| *amount).sum()
    }

    /// Sum of the magnitudes of every negative balance.
    pub fn total_debt(&self) -> Money {
        self.entries
            .iter()
            .filter(|(_, amount)| amount.is_negative())
            .map(|(_, amount)| amount.abs())
            .sum()
    }

    /// Sum of every positive balance.
    pub fn total_credit(&self) -> Money {
        self.entries
            .iter()
            .filter(|(_, amount)| amount.is_positive())
            .map(|(_, amount)| *amount)
            .sum()
    }
}

impl FromIterator<(MemberId, Money)> for Balances {
    fn from_iter<T: IntoIterator<Item = (MemberId, Money)>>(iter: T) -> Self {
        let mut balances = Balances::new();
        for (member_id, amount) in iter {
            balances.set(member_id, amount);
        }
        balances
    }
}

/// Reduces unsettled expenses to one net balance per member.
///
/// Every member in `members` is present in the result, at zero when it has
/// no activity. The payer of an expense is credited its total (subtotal plus
/// tax) and every split debits its owing member. Settled expenses are
/// skipped entirely.
pub fn aggregate_balances<'a, M, E>(members: M, expenses: E) -> Balances
where
    M: IntoIterator<Item = &'a Member>,
    E: IntoIterator<Item = &'a ExpenseRecord>,
{
    let mut balances: Balances = members
        .into_iter()
        .map(|member| (member.id, Money::ZERO))
        .collect();

    for expense in expenses.into_iter().filter(|e| !e.is_settled) {
        balances.credit(expense.payer_id, expense.total_amount());
        for split in &expense.splits {
            balances.credit(split.member_id, -split.amount_owed);
        }
    }

    balances
}
