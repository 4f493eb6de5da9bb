//! Non-fatal data integrity checks.
//!
//! None of these conditions stop a settlement: they point at inconsistent
//! upstream data and travel alongside the result.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{Balances, Member, MemberId, Money, PolicyType, Transaction, netting};

/// Sums whose magnitude stays below this are treated as zero. It absorbs the
/// last-digit error of splits computed by exact division (e.g. `236 / 3`).
pub const INTEGRITY_TOLERANCE: Decimal = dec!(0.0000000001);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DataIntegrityWarning {
    /// Raw balances do not sum to zero: splits and expense totals disagree.
    UnbalancedLedger { sum: Money },
    /// A scaling policy left debts and credits out of balance.
    UnbalancedAfterPolicy { policy: PolicyType, sum: Money },
    /// Netting could not settle everything; `residual` is the sum of the
    /// magnitudes left over.
    ResidualAfterNetting { residual: Money },
    /// An expense references someone who is not an active member.
    UnknownMember { member_id: MemberId },
}

impl DataIntegrityWarning {
    /// Machine readable name, identical to the serialized `kind` tag.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnbalancedLedger { .. } => "unbalanced_ledger",
            Self::UnbalancedAfterPolicy { .. } => "unbalanced_after_policy",
            Self::ResidualAfterNetting { .. } => "residual_after_netting",
            Self::UnknownMember { .. } => "unknown_member",
        }
    }
}

impl fmt::Display for DataIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnbalancedLedger { sum } => {
                write!(f, "balances sum to {sum} instead of zero")
            }
            Self::UnbalancedAfterPolicy { policy, sum } => {
                write!(f, "balances sum to {sum} after applying {policy}")
            }
            Self::ResidualAfterNetting { residual } => {
                write!(f, "{residual} left unsettled after netting")
            }
            Self::UnknownMember { member_id } => {
                write!(f, "member {member_id} is not an active member of the group")
            }
        }
    }
}

fn is_negligible(amount: Money) -> bool {
    amount.abs().amount() < INTEGRITY_TOLERANCE
}

/// Checks raw balances: zero sum, and no ids outside `members`.
pub fn check_ledger<'a, M>(balances: &Balances, members: M) -> Vec<DataIntegrityWarning>
where
    M: IntoIterator<Item = &'a Member>,
{
    let known: Vec<MemberId> = members.into_iter().map(|m| m.id).collect();
    let mut warnings: Vec<DataIntegrityWarning> = balances
        .iter()
        .filter(|(member_id, _)| !known.contains(member_id))
        .map(|(member_id, _)| DataIntegrityWarning::UnknownMember { member_id })
        .collect();

    let sum = balances.total();
    if !is_negligible(sum) {
        warnings.push(DataIntegrityWarning::UnbalancedLedger { sum });
    }
    warnings
}

/// Checks balances after a policy was applied. Identity policies never
/// warn here: an unbalanced input is already reported by [`check_ledger`].
pub fn check_adjusted(policy: PolicyType, adjusted: &Balances) -> Option<DataIntegrityWarning> {
    match policy {
        PolicyType::EqualSplit | PolicyType::Proportional => None,
        PolicyType::IncomeBased | PolicyType::CustomShare => {
            let sum = adjusted.total();
            (!is_negligible(sum))
                .then_some(DataIntegrityWarning::UnbalancedAfterPolicy { policy, sum })
        }
    }
}

/// Checks that `transactions` settle `balances` completely.
pub fn check_residual(
    balances: &Balances,
    transactions: &[Transaction],
) -> Option<DataIntegrityWarning> {
    let residual: Money = netting::residual_balances(balances, transactions)
        .iter()
        .map(|(_, amount)| amount.abs())
        .sum();
    (!is_negligible(residual))
        .then_some(DataIntegrityWarning::ResidualAfterNetting { residual })
}
