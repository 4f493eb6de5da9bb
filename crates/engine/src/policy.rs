//! Fairness policies applied to net balances before netting.
//!
//! `income_based` and `custom_share` scale balances member by member and do
//! not renormalize afterwards, so total debt and total credit may diverge.
//! The orchestrator reports that as an integrity warning.

use std::{collections::HashMap, fmt, str::FromStr};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{Balances, EngineError, IncomeBracket, Member, MemberId};

/// Factor applied to the balance of low income members by `income_based`.
pub const LOW_INCOME_DISCOUNT: Decimal = dec!(0.8);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyType {
    /// Balances are used as computed.
    #[default]
    EqualSplit,
    /// Low income members' balances move 20% toward zero.
    IncomeBased,
    /// Every balance is multiplied by the member's share factor.
    CustomShare,
    /// Splits already encode the proportions; balances are used as computed.
    Proportional,
}

impl PolicyType {
    pub const ALL: [PolicyType; 4] = [
        PolicyType::EqualSplit,
        PolicyType::IncomeBased,
        PolicyType::CustomShare,
        PolicyType::Proportional,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EqualSplit => "equal_split",
            Self::IncomeBased => "income_based",
            Self::CustomShare => "custom_share",
            Self::Proportional => "proportional",
        }
    }

    /// Returns the adjusted balances. The input is left untouched and the
    /// member order is preserved.
    ///
    /// Balances of ids without a matching member are copied unchanged.
    pub fn apply<'a, M>(self, balances: &Balances, members: M) -> Balances
    where
        M: IntoIterator<Item = &'a Member>,
    {
        match self {
            Self::EqualSplit | Self::Proportional => balances.clone(),
            Self::IncomeBased => scale_by(balances, members, |member| {
                match member.income_bracket {
                    IncomeBracket::Low => LOW_INCOME_DISCOUNT,
                    IncomeBracket::Medium | IncomeBracket::High => Decimal::ONE,
                }
            }),
            Self::CustomShare => scale_by(balances, members, |member| member.share_factor),
        }
    }
}

fn scale_by<'a, M, F>(balances: &Balances, members: M, factor: F) -> Balances
where
    M: IntoIterator<Item = &'a Member>,
    F: Fn(&Member) -> Decimal,
{
    let by_id: HashMap<MemberId, &Member> = members.into_iter().map(|m| (m.id, m)).collect();
    balances
        .iter()
        .map(|(member_id, amount)| match by_id.get(&member_id) {
            Some(member) => (member_id, amount.scale(factor(member))),
            None => (member_id, amount),
        })
        .collect()
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PolicyType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal_split" => Ok(Self::EqualSplit),
            "income_based" => Ok(Self::IncomeBased),
            "custom_share" => Ok(Self::CustomShare),
            "proportional" => Ok(Self::Proportional),
            other => {
                let valid: Vec<&str> = Self::ALL.iter().map(|p| p.as_str()).collect();
                Err(EngineError::InvalidPolicy(format!(
                    "{other} (must be one of: {})",
                    valid.join(", ")
                )))
            }
        }
    }
}

impl FromStr for PolicyType {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}
