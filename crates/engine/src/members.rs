//! Group members as seen by the settlement core.
//!
//! Members are owned by the data store; the engine only ever receives
//! read-only copies of them inside a [`GroupSnapshot`](crate::GroupSnapshot).

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Opaque member identity (the user id in the data store).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub u64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role of a member inside a group.
///
/// Roles are advisory to the settlement core: they are copied to the graph
/// nodes but never change how balances are computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Owner,
    Treasurer,
    Auditor,
    #[default]
    Member,
}

impl MemberRole {
    /// Returns the canonical role string used by the data store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Treasurer => "treasurer",
            Self::Auditor => "auditor",
            Self::Member => "member",
        }
    }
}

impl TryFrom<&str> for MemberRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "owner" => Ok(Self::Owner),
            "treasurer" => Ok(Self::Treasurer),
            "auditor" => Ok(Self::Auditor),
            "member" => Ok(Self::Member),
            other => Err(EngineError::InvalidRole(format!(
                "invalid member role: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeBracket {
    Low,
    #[default]
    Medium,
    High,
}

impl IncomeBracket {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for IncomeBracket {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(EngineError::InvalidIncomeBracket(format!(
                "unknown bracket: {other}"
            ))),
        }
    }
}

/// A member of a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    pub role: MemberRole,
    /// Weight used by the `custom_share` policy. Expected to be positive.
    pub share_factor: Decimal,
    pub income_bracket: IncomeBracket,
    /// Inactive members are ignored by the settlement core.
    pub is_active: bool,
}

impl Member {
    /// Creates an active member with default role, share factor `1` and
    /// medium income bracket.
    pub fn new(id: u64, display_name: impl Into<String>) -> Self {
        Self {
            id: MemberId(id),
            display_name: display_name.into(),
            role: MemberRole::default(),
            share_factor: Decimal::ONE,
            income_bracket: IncomeBracket::default(),
            is_active: true,
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.role = role;
        self
    }

    #[must_use]
    pub fn with_share_factor(mut self, share_factor: Decimal) -> Self {
        self.share_factor = share_factor;
        self
    }

    #[must_use]
    pub fn with_income_bracket(mut self, income_bracket: IncomeBracket) -> Self {
        self.income_bracket = income_bracket;
        self
    }

    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }
}
