use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Amounts travel as decimal strings (`"157.33"`), never as JSON floats.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Eur,
    Usd,
}

impl Currency {
    /// Returns the ISO code understood by the engine.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Eur => "EUR",
            Self::Usd => "USD",
        }
    }
}

pub mod snapshot {
    use super::*;

    /// Role of a member inside a group.
    ///
    /// - `owner`: created the group.
    /// - `treasurer`: keeps the books.
    /// - `auditor`: read-only reviewer.
    /// - `member`: everybody else.
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
        /// Returns the canonical role string used by the engine.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Owner => "owner",
                Self::Treasurer => "treasurer",
                Self::Auditor => "auditor",
                Self::Member => "member",
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
        pub fn as_str(self) -> &'static str {
            match self {
                Self::Low => "low",
                Self::Medium => "medium",
                Self::High => "high",
            }
        }
    }

    /// A group with its members and expenses, as exported by the data store.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupSnapshot {
        pub id: u64,
        pub name: String,
        #[serde(default)]
        pub currency: Currency,
        pub members: Vec<Member>,
        #[serde(default)]
        pub expenses: Vec<Expense>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Member {
        pub id: u64,
        pub display_name: String,
        #[serde(default)]
        pub role: MemberRole,
        /// Weight used by the `custom_share` policy. Defaults to 1.
        pub share_factor: Option<Decimal>,
        #[serde(default)]
        pub income_bracket: IncomeBracket,
        /// Former members keep their history but get no graph node.
        #[serde(default = "default_active")]
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Expense {
        pub id: u64,
        pub payer_id: u64,
        pub amount_subtotal: Decimal,
        #[serde(default)]
        pub amount_tax: Decimal,
        #[serde(default)]
        pub is_settled: bool,
        pub splits: Vec<Split>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Split {
        pub member_id: u64,
        pub amount_owed: Decimal,
    }

    fn default_active() -> bool {
        true
    }
}

pub mod settlement {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PolicyType {
        #[default]
        EqualSplit,
        IncomeBased,
        CustomShare,
        Proportional,
    }

    impl PolicyType {
        /// Returns the policy name accepted by the engine.
        pub fn as_str(self) -> &'static str {
            match self {
                Self::EqualSplit => "equal_split",
                Self::IncomeBased => "income_based",
                Self::CustomShare => "custom_share",
                Self::Proportional => "proportional",
            }
        }
    }

    /// One payment that moves money from a debtor to a creditor.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub from_member: u64,
        pub to_member: u64,
        pub amount: Decimal,
        pub explanation: String,
    }

    /// Net balance of a member: positive is owed, negative owes.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MemberBalanceView {
        pub member_id: u64,
        pub balance: Decimal,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct NodeView {
        pub id: u64,
        pub display_name: String,
        pub role: snapshot::MemberRole,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EdgeView {
        pub from: u64,
        pub to: u64,
        pub amount: Decimal,
        pub explanation: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GraphView {
        pub nodes: Vec<NodeView>,
        pub edges: Vec<EdgeView>,
    }

    /// Non-fatal data problem found while settling.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct WarningView {
        /// Machine readable kind, e.g. `unbalanced_after_policy`.
        pub kind: String,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SettlementResponse {
        pub group_id: u64,
        pub group_name: String,
        pub currency: Currency,
        pub policy: PolicyType,
        pub total_settled: Decimal,
        pub transaction_count: usize,
        pub transactions: Vec<TransactionView>,
        pub balances: Vec<MemberBalanceView>,
        pub graph: GraphView,
        pub warnings: Vec<WarningView>,
    }

    /// Raw balances and the settlement graph, without a policy.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GraphResponse {
        pub group_id: u64,
        pub group_name: String,
        pub balances: Vec<MemberBalanceView>,
        pub graph: GraphView,
        pub warnings: Vec<WarningView>,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::settlement::*;
    use super::snapshot::*;
    use super::*;

    #[test]
    fn snapshot_defaults_are_filled_in() {
        let snapshot: GroupSnapshot = serde_json::from_value(json!({
            "id": 7,
            "name": "Flat",
            "members": [{ "id": 1, "display_name": "alice" }],
        }))
        .unwrap();

        assert_eq!(snapshot.currency, Currency::Inr);
        assert!(snapshot.expenses.is_empty());
        let member = &snapshot.members[0];
        assert_eq!(member.role, MemberRole::Member);
        assert_eq!(member.income_bracket, IncomeBracket::Medium);
        assert_eq!(member.share_factor, None);
        assert!(member.is_active);
    }

    #[test]
    fn amounts_keep_their_exact_digits() {
        let expense: Expense = serde_json::from_value(json!({
            "id": 1,
            "payer_id": 1,
            "amount_subtotal": "78.6666666666666666666666667",
            "amount_tax": "0.10",
            "splits": [{ "member_id": 2, "amount_owed": "78.7666666666666666666666667" }],
        }))
        .unwrap();

        assert_eq!(expense.amount_subtotal, dec!(78.6666666666666666666666667));
        assert_eq!(expense.amount_tax.to_string(), "0.10");
        assert!(!expense.is_settled);
    }

    #[test]
    fn response_amounts_are_strings() {
        let view = TransactionView {
            from_member: 3,
            to_member: 1,
            amount: dec!(157.33),
            explanation: "Debt settlement of ₹157.33".to_string(),
        };

        let value = serde_json::to_value(&view).unwrap();

        assert_eq!(value["amount"], json!("157.33"));
    }

    #[test]
    fn enums_use_engine_names() {
        assert_eq!(
            serde_json::to_value(PolicyType::IncomeBased).unwrap(),
            json!(PolicyType::IncomeBased.as_str())
        );
        assert_eq!(
            serde_json::to_value(MemberRole::Treasurer).unwrap(),
            json!("treasurer")
        );
        assert_eq!(serde_json::to_value(Currency::Eur).unwrap(), json!("EUR"));
        assert_eq!(IncomeBracket::Low.as_str(), "low");
    }
}
