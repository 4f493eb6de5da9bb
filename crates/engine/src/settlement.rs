//! One settlement request, end to end.
//!
//! aggregate → adjust by policy → net → build graph → summarize. Every step
//! is a pure function of the snapshot, so two calls with the same snapshot,
//! policy and strategy return identical results.

use crate::{
    Balances, Currency, DataIntegrityWarning, GroupId, GroupSnapshot, Money, NettingStrategy,
    PolicyType, SettlementGraph, Transaction, aggregate_balances, integrity,
};

/// Outcome of a settlement computation. Built fresh on every call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementResult {
    pub group_id: GroupId,
    pub group_name: String,
    pub currency: Currency,
    pub policy: PolicyType,
    pub transactions: Vec<Transaction>,
    /// Sum of every transaction amount.
    pub total_settled: Money,
    pub transaction_count: usize,
    /// Balances after the policy was applied, i.e. the ones that were netted.
    pub balances: Balances,
    pub graph: SettlementGraph,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Raw balances and the greedy graph, without any policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphOnlyResult {
    pub group_id: GroupId,
    pub group_name: String,
    pub balances: Balances,
    pub graph: SettlementGraph,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Computes the settlement of `snapshot` under `policy`.
pub fn compute_settlement(
    snapshot: &GroupSnapshot,
    policy: PolicyType,
    strategy: &dyn NettingStrategy,
) -> SettlementResult {
    let raw = aggregate_balances(snapshot.active_members(), snapshot.unsettled_expenses());
    let mut warnings = integrity::check_ledger(&raw, snapshot.active_members());

    let balances = policy.apply(&raw, snapshot.active_members());
    warnings.extend(integrity::check_adjusted(policy, &balances));

    let transactions = strategy.net(&balances, snapshot.currency);
    warnings.extend(integrity::check_residual(&balances, &transactions));

    let graph = SettlementGraph::build(snapshot.active_members(), &transactions);
    let total_settled: Money = transactions.iter().map(|tx| tx.amount).sum();

    tracing::debug!(
        group = %snapshot.id,
        %policy,
        strategy = strategy.name(),
        members = balances.len(),
        expenses = snapshot.unsettled_expenses().count(),
        transactions = transactions.len(),
        %total_settled,
        "settlement computed"
    );
    log_warnings(snapshot.id, &warnings);

    SettlementResult {
        group_id: snapshot.id,
        group_name: snapshot.name.clone(),
        currency: snapshot.currency,
        policy,
        transaction_count: transactions.len(),
        total_settled,
        transactions,
        balances,
        graph,
        warnings,
    }
}

/// Computes raw balances and their settlement graph.
///
/// Equivalent to [`compute_settlement`] with [`PolicyType::EqualSplit`],
/// minus the summary.
pub fn compute_graph_only(
    snapshot: &GroupSnapshot,
    strategy: &dyn NettingStrategy,
) -> GraphOnlyResult {
    let result = compute_settlement(snapshot, PolicyType::EqualSplit, strategy);
    GraphOnlyResult {
        group_id: result.group_id,
        group_name: result.group_name,
        balances: result.balances,
        graph: result.graph,
        warnings: result.warnings,
    }
}

fn log_warnings(group_id: GroupId, warnings: &[DataIntegrityWarning]) {
    for warning in warnings {
        tracing::warn!(group = %group_id, "data integrity: {warning}");
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::{ExpenseRecord, GreedyNetting, IncomeBracket, Member, MemberId, SplitRecord};

    fn flat() -> GroupSnapshot {
        GroupSnapshot::new(1, "Flat")
            .with_member(Member::new(1, "alice"))
            .with_member(Member::new(2, "bob").with_income_bracket(IncomeBracket::Low))
            .with_expense(
                ExpenseRecord::new(1, 1, dec!(100))
                    .with_split(SplitRecord::new(1, dec!(50)))
                    .with_split(SplitRecord::new(2, dec!(50))),
            )
    }

    #[test]
    fn summary_matches_transactions() {
        let result = compute_settlement(&flat(), PolicyType::EqualSplit, &GreedyNetting);

        assert_eq!(result.group_name, "Flat");
        assert_eq!(result.transaction_count, 1);
        assert_eq!(result.total_settled, Money::from(50));
        assert_eq!(result.transactions[0].from_member, MemberId(2));
        assert_eq!(result.graph.edges.len(), 1);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn income_based_policy_flags_imbalance_and_residual() {
        let result = compute_settlement(&flat(), PolicyType::IncomeBased, &GreedyNetting);

        assert_eq!(result.balances.get(MemberId(2)), Some(Money::from(-40)));
        assert_eq!(result.total_settled, Money::from(40));
        assert_eq!(
            result.warnings,
            vec![
                DataIntegrityWarning::UnbalancedAfterPolicy {
                    policy: PolicyType::IncomeBased,
                    sum: Money::from(10),
                },
                DataIntegrityWarning::ResidualAfterNetting {
                    residual: Money::from(10),
                },
            ]
        );
    }

    #[test]
    fn graph_only_uses_raw_balances() {
        let graph_only = compute_graph_only(&flat(), &GreedyNetting);
        let settlement = compute_settlement(&flat(), PolicyType::EqualSplit, &GreedyNetting);

        assert_eq!(graph_only.balances, settlement.balances);
        assert_eq!(graph_only.graph, settlement.graph);
    }
}
