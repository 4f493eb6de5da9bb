//! Mapping between the wire documents of `api_types` and the engine types.
//!
//! Enums cross the boundary through their canonical names, so the engine
//! stays the single place that decides what a valid role or currency is.
use api_types::settlement::{
    EdgeView, GraphResponse, GraphView, MemberBalanceView, NodeView, PolicyType,
    SettlementResponse, TransactionView, WarningView,
};
use api_types::{Currency, snapshot};
use engine::{
    Balances, DataIntegrityWarning, ExpenseRecord, GraphOnlyResult, GroupSnapshot,
    IncomeBracket, Member, MemberRole, SettlementGraph, SettlementResult, SplitRecord,
};
use rust_decimal::Decimal;

use crate::error::Result;

pub fn group_snapshot(doc: snapshot::GroupSnapshot) -> Result<GroupSnapshot> {
    let currency = engine::Currency::try_from(doc.currency.as_str())?;
    let mut group = GroupSnapshot::new(doc.id, doc.name).with_currency(currency);

    for member in doc.members {
        group = group.with_member(member_record(member)?);
    }
    for expense in doc.expenses {
        group = group.with_expense(expense_record(expense));
    }
    Ok(group)
}

fn member_record(doc: snapshot::Member) -> Result<Member> {
    let member = Member::new(doc.id, doc.display_name)
        .with_role(MemberRole::try_from(doc.role.as_str())?)
        .with_share_factor(doc.share_factor.unwrap_or(Decimal::ONE))
        .with_income_bracket(IncomeBracket::try_from(doc.income_bracket.as_str())?);
    Ok(if doc.is_active {
        member
    } else {
        member.inactive()
    })
}

fn expense_record(doc: snapshot::Expense) -> ExpenseRecord {
    let expense = doc.splits.into_iter().fold(
        ExpenseRecord::new(doc.id, doc.payer_id, doc.amount_subtotal).with_tax(doc.amount_tax),
        |expense, split| expense.with_split(SplitRecord::new(split.member_id, split.amount_owed)),
    );
    if doc.is_settled {
        expense.settled()
    } else {
        expense
    }
}

pub fn settlement_response(result: &SettlementResult) -> SettlementResponse {
    SettlementResponse {
        group_id: result.group_id.0,
        group_name: result.group_name.clone(),
        currency: currency(result.currency),
        policy: policy(result.policy),
        total_settled: result.total_settled.amount(),
        transaction_count: result.transaction_count,
        transactions: result
            .transactions
            .iter()
            .map(|tx| TransactionView {
                from_member: tx.from_member.0,
                to_member: tx.to_member.0,
                amount: tx.amount.amount(),
                explanation: tx.explanation.clone(),
            })
            .collect(),
        balances: balances(&result.balances),
        graph: graph(&result.graph),
        warnings: warnings(&result.warnings),
    }
}

pub fn graph_response(result: &GraphOnlyResult) -> GraphResponse {
    GraphResponse {
        group_id: result.group_id.0,
        group_name: result.group_name.clone(),
        balances: balances(&result.balances),
        graph: graph(&result.graph),
        warnings: warnings(&result.warnings),
    }
}

fn balances(balances: &Balances) -> Vec<MemberBalanceView> {
    balances
        .iter()
        .map(|(member_id, balance)| MemberBalanceView {
            member_id: member_id.0,
            balance: balance.amount(),
        })
        .collect()
}

fn graph(graph: &SettlementGraph) -> GraphView {
    GraphView {
        nodes: graph
            .nodes
            .iter()
            .map(|node| NodeView {
                id: node.id.0,
                display_name: node.display_name.clone(),
                role: role(node.role),
            })
            .collect(),
        edges: graph
            .edges
            .iter()
            .map(|edge| EdgeView {
                from: edge.from.0,
                to: edge.to.0,
                amount: edge.amount.amount(),
                explanation: edge.explanation.clone(),
            })
            .collect(),
    }
}

fn warnings(warnings: &[DataIntegrityWarning]) -> Vec<WarningView> {
    warnings
        .iter()
        .map(|warning| WarningView {
            kind: warning.kind().to_string(),
            message: warning.to_string(),
        })
        .collect()
}

fn currency(currency: engine::Currency) -> Currency {
    match currency {
        engine::Currency::Inr => Currency::Inr,
        engine::Currency::Eur => Currency::Eur,
        engine::Currency::Usd => Currency::Usd,
    }
}

fn policy(policy: engine::PolicyType) -> PolicyType {
    match policy {
        engine::PolicyType::EqualSplit => PolicyType::EqualSplit,
        engine::PolicyType::IncomeBased => PolicyType::IncomeBased,
        engine::PolicyType::CustomShare => PolicyType::CustomShare,
        engine::PolicyType::Proportional => PolicyType::Proportional,
    }
}

fn role(role: MemberRole) -> snapshot::MemberRole {
    match role {
        MemberRole::Owner => snapshot::MemberRole::Owner,
        MemberRole::Treasurer => snapshot::MemberRole::Treasurer,
        MemberRole::Auditor => snapshot::MemberRole::Auditor,
        MemberRole::Member => snapshot::MemberRole::Member,
    }
}
