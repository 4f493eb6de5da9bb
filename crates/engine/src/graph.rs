//! Directed settlement graph: members as nodes, payments as edges.

use serde::{Deserialize, Serialize};

use crate::{Member, MemberId, MemberRole, Money, Transaction};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: MemberId,
    pub display_name: String,
    pub role: MemberRole,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: MemberId,
    pub to: MemberId,
    pub amount: Money,
    pub explanation: String,
}

/// Plain node/edge lists. Nodes follow member order, edges follow
/// transaction order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl SettlementGraph {
    /// Builds the graph without any filtering: every member becomes a node,
    /// even with no edges, and every transaction becomes an edge.
    pub fn build<'a, M>(members: M, transactions: &[Transaction]) -> Self
    where
        M: IntoIterator<Item = &'a Member>,
    {
        let nodes = members
            .into_iter()
            .map(|member| GraphNode {
                id: member.id,
                display_name: member.display_name.clone(),
                role: member.role,
            })
            .collect();
        let edges = transactions
            .iter()
            .map(|tx| GraphEdge {
                from: tx.from_member,
                to: tx.to_member,
                amount: tx.amount,
                explanation: tx.explanation.clone(),
            })
            .collect();

        Self { nodes, edges }
    }

    pub fn node(&self, member_id: MemberId) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == member_id)
    }

    /// Payments made by `member_id`.
    pub fn outgoing(&self, member_id: MemberId) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.from == member_id)
    }

    /// Payments received by `member_id`.
    pub fn incoming(&self, member_id: MemberId) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |edge| edge.to == member_id)
    }
}
