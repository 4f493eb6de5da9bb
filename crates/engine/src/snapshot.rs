//! Group snapshots and the boundary towards the data store.
//!
//! The settlement core never loads data lazily: a [`SnapshotStore`] hands
//! out a complete, immutable [`GroupSnapshot`] and every computation runs on
//! that value.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ExpenseRecord, Member, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub u64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Point-in-time copy of a group, its members and its expenses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub id: GroupId,
    pub name: String,
    pub currency: Currency,
    pub members: Vec<Member>,
    pub expenses: Vec<ExpenseRecord>,
}

impl GroupSnapshot {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id: GroupId(id),
            name: name.into(),
            currency: Currency::default(),
            members: Vec::new(),
            expenses: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    #[must_use]
    pub fn with_expense(mut self, expense: ExpenseRecord) -> Self {
        self.expenses.push(expense);
        self
    }

    /// Members with `is_active` set, in snapshot order.
    pub fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter().filter(|m| m.is_active)
    }

    /// Expenses not yet settled, in snapshot order.
    pub fn unsettled_expenses(&self) -> impl Iterator<Item = &ExpenseRecord> {
        self.expenses.iter().filter(|e| !e.is_settled)
    }
}

/// Read-only access to group snapshots.
///
/// Implementations wrap whatever persistence the surrounding service uses.
/// Authorization and existence checks belong to the implementation: the
/// engine trusts whatever snapshot it is given.
pub trait SnapshotStore: Send + Sync {
    fn snapshot(&self, group_id: GroupId) -> ResultEngine<GroupSnapshot>;
}

/// A [`SnapshotStore`] backed by a map, useful for tests and one-shot tools.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    groups: HashMap<GroupId, GroupSnapshot>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the snapshot of a group.
    pub fn insert(&mut self, snapshot: GroupSnapshot) {
        self.groups.insert(snapshot.id, snapshot);
    }
}

impl FromIterator<GroupSnapshot> for InMemoryStore {
    fn from_iter<T: IntoIterator<Item = GroupSnapshot>>(iter: T) -> Self {
        let mut store = Self::new();
        for snapshot in iter {
            store.insert(snapshot);
        }
        store
    }
}

impl SnapshotStore for InMemoryStore {
    fn snapshot(&self, group_id: GroupId) -> ResultEngine<GroupSnapshot> {
        self.groups
            .get(&group_id)
            .cloned()
            .ok_or_else(|| EngineError::KeyNotFound(format!("group {group_id}")))
    }
}
