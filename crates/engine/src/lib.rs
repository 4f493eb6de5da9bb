//! Settlement core for groups sharing expenses.
//!
//! Given a [`GroupSnapshot`] (members plus unsettled expenses) the engine
//! computes each member's net balance, reweights balances with a
//! [`PolicyType`], nets them into point-to-point [`Transaction`]s and renders
//! the result as a [`SettlementGraph`].
//!
//! The free functions [`compute_settlement`] and [`compute_graph_only`] work
//! on a snapshot directly. [`Engine`] wraps them behind a [`SnapshotStore`]
//! and validates policy names.
//!
//! ```rust
//! use engine::{
//!     Engine, ExpenseRecord, GroupId, GroupSnapshot, InMemoryStore, Member, SplitRecord,
//! };
//!
//! let snapshot = GroupSnapshot::new(1, "Flat")
//!     .with_member(Member::new(1, "alice"))
//!     .with_member(Member::new(2, "bob"))
//!     .with_expense(
//!         ExpenseRecord::new(1, 1, 100)
//!             .with_split(SplitRecord::new(1, 50))
//!             .with_split(SplitRecord::new(2, 50)),
//!     );
//! let engine = Engine::builder()
//!     .store(InMemoryStore::from_iter([snapshot]))
//!     .build()
//!     .unwrap();
//!
//! let result = engine.compute_settlement(GroupId(1), "equal_split").unwrap();
//! assert_eq!(result.transaction_count, 1);
//! assert_eq!(result.transactions[0].explanation, "Debt settlement of ₹50.00");
//! ```

pub use balances::{Balances, aggregate_balances};
pub use currency::Currency;
pub use error::EngineError;
pub use expenses::{ExpenseId, ExpenseRecord, SplitRecord};
pub use graph::{GraphEdge, GraphNode, SettlementGraph};
pub use integrity::{DataIntegrityWarning, INTEGRITY_TOLERANCE};
pub use members::{IncomeBracket, Member, MemberId, MemberRole};
pub use money::Money;
pub use netting::{GreedyNetting, NettingStrategy, OptimalNetting, Transaction, residual_balances};
pub use policy::{LOW_INCOME_DISCOUNT, PolicyType};
pub use settlement::{GraphOnlyResult, SettlementResult, compute_graph_only, compute_settlement};
pub use snapshot::{GroupId, GroupSnapshot, InMemoryStore, SnapshotStore};

mod balances;
mod currency;
mod error;
mod expenses;
mod graph;
mod integrity;
mod members;
mod money;
mod netting;
mod policy;
mod settlement;
mod snapshot;

pub type ResultEngine<T> = Result<T, EngineError>;

/// Settlement facade over a [`SnapshotStore`].
///
/// The engine holds no mutable state: it can be shared between threads and
/// called concurrently for the same or different groups.
pub struct Engine {
    store: Box<dyn SnapshotStore>,
    netting: Box<dyn NettingStrategy>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("netting", &self.netting.name())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Computes the settlement of a group under the named policy.
    ///
    /// The policy name is validated before the store is queried, so an
    /// unknown policy never triggers any computation.
    pub fn compute_settlement(
        &self,
        group_id: GroupId,
        policy_type: &str,
    ) -> ResultEngine<SettlementResult> {
        let policy = PolicyType::try_from(policy_type)?;
        let snapshot = self.store.snapshot(group_id)?;
        Ok(compute_settlement(&snapshot, policy, self.netting.as_ref()))
    }

    /// Computes raw balances and the settlement graph of a group.
    pub fn compute_graph_only(&self, group_id: GroupId) -> ResultEngine<GraphOnlyResult> {
        let snapshot = self.store.snapshot(group_id)?;
        Ok(compute_graph_only(&snapshot, self.netting.as_ref()))
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Box<dyn SnapshotStore>>,
    netting: Option<Box<dyn NettingStrategy>>,
}

impl EngineBuilder {
    /// Pass the required snapshot store
    pub fn store(mut self, store: impl SnapshotStore + 'static) -> EngineBuilder {
        self.store = Some(Box::new(store));
        self
    }

    /// Pass the netting strategy. Defaults to [`GreedyNetting`].
    pub fn netting(mut self, netting: impl NettingStrategy + 'static) -> EngineBuilder {
        self.netting = Some(Box::new(netting));
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine> {
        let store = self
            .store
            .ok_or_else(|| EngineError::Configuration("missing snapshot store".to_string()))?;
        Ok(Engine {
            store,
            netting: self.netting.unwrap_or_else(|| Box::new(GreedyNetting)),
        })
    }
}
