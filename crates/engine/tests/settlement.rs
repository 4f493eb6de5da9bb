use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use engine::{
    DataIntegrityWarning, Engine, EngineError, ExpenseRecord, GreedyNetting, GroupId,
    GroupSnapshot, InMemoryStore, IncomeBracket, Member, MemberId, MemberRole, Money,
    OptimalNetting, PolicyType, SplitRecord, aggregate_balances, compute_settlement,
};

/// Three flatmates, two expenses split three ways (payer included).
///
/// alice pays 300 + 54 tax, bob pays 200 + 36 tax, carol pays nothing.
fn flatmates() -> GroupSnapshot {
    let third = |total: Decimal| total / dec!(3);
    let mut snapshot = GroupSnapshot::new(1, "Test Group")
        .with_member(Member::new(1, "alice").with_role(MemberRole::Owner))
        .with_member(Member::new(2, "bob"))
        .with_member(Member::new(3, "carol").with_income_bracket(IncomeBracket::Low));

    let expenses = [
        (1, 1, dec!(300.00), dec!(54.00)),
        (2, 2, dec!(200.00), dec!(36.00)),
    ];
    for (id, payer, subtotal, tax) in expenses {
        let mut expense = ExpenseRecord::new(id, payer, subtotal).with_tax(tax);
        let share = third(expense.total_amount().amount());
        for member in 1..=3 {
            expense = expense.with_split(SplitRecord::new(member, share));
        }
        snapshot = snapshot.with_expense(expense);
    }
    snapshot
}

fn engine_with(snapshots: impl IntoIterator<Item = GroupSnapshot>) -> Engine {
    Engine::builder()
        .store(snapshots.into_iter().collect::<InMemoryStore>())
        .build()
        .unwrap()
}

fn rounded(amount: Money) -> Decimal {
    amount.round_for_display(2).amount()
}

#[test]
fn flatmates_net_balances() {
    let snapshot = flatmates();
    let balances = aggregate_balances(snapshot.active_members(), snapshot.unsettled_expenses());

    assert_eq!(rounded(balances.get(MemberId(1)).unwrap()), dec!(157.33));
    assert_eq!(rounded(balances.get(MemberId(2)).unwrap()), dec!(39.33));
    assert_eq!(rounded(balances.get(MemberId(3)).unwrap()), dec!(-196.67));
    assert!(balances.total().abs().amount() < engine::INTEGRITY_TOLERANCE);
}

#[test]
fn flatmates_pay_largest_creditor_first() {
    let engine = engine_with([flatmates()]);

    let result = engine.compute_settlement(GroupId(1), "equal_split").unwrap();

    let payments: Vec<_> = result
        .transactions
        .iter()
        .map(|t| (t.from_member.0, t.to_member.0, rounded(t.amount)))
        .collect();
    assert_eq!(payments, vec![(3, 1, dec!(157.33)), (3, 2, dec!(39.33))]);
    assert_eq!(result.transaction_count, 2);
    assert_eq!(rounded(result.total_settled), dec!(196.67));
    let unsettled = result.balances.total_debt() - result.total_settled;
    assert!(unsettled.abs().amount() < engine::INTEGRITY_TOLERANCE);
    assert_eq!(
        result.transactions[0].explanation,
        "Debt settlement of ₹157.33"
    );
    assert!(result.warnings.is_empty(), "{:?}", result.warnings);
}

#[test]
fn unknown_policy_is_rejected() {
    let engine = engine_with([flatmates()]);

    let err = engine
        .compute_settlement(GroupId(1), "unknown_policy")
        .unwrap_err();

    assert!(
        matches!(err, EngineError::InvalidPolicy(ref msg) if msg.contains("unknown_policy"))
    );
}

#[test]
fn unknown_policy_is_rejected_before_loading_the_group() {
    let engine = engine_with([]);

    assert!(matches!(
        engine.compute_settlement(GroupId(99), "fair"),
        Err(EngineError::InvalidPolicy(_))
    ));
    assert!(matches!(
        engine.compute_settlement(GroupId(99), "equal_split"),
        Err(EngineError::KeyNotFound(_))
    ));
}

#[test]
fn single_member_group_settles_nothing() {
    let snapshot = GroupSnapshot::new(2, "Solo")
        .with_member(Member::new(1, "alice"))
        .with_expense(ExpenseRecord::new(1, 1, 80).with_split(SplitRecord::new(1, 80)));
    let engine = engine_with([snapshot]);

    let result = engine.compute_settlement(GroupId(2), "equal_split").unwrap();

    assert!(result.transactions.is_empty());
    assert_eq!(result.total_settled, Money::ZERO);
    assert_eq!(result.balances.get(MemberId(1)), Some(Money::ZERO));
    assert_eq!(result.graph.nodes.len(), 1);
    assert!(result.graph.edges.is_empty());
}

#[test]
fn repeated_calls_are_identical() {
    let engine = engine_with([flatmates()]);

    for policy in PolicyType::ALL {
        let first = engine.compute_settlement(GroupId(1), policy.as_str()).unwrap();
        let second = engine.compute_settlement(GroupId(1), policy.as_str()).unwrap();
        assert_eq!(first, second, "{policy}");
    }
}

#[test]
fn equal_split_keeps_raw_balances() {
    let snapshot = flatmates();
    let raw = aggregate_balances(snapshot.active_members(), snapshot.unsettled_expenses());

    let result = compute_settlement(&snapshot, PolicyType::EqualSplit, &GreedyNetting);

    assert_eq!(result.balances, raw);
}

#[test]
fn income_based_breaks_zero_sum() {
    let result = compute_settlement(&flatmates(), PolicyType::IncomeBased, &GreedyNetting);

    // carol is low income: her debt shrinks, the creditors' claims do not.
    assert_eq!(
        rounded(result.balances.get(MemberId(3)).unwrap()),
        dec!(-157.33)
    );
    assert_eq!(
        rounded(result.balances.get(MemberId(1)).unwrap()),
        dec!(157.33)
    );
    assert!(result.balances.total_credit() > result.balances.total_debt());
    assert_eq!(result.total_settled, result.balances.total_debt());
    assert!(matches!(
        result.warnings.as_slice(),
        [
            DataIntegrityWarning::UnbalancedAfterPolicy {
                policy: PolicyType::IncomeBased,
                ..
            },
            DataIntegrityWarning::ResidualAfterNetting { .. },
        ]
    ));
}

#[test]
fn custom_share_scales_by_share_factor() {
    let snapshot = GroupSnapshot::new(3, "Club")
        .with_member(Member::new(1, "alice").with_share_factor(dec!(2)))
        .with_member(Member::new(2, "bob").with_share_factor(dec!(0.5)))
        .with_expense(ExpenseRecord::new(1, 1, 100).with_split(SplitRecord::new(2, 100)));

    let result = compute_settlement(&snapshot, PolicyType::CustomShare, &GreedyNetting);

    assert_eq!(result.balances.get(MemberId(1)), Some(Money::from(200)));
    assert_eq!(result.balances.get(MemberId(2)), Some(Money::from(-50)));
    assert_eq!(result.total_settled, Money::from(50));
}

#[test]
fn settled_expenses_and_inactive_members_are_skipped() {
    let snapshot = GroupSnapshot::new(4, "Trip")
        .with_member(Member::new(1, "alice"))
        .with_member(Member::new(2, "bob"))
        .with_member(Member::new(3, "dave").inactive())
        .with_expense(
            ExpenseRecord::new(1, 1, 60)
                .with_split(SplitRecord::new(2, 60))
                .settled(),
        )
        .with_expense(ExpenseRecord::new(2, 2, 10).with_split(SplitRecord::new(1, 10)));

    let result = compute_settlement(&snapshot, PolicyType::EqualSplit, &GreedyNetting);

    assert_eq!(result.balances.len(), 2);
    assert_eq!(result.graph.nodes.len(), 2);
    assert_eq!(result.transactions.len(), 1);
    assert_eq!(result.transactions[0].from_member, MemberId(1));
    assert_eq!(result.transactions[0].amount, Money::from(10));
}

#[test]
fn expenses_of_former_members_are_flagged() {
    let snapshot = GroupSnapshot::new(5, "Band")
        .with_member(Member::new(1, "alice"))
        .with_member(Member::new(2, "bob").inactive())
        .with_expense(ExpenseRecord::new(1, 2, 40).with_split(SplitRecord::new(1, 40)));

    let result = compute_settlement(&snapshot, PolicyType::EqualSplit, &GreedyNetting);

    assert_eq!(
        result.warnings,
        vec![DataIntegrityWarning::UnknownMember {
            member_id: MemberId(2)
        }]
    );
    assert_eq!(result.transactions[0].to_member, MemberId(2));
    assert!(result.graph.node(MemberId(2)).is_none());
}

#[test]
fn inconsistent_splits_are_flagged_not_fatal() {
    let snapshot = GroupSnapshot::new(6, "Office")
        .with_member(Member::new(1, "alice"))
        .with_member(Member::new(2, "bob"))
        .with_expense(ExpenseRecord::new(1, 1, 100).with_split(SplitRecord::new(2, 30)));

    let result = compute_settlement(&snapshot, PolicyType::EqualSplit, &GreedyNetting);

    assert_eq!(result.total_settled, Money::from(30));
    assert_eq!(
        result.warnings,
        vec![
            DataIntegrityWarning::UnbalancedLedger {
                sum: Money::from(70)
            },
            DataIntegrityWarning::ResidualAfterNetting {
                residual: Money::from(70)
            },
        ]
    );
}

#[test]
fn graph_only_matches_equal_split() {
    let engine = engine_with([flatmates()]);

    let graph_only = engine.compute_graph_only(GroupId(1)).unwrap();
    let settlement = engine.compute_settlement(GroupId(1), "equal_split").unwrap();

    assert_eq!(graph_only.group_name, "Test Group");
    assert_eq!(graph_only.balances, settlement.balances);
    assert_eq!(graph_only.graph, settlement.graph);
    assert_eq!(graph_only.graph.nodes.len(), 3);
    assert_eq!(graph_only.graph.nodes[0].role, MemberRole::Owner);
}

#[test]
fn optimal_strategy_matches_greedy_for_now() {
    let greedy = engine_with([flatmates()]);
    let optimal = Engine::builder()
        .store(InMemoryStore::from_iter([flatmates()]))
        .netting(OptimalNetting)
        .build()
        .unwrap();

    assert_eq!(
        optimal.compute_settlement(GroupId(1), "equal_split").unwrap(),
        greedy.compute_settlement(GroupId(1), "equal_split").unwrap()
    );
}

#[test]
fn concurrent_requests_agree() {
    let engine = engine_with([flatmates()]);
    let expected = engine.compute_settlement(GroupId(1), "custom_share").unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| engine.compute_settlement(GroupId(1), "custom_share")))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), expected);
        }
    });
}
