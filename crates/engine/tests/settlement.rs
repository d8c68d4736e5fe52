use std::collections::HashMap;

use engine::{
    Amount, Contribution, EPSILON, EngineError, Positions, Transfer, aggregate, settle,
    settle_contributions,
};
use proptest::prelude::*;

fn positions(entries: &[(&str, f64)]) -> Positions {
    entries
        .iter()
        .map(|(id, value)| ((*id).to_string(), Amount::new(*value).unwrap()))
        .collect()
}

fn as_triples(transfers: &[Transfer]) -> Vec<(&str, &str, f64)> {
    transfers
        .iter()
        .map(|t| (t.payer.as_str(), t.payee.as_str(), t.amount.value()))
        .collect()
}

/// Amount transferred out minus amount transferred in, per participant.
fn net_movements(transfers: &[Transfer]) -> HashMap<String, f64> {
    let mut moved: HashMap<String, f64> = HashMap::new();
    for transfer in transfers {
        *moved.entry(transfer.payer.clone()).or_default() += transfer.amount.value();
        *moved.entry(transfer.payee.clone()).or_default() -= transfer.amount.value();
    }
    moved
}

/// Asserts that paying out the transfers returns every position to zero.
fn assert_conservation(positions: &Positions, transfers: &[Transfer]) {
    let moved = net_movements(transfers);
    for (participant, position) in positions {
        // Paying out a debt moves the position up toward zero, receiving a
        // credit moves it down, so position plus net outflow must vanish.
        let paid_out = moved.get(participant).copied().unwrap_or(0.0);
        let residual = position.value() + paid_out;
        assert!(
            residual.abs() <= EPSILON,
            "{participant} left with residual {residual}"
        );
    }
}

#[test]
fn two_debtors_one_creditor() {
    let input = positions(&[("A", -30.0), ("B", -20.0), ("C", 50.0)]);
    let transfers = settle(&input).unwrap();

    assert_eq!(
        as_triples(&transfers),
        vec![("A", "C", 30.0), ("B", "C", 20.0)]
    );
    assert_conservation(&input, &transfers);
}

#[test]
fn single_pair() {
    let input = positions(&[("A", 10.0), ("B", -10.0)]);
    let transfers = settle(&input).unwrap();

    assert_eq!(as_triples(&transfers), vec![("B", "A", 10.0)]);
}

#[test]
fn already_settled_positions_produce_no_transfers() {
    let input = positions(&[("A", 0.0), ("B", 0.0)]);
    assert_eq!(settle(&input).unwrap(), Vec::new());
}

#[test]
fn one_creditor_two_debtors() {
    let input = positions(&[("A", 15.0), ("B", -5.0), ("C", -10.0)]);
    let transfers = settle(&input).unwrap();

    // C carries the larger debt, so it pairs first.
    assert_eq!(
        as_triples(&transfers),
        vec![("C", "A", 10.0), ("B", "A", 5.0)]
    );
    assert_conservation(&input, &transfers);
}

#[test]
fn aggregate_nets_paid_against_cost() {
    let input = [
        Contribution::new("A", 10.0, 0.0),
        Contribution::new("B", 0.0, 10.0),
    ];
    let result = aggregate(input).unwrap();

    assert_eq!(result, positions(&[("A", -10.0), ("B", 10.0)]));
}

#[test]
fn unbalanced_positions_are_rejected() {
    let err = settle(&positions(&[("A", 5.0), ("B", -4.0)])).unwrap_err();
    assert!(matches!(err, EngineError::UnbalancedLedger(_)));
}

#[test]
fn duplicate_magnitudes_settle_deterministically() {
    let input = positions(&[("A", -10.0), ("B", -10.0), ("C", 10.0), ("D", 10.0)]);
    let transfers = settle(&input).unwrap();

    assert_eq!(
        as_triples(&transfers),
        vec![("A", "D", 10.0), ("B", "C", 10.0)]
    );
    assert_conservation(&input, &transfers);
}

#[test]
fn identical_input_produces_byte_identical_output() {
    let input = positions(&[
        ("frank", -12.37),
        ("erin", 20.0),
        ("dave", -7.63),
        ("carol", 0.0),
        ("bob", -30.0),
        ("alice", 30.0),
    ]);

    let first = serde_json::to_string(&settle(&input).unwrap()).unwrap();
    let second = serde_json::to_string(&settle(&input).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn full_pipeline_from_line_items() {
    // Dinner for three: alice fronts the bill, bob covers the taxi.
    let transfers = settle_contributions([
        Contribution::new("alice", 20.0, 60.0),
        Contribution::new("bob", 20.0, 0.0),
        Contribution::new("carol", 20.0, 0.0),
        Contribution::new("alice", 5.0, 0.0),
        Contribution::new("bob", 5.0, 15.0),
        Contribution::new("carol", 5.0, 0.0),
    ])
    .unwrap();

    assert_eq!(
        as_triples(&transfers),
        vec![("carol", "alice", 25.0), ("bob", "alice", 10.0)]
    );
}

proptest! {
    /// Any balanced ledger settles with conservation, minimality, strictly
    /// positive amounts and no self-transfers.
    #[test]
    fn settles_any_balanced_ledger(cents in prop::collection::vec(-1_000_000i64..1_000_000, 1..12)) {
        let mut input = Positions::new();
        let mut total = 0i64;
        for (index, value) in cents.iter().enumerate() {
            input.insert(format!("p{index:02}"), Amount::new(*value as f64 / 100.0).unwrap());
            total += value;
        }
        input.insert("balancer".to_string(), Amount::new(-total as f64 / 100.0).unwrap());

        let transfers = settle(&input).unwrap();

        for transfer in &transfers {
            prop_assert!(transfer.amount.value() > 0.0);
            prop_assert_ne!(&transfer.payer, &transfer.payee);
        }

        let unsettled = input.values().filter(|p| !p.is_settled()).count();
        prop_assert!(transfers.len() <= unsettled.saturating_sub(1));

        let moved = net_movements(&transfers);
        for (participant, position) in &input {
            let paid_out = moved.get(participant).copied().unwrap_or(0.0);
            prop_assert!((position.value() + paid_out).abs() <= EPSILON);
        }
    }

    /// Mirrored magnitudes (every credit duplicated by an equal debt) keep
    /// the two-cursor scan monotonic even though the sort is full of ties.
    #[test]
    fn settles_duplicated_magnitudes(cents in prop::collection::vec(1i64..1_000_000, 1..6)) {
        let mut input = Positions::new();
        for (index, value) in cents.iter().enumerate() {
            let amount = *value as f64 / 100.0;
            input.insert(format!("creditor{index}"), Amount::new(amount).unwrap());
            input.insert(format!("debtor{index}"), Amount::new(-amount).unwrap());
        }

        let transfers = settle(&input).unwrap();

        let unsettled = input.values().filter(|p| !p.is_settled()).count();
        prop_assert!(transfers.len() <= unsettled.saturating_sub(1));

        let moved = net_movements(&transfers);
        for (participant, position) in &input {
            let paid_out = moved.get(participant).copied().unwrap_or(0.0);
            prop_assert!((position.value() + paid_out).abs() <= EPSILON);
        }
    }

    /// Aggregation then settlement always balances: whatever was paid is
    /// exactly what was owed once every line item charges what it pays.
    #[test]
    fn aggregated_events_always_settle(
        costs in prop::collection::vec(1i64..100_000, 2..10),
        payer_seed in 0usize..10,
    ) {
        // One shared bill: each participant owes their own cost, a single
        // participant pays the whole total.
        let total: i64 = costs.iter().sum();
        let payer = payer_seed % costs.len();
        let contributions: Vec<Contribution> = costs
            .iter()
            .enumerate()
            .map(|(index, cost)| Contribution::new(
                format!("p{index:02}"),
                *cost as f64 / 100.0,
                if index == payer { total as f64 / 100.0 } else { 0.0 },
            ))
            .collect();

        let input = aggregate(contributions).unwrap();
        let transfers = settle(&input).unwrap();

        let expected_payee = format!("p{payer:02}");
        for transfer in &transfers {
            prop_assert_eq!(&transfer.payee, &expected_payee);
        }
        let moved = net_movements(&transfers);
        for (participant, position) in &input {
            let paid_out = moved.get(participant).copied().unwrap_or(0.0);
            prop_assert!((position.value() + paid_out).abs() <= EPSILON);
        }
    }
}
