// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Edge-case and worked-scenario tests for the public allocation API.

use std::collections::BTreeMap;

use cashfill::{
    AccountSnapshot, AllocationEngine, AllocationError, Holding, Price, RemainingCashAllocator,
    TargetWeights, Ticker, WeightReport, allocate, maximize_spend, selection_cost,
};

fn prices(pairs: &[(&str, u64)]) -> BTreeMap<Ticker, u64> {
    pairs.iter().map(|&(t, p)| (Ticker::new(t), p)).collect()
}

fn weights(pairs: &[(&str, f64)]) -> TargetWeights {
    pairs.iter().copied().collect()
}

/// The four-fund account the tool was first written for.
fn etf_account() -> (AccountSnapshot, TargetWeights) {
    let snapshot = AccountSnapshot {
        cash: Price(3_512_40),
        total_equity: Price(10_000_00),
        holdings: vec![
            Holding::new("VIU.TO", Price(30_12), 40),
            Holding::new("XUU.TO", Price(45_87), 40),
            Holding::new("VCN.TO", Price(41_05), 50),
            Holding::new("VEE.TO", Price(36_90), 6),
        ],
    };
    let w = weights(&[
        ("VIU.TO", 0.225),
        ("XUU.TO", 0.3978),
        ("VCN.TO", 0.30),
        ("VEE.TO", 0.0772),
    ]);
    (snapshot, w)
}

// ============================================================================
// Worked scenarios
// ============================================================================

#[test]
fn fill_scenario_two_tickers() {
    let p = prices(&[("X", 1000), ("Y", 1500)]);
    let units = maximize_spend(3700, &p).unwrap();

    assert_eq!(units.get("X"), Some(&2));
    assert_eq!(units.get("Y"), Some(&1));
    assert_eq!(selection_cost(&units, &p), 3500);
    assert_eq!(3700 - selection_cost(&units, &p), 200);
}

#[test]
fn engine_scenario_one_over_represented() {
    let holdings = vec![
        Holding::new("A", Price(10_00), 5),
        Holding::new("B", Price(20_00), 0),
    ];
    let w = weights(&[("A", 0.5), ("B", 0.5)]);

    let result = allocate(Price(15_00), Price(100_00), &holdings, &w).unwrap();

    assert_eq!(result.breakdown["A"].target_units, 5);
    assert_eq!(result.breakdown["B"].target_units, 2);
    assert!(result.breakdown["A"].over_represented);
    assert!(!result.breakdown["B"].over_represented);
    assert_eq!(result.breakdown["B"].proportional_units, 0);

    let expected: BTreeMap<Ticker, u64> = [(Ticker::new("A"), 1), (Ticker::new("B"), 0)]
        .into_iter()
        .collect();
    assert_eq!(result.additional_units, expected);
    assert_eq!(result.remaining_cash, Price(5_00));
}

#[test]
fn engine_scenario_all_over_represented() {
    let holdings = vec![
        Holding::new("A", Price(10_00), 100),
        Holding::new("B", Price(15_00), 100),
    ];
    let w = weights(&[("A", 0.6), ("B", 0.4)]);

    let result = allocate(Price(37_00), Price(1_000_00), &holdings, &w).unwrap();

    assert!(result.breakdown.values().all(|a| a.over_represented));
    assert!(result.breakdown.values().all(|a| a.proportional_units == 0));
    // Whole $37 went through the fill: 2 x $10 + 1 x $15
    assert_eq!(result.units("A"), 2);
    assert_eq!(result.units("B"), 1);
    assert_eq!(result.remaining_cash, Price(2_00));
}

#[test]
fn four_fund_account_conserves_cash() {
    let (snapshot, w) = etf_account();
    let result = AllocationEngine::new()
        .allocate_snapshot(&snapshot, &w)
        .unwrap();

    let spent = result.spent(&snapshot.holdings);
    assert_eq!(spent + result.remaining_cash, snapshot.cash);

    let cheapest = snapshot.holdings.iter().map(|h| h.unit_price).min().unwrap();
    assert!(result.remaining_cash < cheapest);

    let report =
        WeightReport::new(snapshot.total_equity, &snapshot.holdings, &w, &result).unwrap();
    assert_eq!(report.entries.len(), 4);
    assert_eq!(report.remaining_cash, result.remaining_cash);
}

// ============================================================================
// Fill edge cases
// ============================================================================

#[test]
fn fill_zero_budget_any_prices() {
    assert!(maximize_spend(0, &prices(&[("A", 1)])).unwrap().is_empty());
    assert!(maximize_spend(0, &BTreeMap::new()).unwrap().is_empty());
}

#[test]
fn fill_every_price_above_budget() {
    let units = maximize_spend(499, &prices(&[("A", 500), ("B", 900)])).unwrap();
    assert!(units.is_empty());
}

#[test]
fn fill_identical_prices_same_total() {
    let p = prices(&[("B", 250), ("A", 250), ("C", 250)]);
    let units = maximize_spend(1_000, &p).unwrap();
    assert_eq!(selection_cost(&units, &p), 1_000);
    assert_eq!(units.get("A"), Some(&4));
}

#[test]
fn fill_price_equal_to_budget() {
    let units = maximize_spend(500, &prices(&[("A", 500)])).unwrap();
    assert_eq!(units.get("A"), Some(&1));
}

#[test]
fn fill_bound_is_checked_before_work() {
    let alloc = RemainingCashAllocator::new(10);
    let err = alloc.maximize_spend(11, &prices(&[("A", 100)])).unwrap_err();
    assert_eq!(err, AllocationError::BudgetTooLarge { budget: 11, max: 10 });
}

#[test]
fn fill_at_default_bound_scale() {
    // Ten units always fit (10 x 99,991 = 999,910) and eleven never do.
    // Swapping an A for a B costs 12 more, so at most 7 B: 3 x A + 7 x B = 999,994.
    let p = prices(&[("A", 99_991), ("B", 100_003)]);
    let units = maximize_spend(1_000_000, &p).unwrap();
    assert_eq!(units.get("A"), Some(&3));
    assert_eq!(units.get("B"), Some(&7));
    assert_eq!(selection_cost(&units, &p), 999_994);
}

// ============================================================================
// Engine input validation
// ============================================================================

#[test]
fn engine_negative_cash() {
    let holdings = vec![Holding::new("A", Price(1_00), 0)];
    let err = allocate(Price(-1), Price(1_00), &holdings, &weights(&[("A", 1.0)])).unwrap_err();
    assert!(matches!(err, AllocationError::InvalidInput(_)));
}

#[test]
fn engine_negative_equity() {
    let holdings = vec![Holding::new("A", Price(1_00), 0)];
    let err = allocate(Price(1_00), Price(-1_00), &holdings, &weights(&[("A", 1.0)])).unwrap_err();
    assert!(matches!(err, AllocationError::InvalidInput(_)));
}

#[test]
fn engine_negative_price() {
    let holdings = vec![Holding::new("A", Price(-5_00), 0)];
    let err = allocate(Price(1_00), Price(1_00), &holdings, &weights(&[("A", 1.0)])).unwrap_err();
    assert!(matches!(err, AllocationError::InvalidInput(_)));
}

#[test]
fn engine_ticker_mismatch_both_directions() {
    let holdings = vec![
        Holding::new("A", Price(1_00), 0),
        Holding::new("B", Price(1_00), 0),
    ];
    let missing = allocate(Price(1_00), Price(1_00), &holdings, &weights(&[("A", 1.0)]));
    assert!(matches!(missing, Err(AllocationError::InvalidInput(_))));

    let extra = allocate(
        Price(1_00),
        Price(1_00),
        &holdings[..1],
        &weights(&[("A", 0.5), ("B", 0.5)]),
    );
    assert!(matches!(extra, Err(AllocationError::InvalidInput(_))));
}

#[test]
fn engine_weights_not_summing_to_one_still_run() {
    // 0.4 + 0.4: not normalized, but eligible weights are renormalized anyway.
    let holdings = vec![
        Holding::new("A", Price(1_00), 0),
        Holding::new("B", Price(1_00), 0),
    ];
    let result = allocate(
        Price(10_00),
        Price(10_00),
        &holdings,
        &weights(&[("A", 0.4), ("B", 0.4)]),
    )
    .unwrap();
    assert_eq!(result.breakdown["A"].proportional_units, 5);
    assert_eq!(result.breakdown["B"].proportional_units, 5);
    assert_eq!(result.remaining_cash, Price::ZERO);
}

#[test]
fn engine_leftover_over_bound() {
    let holdings = vec![Holding::new("A", Price(3_00), 1_000)];
    let engine = AllocationEngine::with_max_budget(500);
    let err = engine
        .allocate(Price(6_00), Price(100_00), &holdings, &weights(&[("A", 1.0)]))
        .unwrap_err();
    assert_eq!(err, AllocationError::BudgetTooLarge { budget: 600, max: 500 });
}

#[test]
fn engine_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AllocationEngine>();
    assert_send_sync::<RemainingCashAllocator>();
}

#[test]
fn engine_runs_concurrently() {
    let (snapshot, w) = etf_account();
    let engine = AllocationEngine::new();
    let expected = engine.allocate_snapshot(&snapshot, &w).unwrap();

    std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| engine.allocate_snapshot(&snapshot, &w).unwrap()))
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), expected);
        }
    });
}
