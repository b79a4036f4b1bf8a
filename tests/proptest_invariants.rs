// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! Property-based tests for allocation invariants.
//!
//! These tests use proptest to verify that key invariants hold
//! across randomly generated accounts and price sets.

use std::collections::BTreeMap;

use cashfill::{
    Holding, Price, TargetWeights, Ticker, allocate, maximize_spend, selection_cost,
};
use proptest::prelude::*;

const TICKERS: [&str; 5] = ["AAA", "BBB", "CCC", "DDD", "EEE"];

/// Generate (price_cents, held_units, raw_weight) per holding
fn holding_strategy() -> impl Strategy<Value = (i64, u64, f64)> {
    (1_00i64..=500_00i64, 0u64..=50u64, 0.05f64..=1.0f64)
}

/// Generate an account: holdings, normalized weights, cash
fn account_strategy() -> impl Strategy<Value = (Vec<Holding>, TargetWeights, Price)> {
    (
        prop::collection::vec(holding_strategy(), 1..=TICKERS.len()),
        0i64..=1_000_00i64,
    )
        .prop_map(|(rows, cash)| {
            let total: f64 = rows.iter().map(|r| r.2).sum();
            let holdings: Vec<Holding> = rows
                .iter()
                .zip(TICKERS)
                .map(|(&(price, held, _), t)| Holding::new(t, Price(price), held))
                .collect();
            let weights: TargetWeights = rows
                .iter()
                .zip(TICKERS)
                .map(|(&(_, _, w), t)| (t, (w / total).min(1.0)))
                .collect();
            (holdings, weights, Price(cash))
        })
}

/// Generate a small price map for brute-force comparison
fn prices_strategy() -> impl Strategy<Value = BTreeMap<Ticker, u64>> {
    prop::collection::vec(1u64..=60u64, 1..=4).prop_map(|ps| {
        ps.into_iter()
            .zip(TICKERS)
            .map(|(p, t)| (Ticker::new(t), p))
            .collect()
    })
}

fn equity_of(holdings: &[Holding], cash: Price) -> Price {
    let invested: Price = holdings.iter().map(|h| h.market_value().unwrap()).sum();
    let equity = invested + cash;
    if equity.is_positive() { equity } else { Price(1) }
}

/// Largest amount <= budget reachable with unlimited units (reachability table).
fn brute_force_best(budget: u64, prices: &BTreeMap<Ticker, u64>) -> u64 {
    let n = budget as usize;
    let mut reachable = vec![false; n + 1];
    reachable[0] = true;
    for r in 1..=n {
        reachable[r] = prices
            .values()
            .any(|&p| (p as usize) <= r && reachable[r - p as usize]);
    }
    (0..=n).rev().find(|&r| reachable[r]).unwrap_or(0) as u64
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // ========================================================================
    // ENGINE INVARIANTS
    // ========================================================================

    /// Spent + remaining == cash, exactly
    #[test]
    fn budget_conservation((holdings, weights, cash) in account_strategy()) {
        let equity = equity_of(&holdings, cash);
        let result = allocate(cash, equity, &holdings, &weights).unwrap();

        prop_assert!(result.remaining_cash.0 >= 0);
        prop_assert_eq!(result.spent(&holdings) + result.remaining_cash, cash,
            "cash not conserved: spent={} remaining={} cash={}",
            result.spent(&holdings), result.remaining_cash, cash);
    }

    /// Over-represented holdings get nothing from the proportional phase
    #[test]
    fn over_represented_not_bought_proportionally((holdings, weights, cash) in account_strategy()) {
        let equity = equity_of(&holdings, cash);
        let result = allocate(cash, equity, &holdings, &weights).unwrap();

        for h in &holdings {
            let a = result.breakdown[h.ticker.as_str()];
            prop_assert_eq!(a.over_represented, h.held_units >= a.target_units);
            if a.over_represented {
                prop_assert_eq!(a.proportional_units, 0);
            }
            prop_assert_eq!(result.units(h.ticker.as_str()), a.proportional_units + a.fill_units);
        }
    }

    /// No further whole unit of any holding is affordable afterwards
    #[test]
    fn leftover_below_cheapest_price((holdings, weights, cash) in account_strategy()) {
        let equity = equity_of(&holdings, cash);
        let result = allocate(cash, equity, &holdings, &weights).unwrap();

        let cheapest = holdings.iter().map(|h| h.unit_price).min().unwrap();
        prop_assert!(result.remaining_cash < cheapest);
    }

    /// Same inputs, same result
    #[test]
    fn deterministic((holdings, weights, cash) in account_strategy()) {
        let equity = equity_of(&holdings, cash);
        let first = allocate(cash, equity, &holdings, &weights).unwrap();
        let second = allocate(cash, equity, &holdings, &weights).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Input order of holdings does not change the result
    #[test]
    fn holding_order_irrelevant((holdings, weights, cash) in account_strategy()) {
        let equity = equity_of(&holdings, cash);
        let forward = allocate(cash, equity, &holdings, &weights).unwrap();
        let reversed: Vec<Holding> = holdings.iter().rev().cloned().collect();
        let backward = allocate(cash, equity, &reversed, &weights).unwrap();
        prop_assert_eq!(forward, backward);
    }

    // ========================================================================
    // FILL INVARIANTS
    // ========================================================================

    /// Fill spends exactly the brute-force maximum
    #[test]
    fn fill_is_optimal(budget in 0u64..=400u64, prices in prices_strategy()) {
        let units = maximize_spend(budget, &prices).unwrap();
        let spent = selection_cost(&units, &prices);

        prop_assert!(spent <= budget);
        prop_assert_eq!(spent, brute_force_best(budget, &prices));
    }

    /// Only positive counts for known tickers are returned
    #[test]
    fn fill_selection_is_clean(budget in 0u64..=400u64, prices in prices_strategy()) {
        let units = maximize_spend(budget, &prices).unwrap();
        for (t, n) in &units {
            prop_assert!(prices.contains_key(t));
            prop_assert!(*n > 0);
        }
    }

    /// Zero budget always yields an empty selection
    #[test]
    fn fill_zero_budget(prices in prices_strategy()) {
        prop_assert!(maximize_spend(0, &prices).unwrap().is_empty());
    }
}
