//! Remaining-cash allocator: spend as much of a budget as possible on whole units.
//!
//! This is the unbounded knapsack where weight and value are both the unit
//! price: any ticker may be bought any number of times, and the goal is the
//! largest total cost that still fits in the budget.
//!
//! The solver fills a table indexed by residual budget `r` in `0..=budget`.
//! Each slot keeps the best amount spendable out of `r` and the ticker whose
//! unit was added last to reach it; the selection is rebuilt by walking that
//! chain back from the full budget. Work is `O(budget * tickers)` and memory
//! is two `u32` per slot, so the budget is capped by [`DEFAULT_MAX_BUDGET`]
//! (or a caller-supplied bound).
//!
//! # Tie-breaking
//!
//! When several tickers reach the same best total for a residual, the one
//! with the lowest price wins, then the lexicographically smallest ticker.
//! Results are therefore identical across runs and platforms.

use std::collections::BTreeMap;

use crate::error::{AllocationError, Result};
use crate::types::Ticker;

/// Default residual-budget bound: 10,000,000 minor units ($100,000.00 in cents).
///
/// At 8 bytes per slot the table stays under ~80 MB.
pub const DEFAULT_MAX_BUDGET: u64 = 10_000_000;

/// Sentinel for "no unit added at this residual".
const NO_CHOICE: u32 = u32::MAX;

/// Solver for the leftover-cash fill, carrying the table-size bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RemainingCashAllocator {
    max_budget: u64,
}

impl Default for RemainingCashAllocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUDGET)
    }
}

impl RemainingCashAllocator {
    /// Create an allocator that rejects budgets above `max_budget`.
    ///
    /// The bound is clamped to `u32::MAX` so spent totals fit in a table slot.
    pub fn new(max_budget: u64) -> Self {
        Self {
            max_budget: max_budget.min(u32::MAX as u64),
        }
    }

    pub fn max_budget(&self) -> u64 {
        self.max_budget
    }

    /// Choose additional whole units maximizing `Σ units[t] * prices[t]`
    /// subject to staying within `budget`.
    ///
    /// Returns only tickers with a non-zero count. All amounts are in minor
    /// currency units.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidInput`] if any price is zero
    /// - [`AllocationError::BudgetTooLarge`] if `budget` exceeds the bound
    pub fn maximize_spend(
        &self,
        budget: u64,
        prices: &BTreeMap<Ticker, u64>,
    ) -> Result<BTreeMap<Ticker, u64>> {
        if let Some((ticker, _)) = prices.iter().find(|(_, p)| **p == 0) {
            return Err(AllocationError::InvalidInput(format!(
                "price for {ticker} must be positive"
            )));
        }
        if budget > self.max_budget {
            return Err(AllocationError::BudgetTooLarge {
                budget,
                max: self.max_budget,
            });
        }

        let mut selection = BTreeMap::new();
        if budget == 0 {
            return Ok(selection);
        }

        // Cheapest first, ticker order within a price: scanning in this order
        // and only replacing on a strictly better total implements the tie-break.
        let mut items: Vec<(&Ticker, u32)> = prices
            .iter()
            .filter(|(_, p)| **p <= budget)
            .map(|(t, p)| (t, *p as u32))
            .collect();
        if items.is_empty() {
            return Ok(selection);
        }
        items.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));

        let n = budget as usize;
        let mut spent = vec![0u32; n + 1];
        let mut choice = vec![NO_CHOICE; n + 1];

        for r in 1..=n {
            let mut best = 0u32;
            let mut pick = NO_CHOICE;
            for (i, &(_, price)) in items.iter().enumerate() {
                let p = price as usize;
                if p > r {
                    break;
                }
                let total = price + spent[r - p];
                if total > best {
                    best = total;
                    pick = i as u32;
                }
            }
            spent[r] = best;
            choice[r] = pick;
        }

        let mut r = n;
        while choice[r] != NO_CHOICE {
            let (ticker, price) = items[choice[r] as usize];
            *selection.entry(ticker.clone()).or_insert(0) += 1;
            r -= price as usize;
        }

        Ok(selection)
    }
}

/// [`RemainingCashAllocator::maximize_spend`] with [`DEFAULT_MAX_BUDGET`].
pub fn maximize_spend(
    budget: u64,
    prices: &BTreeMap<Ticker, u64>,
) -> Result<BTreeMap<Ticker, u64>> {
    RemainingCashAllocator::default().maximize_spend(budget, prices)
}

/// Total cost of a selection at the given prices.
pub fn selection_cost(selection: &BTreeMap<Ticker, u64>, prices: &BTreeMap<Ticker, u64>) -> u64 {
    selection
        .iter()
        .map(|(t, units)| units * prices.get(t).copied().unwrap_or(0))
        .sum()
}
