//! Allocation engine: proportional buying toward target weights, then an
//! optimal fill of whatever cash the truncation left behind.
//!
//! # Algorithm
//!
//! 1. Truncated target units: `tua[t] = floor(w[t] * equity / price[t])`.
//! 2. Holdings with `held >= tua` are over-represented and get no
//!    proportional purchase. Nothing is ever sold.
//! 3. Weights of the remaining (eligible) holdings are renormalized to sum
//!    to one, and each buys `floor(w'[t] * cash / price[t])` units.
//! 4. The leftover is handed to [`RemainingCashAllocator`] over *all*
//!    holdings, over-represented included.
//!
//! If every holding is over-represented the whole cash budget goes to step 4.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::error::{AllocationError, Result};
use crate::holding::{AccountSnapshot, Holding, TargetWeights};
use crate::knapsack::{DEFAULT_MAX_BUDGET, RemainingCashAllocator};
use crate::types::{Price, Ticker};

/// How one ticker's additional units came about.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickerAllocation {
    /// Truncated target unit allocation
    pub target_units: u64,
    /// `held_units >= target_units`; excluded from proportional buying
    pub over_represented: bool,
    /// Units bought in the proportional phase
    pub proportional_units: u64,
    /// Units bought by the leftover-cash fill
    pub fill_units: u64,
}

impl TickerAllocation {
    /// Units to buy in total.
    pub fn total(&self) -> u64 {
        self.proportional_units + self.fill_units
    }
}

/// Outcome of one allocation run.
///
/// `Σ additional_units[t] * price[t] + remaining_cash` always equals the cash
/// budget exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AllocationResult {
    /// Units to buy per ticker (every holding present, possibly 0)
    pub additional_units: BTreeMap<Ticker, u64>,
    /// Cash left unspent
    pub remaining_cash: Price,
    /// Per-ticker phase breakdown
    pub breakdown: BTreeMap<Ticker, TickerAllocation>,
}

impl AllocationResult {
    /// Units to buy for `ticker` (0 if unknown).
    pub fn units(&self, ticker: &str) -> u64 {
        self.additional_units.get(ticker).copied().unwrap_or(0)
    }

    /// Tickers that were at or above their truncated target.
    pub fn over_represented(&self) -> Vec<&Ticker> {
        self.breakdown
            .iter()
            .filter(|(_, a)| a.over_represented)
            .map(|(t, _)| t)
            .collect()
    }

    /// Total cost of the additional units at the given holdings' prices.
    pub fn spent(&self, holdings: &[Holding]) -> Price {
        holdings
            .iter()
            .map(|h| h.unit_price.times(self.units(h.ticker.as_str())))
            .sum()
    }
}

/// Stateless allocation engine. Only carries the leftover-fill budget bound,
/// so one instance can be shared across threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocationEngine {
    filler: RemainingCashAllocator,
}

impl AllocationEngine {
    /// Engine with [`DEFAULT_MAX_BUDGET`] as the fill bound.
    pub fn new() -> Self {
        Self::with_max_budget(DEFAULT_MAX_BUDGET)
    }

    /// Engine whose leftover-cash fill rejects budgets above `max_budget`
    /// minor units.
    pub fn with_max_budget(max_budget: u64) -> Self {
        Self {
            filler: RemainingCashAllocator::new(max_budget),
        }
    }

    pub fn max_budget(&self) -> u64 {
        self.filler.max_budget()
    }

    /// Allocate `cash` across `holdings` toward `weights`.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidInput`] for non-positive equity or prices,
    ///   negative cash, weights outside (0, 1], duplicate holdings, or when
    ///   holdings and weights do not name the same tickers
    /// - [`AllocationError::BudgetTooLarge`] if the leftover exceeds the fill bound
    pub fn allocate(
        &self,
        cash: Price,
        equity: Price,
        holdings: &[Holding],
        weights: &TargetWeights,
    ) -> Result<AllocationResult> {
        validate(cash, equity, holdings, weights)?;

        // Work in ticker order so float sums (and the result) don't depend
        // on how the caller ordered the holdings.
        let mut holdings: Vec<&Holding> = holdings.iter().collect();
        holdings.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        // One entry per holding, same order as `holdings`
        let mut plan: Vec<TickerAllocation> = Vec::with_capacity(holdings.len());
        let mut eligible_weight = 0.0_f64;

        // 1-2. Truncated targets and over-representation
        for h in &holdings {
            let w = weight_of(weights, h)?;
            let target_units = units_for(w, equity, h.unit_price);
            let over_represented = h.held_units >= target_units;
            if !over_represented {
                eligible_weight += w;
            }
            plan.push(TickerAllocation {
                target_units,
                over_represented,
                ..TickerAllocation::default()
            });
        }

        // 3. Proportional buying among eligible holdings
        if eligible_weight > 0.0 {
            for (h, alloc) in holdings.iter().zip(plan.iter_mut()) {
                if alloc.over_represented {
                    continue;
                }
                let share = weight_of(weights, h)? / eligible_weight;
                alloc.proportional_units = units_for(share, cash, h.unit_price);
            }
        }

        let mut proportional_cost: Price = holdings
            .iter()
            .zip(&plan)
            .map(|(h, a)| h.unit_price.times(a.proportional_units))
            .sum();

        // Allowances are rounded to the cent, so together they can exceed
        // cash by up to half a cent per holding; give back units from the
        // priciest holding until the budget is respected.
        while proportional_cost > cash {
            let Some(i) = (0..holdings.len())
                .filter(|&i| plan[i].proportional_units > 0)
                .max_by(|&a, &b| {
                    holdings[a]
                        .unit_price
                        .cmp(&holdings[b].unit_price)
                        .then_with(|| holdings[b].ticker.cmp(&holdings[a].ticker))
                })
            else {
                break;
            };
            plan[i].proportional_units -= 1;
            proportional_cost = proportional_cost - holdings[i].unit_price;
        }

        // 4. Leftover fill across every holding
        let leftover = cash - proportional_cost;
        let prices: BTreeMap<Ticker, u64> = holdings
            .iter()
            .map(|h| (h.ticker.clone(), h.unit_price.0 as u64))
            .collect();
        let fill = self.filler.maximize_spend(leftover.0 as u64, &prices)?;

        let mut fill_cost = Price::ZERO;
        for (h, alloc) in holdings.iter().zip(plan.iter_mut()) {
            alloc.fill_units = fill.get(&h.ticker).copied().unwrap_or(0);
            fill_cost = fill_cost + h.unit_price.times(alloc.fill_units);
        }

        let additional_units = holdings
            .iter()
            .zip(&plan)
            .map(|(h, a)| (h.ticker.clone(), a.total()))
            .collect();
        let breakdown = holdings
            .iter()
            .map(|h| h.ticker.clone())
            .zip(plan)
            .collect();

        Ok(AllocationResult {
            additional_units,
            remaining_cash: leftover - fill_cost,
            breakdown,
        })
    }

    /// Allocate a snapshot's cash, sizing targets by its total equity.
    pub fn allocate_snapshot(
        &self,
        snapshot: &AccountSnapshot,
        weights: &TargetWeights,
    ) -> Result<AllocationResult> {
        self.allocate(
            snapshot.cash,
            snapshot.total_equity,
            &snapshot.holdings,
            weights,
        )
    }
}

/// [`AllocationEngine::allocate`] with the default fill bound.
pub fn allocate(
    cash: Price,
    equity: Price,
    holdings: &[Holding],
    weights: &TargetWeights,
) -> Result<AllocationResult> {
    AllocationEngine::new().allocate(cash, equity, holdings, weights)
}

fn weight_of(weights: &TargetWeights, h: &Holding) -> Result<f64> {
    weights.get(h.ticker.as_str()).ok_or_else(|| {
        AllocationError::InvalidInput(format!("no target weight for {}", h.ticker))
    })
}

/// Whole units of `price` bought with `fraction` of `amount`.
///
/// The fractional amount is rounded to the nearest minor unit before the
/// integer division, so `0.69 * $100.00` is 6900 cents and not 6899.
fn units_for(fraction: f64, amount: Price, price: Price) -> u64 {
    let cents = (fraction * amount.0 as f64).round();
    if cents.is_finite() && cents > 0.0 {
        cents as u64 / price.0 as u64
    } else {
        0
    }
}

fn validate(
    cash: Price,
    equity: Price,
    holdings: &[Holding],
    weights: &TargetWeights,
) -> Result<()> {
    if !equity.is_positive() {
        return Err(AllocationError::InvalidInput(format!(
            "equity must be positive, got {equity}"
        )));
    }
    if cash.0 < 0 {
        return Err(AllocationError::InvalidInput(format!(
            "cash must not be negative, got {cash}"
        )));
    }

    let mut seen: FxHashMap<&str, &Holding> = FxHashMap::default();
    for h in holdings {
        if !h.unit_price.is_positive() {
            return Err(AllocationError::InvalidInput(format!(
                "price for {} must be positive, got {}",
                h.ticker, h.unit_price
            )));
        }
        if seen.insert(h.ticker.as_str(), h).is_some() {
            return Err(AllocationError::InvalidInput(format!(
                "duplicate holding {}",
                h.ticker
            )));
        }
        if !weights.contains(h.ticker.as_str()) {
            return Err(AllocationError::InvalidInput(format!(
                "no target weight for {}",
                h.ticker
            )));
        }
    }

    for (ticker, w) in weights.iter() {
        if !seen.contains_key(ticker.as_str()) {
            return Err(AllocationError::InvalidInput(format!(
                "target weight for {ticker} has no matching holding"
            )));
        }
        if !w.is_finite() || w <= 0.0 || w > 1.0 {
            return Err(AllocationError::InvalidInput(format!(
                "weight for {ticker} must be in (0, 1], got {w}"
            )));
        }
    }

    Ok(())
}
