// Allow our dollar.cents digit grouping convention (e.g., 100_00 = $100.00)
#![allow(clippy::inconsistent_digit_grouping)]

//! # cashfill
//!
//! Deterministic allocation of a cash budget across a fixed set of holdings,
//! steering toward target weights while leaving as little cash idle as possible.
//!
//! ## How it works
//!
//! - **Truncated targets**: each holding's target unit count is
//!   `floor(weight * equity / price)`
//! - **No selling**: holdings already at or above target are over-represented
//!   and skipped by proportional buying
//! - **Renormalized buying**: the remaining holdings split the cash in
//!   proportion to their weights
//! - **Optimal fill**: leftover cash is spent on whole units of any holding
//!   via an exact unbounded-knapsack solver with deterministic tie-breaks
//! - **Fixed-point money**: all amounts are integer minor units (cents)
//!
//! ## Quick Start
//!
//! ```
//! use cashfill::{allocate, Holding, Price, TargetWeights};
//!
//! let holdings = vec![
//!     Holding::new("A", Price(10_00), 5),  // already at target
//!     Holding::new("B", Price(20_00), 0),
//! ];
//! let weights: TargetWeights = [("A", 0.5), ("B", 0.5)].into_iter().collect();
//!
//! let result = allocate(Price(15_00), Price(100_00), &holdings, &weights).unwrap();
//!
//! assert_eq!(result.units("A"), 1);   // filled from leftover cash
//! assert_eq!(result.units("B"), 0);   // $15 share can't buy a $20 unit
//! assert_eq!(result.remaining_cash, Price(5_00));
//! ```
//!
//! ## Leftover Fill
//!
//! The solver can be used on its own with prices in minor units:
//!
//! ```
//! use std::collections::BTreeMap;
//! use cashfill::{maximize_spend, Ticker};
//!
//! let prices: BTreeMap<Ticker, u64> =
//!     [(Ticker::new("X"), 1000), (Ticker::new("Y"), 1500)].into_iter().collect();
//!
//! let units = maximize_spend(3700, &prices).unwrap();
//! assert_eq!(units[&Ticker::new("X")], 2);
//! assert_eq!(units[&Ticker::new("Y")], 1);   // 3500 spent; greedy on Y alone spends 3000
//! ```
//!
//! ## Weight Report
//!
//! ```
//! use cashfill::{allocate, Holding, Price, TargetWeights, WeightReport};
//!
//! let holdings = vec![Holding::new("A", Price(10_00), 5), Holding::new("B", Price(20_00), 0)];
//! let weights: TargetWeights = [("A", 0.5), ("B", 0.5)].into_iter().collect();
//! let result = allocate(Price(15_00), Price(100_00), &holdings, &weights).unwrap();
//!
//! let report = WeightReport::new(Price(100_00), &holdings, &weights, &result).unwrap();
//! let a = report.get("A").unwrap();
//! assert!((a.actual_weight_pct - 60.0).abs() < 1e-9);
//! assert!((a.target_weight_pct - 50.0).abs() < 1e-9);
//! ```
//!
//! ## Budget Bound
//!
//! The fill table grows linearly with the leftover budget, so budgets above
//! [`DEFAULT_MAX_BUDGET`] minor units are rejected with
//! [`AllocationError::BudgetTooLarge`]. Use
//! [`AllocationEngine::with_max_budget`] to pick another bound.

mod engine;
mod error;
mod holding;
mod knapsack;
mod report;
#[cfg(feature = "parallel")]
pub mod sweep;
mod types;

// Re-export public API
pub use engine::{AllocationEngine, AllocationResult, TickerAllocation, allocate};
pub use error::{AllocationError, Result};
pub use holding::{AccountSnapshot, Holding, TargetWeights};
pub use knapsack::{DEFAULT_MAX_BUDGET, RemainingCashAllocator, maximize_spend, selection_cost};
pub use report::{WeightEntry, WeightReport};
pub use types::{Price, Ticker};
