//! Post-allocation weights vs target weights.

use std::collections::BTreeMap;
use std::fmt;

use crate::engine::AllocationResult;
use crate::error::{AllocationError, Result};
use crate::holding::{Holding, TargetWeights};
use crate::types::{Price, Ticker};

/// One ticker's line in a [`WeightReport`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightEntry {
    pub held_units: u64,
    pub additional_units: u64,
    /// Share of equity after buying, in percent
    pub actual_weight_pct: f64,
    /// Target share of equity, in percent
    pub target_weight_pct: f64,
}

impl WeightEntry {
    /// `actual - target`, in percentage points.
    pub fn drift_pct(&self) -> f64 {
        self.actual_weight_pct - self.target_weight_pct
    }
}

/// Actual vs target weight per ticker, sorted by ticker.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightReport {
    pub entries: BTreeMap<Ticker, WeightEntry>,
    pub remaining_cash: Price,
}

impl WeightReport {
    /// Derive the report for `result` applied to `holdings`.
    ///
    /// Tickers absent from `weights` get a 0% target.
    pub fn new(
        equity: Price,
        holdings: &[Holding],
        weights: &TargetWeights,
        result: &AllocationResult,
    ) -> Result<Self> {
        if !equity.is_positive() {
            return Err(AllocationError::InvalidInput(format!(
                "equity must be positive, got {equity}"
            )));
        }

        let entries = holdings
            .iter()
            .map(|h| {
                let additional_units = result.units(h.ticker.as_str());
                let value = h
                    .held_units
                    .checked_add(additional_units)
                    .and_then(|units| h.unit_price.checked_times(units))
                    .ok_or_else(|| {
                        AllocationError::InvalidInput(format!(
                            "value of {} units of {} overflows",
                            h.held_units, h.ticker
                        ))
                    })?;
                let entry = WeightEntry {
                    held_units: h.held_units,
                    additional_units,
                    actual_weight_pct: value.0 as f64 / equity.0 as f64 * 100.0,
                    target_weight_pct: weights.get(h.ticker.as_str()).unwrap_or(0.0) * 100.0,
                };
                Ok((h.ticker.clone(), entry))
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            entries,
            remaining_cash: result.remaining_cash,
        })
    }

    pub fn get(&self, ticker: &str) -> Option<&WeightEntry> {
        self.entries.get(ticker)
    }

    /// Root-mean-square drift across tickers, in percentage points.
    pub fn tracking_error_pct(&self) -> f64 {
        if self.entries.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = self.entries.values().map(|e| e.drift_pct().powi(2)).sum();
        (sum_sq / self.entries.len() as f64).sqrt()
    }
}

impl fmt::Display for WeightReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "NEW ORDERS:")?;
        writeln!(
            f,
            "  {:10} {:>9} {:>10} {:>10}",
            "Ticker", "New units", "Weight", "Target"
        )?;
        for (ticker, e) in &self.entries {
            writeln!(
                f,
                "  {:10} {:>9} {:>9.2}% {:>9.2}%",
                ticker, e.additional_units, e.actual_weight_pct, e.target_weight_pct,
            )?;
        }
        writeln!(f, "\nRemaining cash: {}", self.remaining_cash)
    }
}
