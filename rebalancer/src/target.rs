//! Target weights file (weights.json) loading and validation.

use std::path::Path;

use cashfill::{AccountSnapshot, TargetWeights};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Target weights as written by hand or by an optimizer.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetSpec {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    pub targets: Vec<TargetPosition>,
}

/// A single target: symbol + weight.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetPosition {
    pub symbol: String,
    pub weight: f64,
}

impl TargetSpec {
    /// Load and validate a weights file. `tolerance` bounds `|Σ weight - 1|`.
    pub fn load(path: &Path, tolerance: f64) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| Error::TargetRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&contents, tolerance)
    }

    /// Parse from a JSON string (useful for testing).
    pub fn from_json(json: &str, tolerance: f64) -> Result<Self> {
        let spec: TargetSpec = serde_json::from_str(json)?;
        spec.validate(tolerance)?;
        Ok(spec)
    }

    fn validate(&self, tolerance: f64) -> Result<()> {
        if self.targets.is_empty() {
            return Err(Error::Target("targets list is empty".into()));
        }

        let mut seen = FxHashSet::default();
        for t in &self.targets {
            if t.symbol.is_empty() {
                return Err(Error::Target("empty symbol".into()));
            }
            if !seen.insert(t.symbol.as_str()) {
                return Err(Error::Target(format!("duplicate symbol: {}", t.symbol)));
            }
            if !t.weight.is_finite() || t.weight <= 0.0 || t.weight > 1.0 {
                return Err(Error::Target(format!(
                    "weight for {} ({}) must be in (0.0, 1.0]",
                    t.symbol, t.weight
                )));
            }
        }

        let sum = self.total();
        if (sum - 1.0).abs() > tolerance {
            return Err(Error::Target(format!(
                "weights sum to {sum:.6}, expected 1.0 (tolerance {tolerance})"
            )));
        }

        Ok(())
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.targets.iter().map(|t| t.weight).sum()
    }

    /// Convert to the engine's weight map.
    pub fn as_weights(&self) -> TargetWeights {
        self.targets
            .iter()
            .map(|t| (t.symbol.as_str(), t.weight))
            .collect()
    }

    /// Every snapshot holding must have a weight and every weight a holding.
    pub fn check_against(&self, snapshot: &AccountSnapshot) -> Result<()> {
        let mut problems = Vec::new();
        for h in &snapshot.holdings {
            if !self.targets.iter().any(|t| t.symbol == h.ticker.as_str()) {
                problems.push(format!("{} is held but has no target weight", h.ticker));
            }
        }
        for t in &self.targets {
            if snapshot.holding(&t.symbol).is_none() {
                problems.push(format!("{} has a target weight but is not held", t.symbol));
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(Error::Target(problems.join("; ")))
        }
    }
}
