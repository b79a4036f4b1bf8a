//! On-disk snapshot format and its conversion into core types.
//!
//! Amounts are decimal major units (dollars) as a brokerage reports them;
//! they are converted to cents once, here.

use std::collections::HashSet;

use cashfill::{AccountSnapshot, Holding, Price};
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Account snapshot as stored in JSON.
///
/// ```json
/// {
///   "cash": 35.00,
///   "total_equity": 10035.00,
///   "positions": [
///     { "symbol": "VCN.TO", "quantity": 50, "price": 41.05 }
///   ]
/// }
/// ```
///
/// `total_equity` may be omitted, in which case it is cash plus the market
/// value of all positions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub cash: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_equity: Option<f64>,
    pub positions: Vec<PositionRecord>,
}

/// One position line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionRecord {
    pub symbol: String,
    pub quantity: i64,
    /// Current price per unit
    pub price: f64,
}

impl SnapshotRecord {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate and convert to the core snapshot type.
    pub fn into_snapshot(self) -> Result<AccountSnapshot, ProviderError> {
        let cash = to_price("cash", self.cash)?;
        if cash.0 < 0 {
            return Err(ProviderError::Invalid(format!("cash is negative ({cash})")));
        }

        let mut seen = HashSet::new();
        let mut holdings = Vec::with_capacity(self.positions.len());
        for p in self.positions {
            if p.symbol.is_empty() {
                return Err(ProviderError::Invalid("empty symbol".into()));
            }
            if !seen.insert(p.symbol.clone()) {
                return Err(ProviderError::Invalid(format!(
                    "duplicate position: {}",
                    p.symbol
                )));
            }
            if p.quantity < 0 {
                return Err(ProviderError::Invalid(format!(
                    "short position in {} ({}) is not supported",
                    p.symbol, p.quantity
                )));
            }
            let price = to_price(&p.symbol, p.price)?;
            if !price.is_positive() {
                return Err(ProviderError::Invalid(format!(
                    "price for {} must be positive, got {}",
                    p.symbol, p.price
                )));
            }
            holdings.push(Holding::new(p.symbol, price, p.quantity as u64));
        }

        let total_equity = match self.total_equity {
            Some(equity) => to_price("total_equity", equity)?,
            None => holdings
                .iter()
                .try_fold(cash, |acc, h| h.market_value()?.checked_add(acc))
                .ok_or_else(|| {
                    ProviderError::Invalid("market value of positions overflows".into())
                })?,
        };

        Ok(AccountSnapshot {
            cash,
            total_equity,
            holdings,
        })
    }
}

impl TryFrom<&AccountSnapshot> for SnapshotRecord {
    type Error = ProviderError;

    fn try_from(snapshot: &AccountSnapshot) -> Result<Self, ProviderError> {
        let positions = snapshot
            .holdings
            .iter()
            .map(|h| {
                let quantity = i64::try_from(h.held_units).map_err(|_| {
                    ProviderError::Invalid(format!(
                        "quantity of {} ({}) does not fit the snapshot format",
                        h.ticker, h.held_units
                    ))
                })?;
                Ok(PositionRecord {
                    symbol: h.ticker.as_str().to_string(),
                    quantity,
                    price: h.unit_price.as_decimal(),
                })
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        Ok(Self {
            cash: snapshot.cash.as_decimal(),
            total_equity: Some(snapshot.total_equity.as_decimal()),
            positions,
        })
    }
}

fn to_price(field: &str, amount: f64) -> Result<Price, ProviderError> {
    Price::from_decimal(amount)
        .ok_or_else(|| ProviderError::Invalid(format!("{field}: {amount} is not a valid amount")))
}
