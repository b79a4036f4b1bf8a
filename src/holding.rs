//! Input value objects: holdings, account snapshots, target weights.

use std::collections::BTreeMap;

use crate::types::{Price, Ticker};

/// One position at a point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Holding {
    pub ticker: Ticker,
    /// Current price of one unit (minor units)
    pub unit_price: Price,
    /// Units currently held
    pub held_units: u64,
}

impl Holding {
    pub fn new(ticker: impl Into<Ticker>, unit_price: Price, held_units: u64) -> Self {
        Self {
            ticker: ticker.into(),
            unit_price,
            held_units,
        }
    }

    /// Current market value (`held_units * unit_price`), or `None` if it
    /// overflows.
    pub fn market_value(&self) -> Option<Price> {
        self.unit_price.checked_times(self.held_units)
    }
}

/// Account state as returned by a data provider.
///
/// `cash` is what can be spent; `total_equity` (cash plus market value of all
/// positions) sizes the target unit counts.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccountSnapshot {
    pub cash: Price,
    pub total_equity: Price,
    pub holdings: Vec<Holding>,
}

impl AccountSnapshot {
    /// Look up a holding by ticker.
    pub fn holding(&self, ticker: &str) -> Option<&Holding> {
        self.holdings.iter().find(|h| h.ticker.as_str() == ticker)
    }

    /// Tickers of all holdings, sorted.
    pub fn tickers(&self) -> Vec<Ticker> {
        let mut tickers: Vec<Ticker> = self.holdings.iter().map(|h| h.ticker.clone()).collect();
        tickers.sort();
        tickers
    }

    /// Same account with `amount` added to both cash and equity.
    pub fn with_deposit(mut self, amount: Price) -> Self {
        self.cash = self.cash + amount;
        self.total_equity = self.total_equity + amount;
        self
    }
}

/// Target weight per ticker, as fractions in (0, 1].
///
/// Expected, but not required, to sum to 1.0.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct TargetWeights(BTreeMap<Ticker, f64>);

impl TargetWeights {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the weight for `ticker`, returning the previous weight if any.
    pub fn insert(&mut self, ticker: impl Into<Ticker>, weight: f64) -> Option<f64> {
        self.0.insert(ticker.into(), weight)
    }

    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.0.get(ticker).copied()
    }

    pub fn contains(&self, ticker: &str) -> bool {
        self.0.contains_key(ticker)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(ticker, weight)` in ticker order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, f64)> {
        self.0.iter().map(|(t, w)| (t, *w))
    }

    pub fn tickers(&self) -> impl Iterator<Item = &Ticker> {
        self.0.keys()
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

impl<T: Into<Ticker>> FromIterator<(T, f64)> for TargetWeights {
    fn from_iter<I: IntoIterator<Item = (T, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(t, w)| (t.into(), w)).collect())
    }
}
