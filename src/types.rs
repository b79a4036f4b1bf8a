//! Core types: Price, Ticker

use std::borrow::Borrow;
use std::fmt;

/// Currency amount in minor units (e.g., cents).
///
/// `Price(10050)` represents $100.50 when the minor unit is $0.01.
/// Using fixed-point keeps budget arithmetic exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Price(pub i64);

impl Price {
    pub const ZERO: Price = Price(0);

    /// Convert a decimal amount (e.g., dollars) into minor units, rounding to
    /// the nearest cent. Returns `None` for non-finite or out-of-range input.
    pub fn from_decimal(amount: f64) -> Option<Price> {
        if !amount.is_finite() {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Price(cents as i64))
    }

    /// Amount as a decimal number of major units.
    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Cost of `units` whole units at this price, saturating at the `i64`
    /// range. Use [`Price::checked_times`] for counts that come from outside.
    pub fn times(self, units: u64) -> Price {
        Price(self.0.saturating_mul(i64::try_from(units).unwrap_or(i64::MAX)))
    }

    /// Cost of `units` whole units, or `None` if it does not fit in `i64`.
    pub fn checked_times(self, units: u64) -> Option<Price> {
        let units = i64::try_from(units).ok()?;
        self.0.checked_mul(units).map(Price)
    }

    pub fn checked_add(self, rhs: Price) -> Option<Price> {
        self.0.checked_add(rhs.0).map(Price)
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dollars = self.0 / 100;
        let cents = (self.0 % 100).abs();
        if self.0 < 0 {
            write!(f, "-${}.{:02}", dollars.abs(), cents)
        } else {
            write!(f, "${}.{:02}", dollars, cents)
        }
    }
}

impl std::ops::Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        Price(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        Price(iter.map(|p| p.0).sum())
    }
}

/// Instrument identifier (e.g., `"VCN.TO"`). Ordered lexicographically.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Ticker(String);

impl Ticker {
    pub fn new(s: impl Into<String>) -> Self {
        Ticker(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Pass through so width/alignment flags work in tables
        f.pad(&self.0)
    }
}

impl From<&str> for Ticker {
    fn from(s: &str) -> Self {
        Ticker::new(s)
    }
}

impl From<String> for Ticker {
    fn from(s: String) -> Self {
        Ticker(s)
    }
}

impl Borrow<str> for Ticker {
    fn borrow(&self) -> &str {
        &self.0
    }
}
