//! Mock provider for testing: implements `AccountProvider` with configurable behavior.
//!
//! ```ignore
//! use cashfill_broker::mock::MockProvider;
//! use cashfill::Price;
//!
//! let provider = MockProvider::builder()
//!     .with_holding("VCN.TO", 41_05, 50)
//!     .with_cash(35_00)
//!     .build();
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use cashfill::{AccountSnapshot, Holding, Price};

use crate::AccountProvider;
use crate::error::ProviderError;

/// Builder for `MockProvider`.
pub struct MockProviderBuilder {
    holdings: Vec<Holding>,
    cash_cents: i64,
    equity_cents: Option<i64>,
    failure: Option<String>,
}

impl MockProviderBuilder {
    pub fn with_holding(mut self, ticker: &str, price_cents: i64, units: u64) -> Self {
        self.holdings.push(Holding::new(ticker, Price(price_cents), units));
        self
    }

    pub fn with_cash(mut self, cash_cents: i64) -> Self {
        self.cash_cents = cash_cents;
        self
    }

    /// Override total equity (default: cash plus market value of holdings).
    pub fn with_equity(mut self, equity_cents: i64) -> Self {
        self.equity_cents = Some(equity_cents);
        self
    }

    /// Every call fails with `ProviderError::Unavailable(message)`.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// A derived equity that overflows makes every call fail with
    /// `ProviderError::Invalid`, like a file provider would.
    pub fn build(self) -> MockProvider {
        let cash = Price(self.cash_cents);
        let derived = self
            .holdings
            .iter()
            .try_fold(cash, |acc, h| h.market_value()?.checked_add(acc));
        let (total_equity, failure) = match (self.equity_cents, derived) {
            (Some(equity), _) => (Price(equity), self.failure.map(Failure::Unavailable)),
            (None, Some(equity)) => (equity, self.failure.map(Failure::Unavailable)),
            (None, None) => (
                Price::ZERO,
                Some(Failure::Invalid("market value of positions overflows".into())),
            ),
        };
        MockProvider {
            snapshot: AccountSnapshot {
                cash,
                total_equity,
                holdings: self.holdings,
            },
            failure,
            calls: AtomicUsize::new(0),
        }
    }
}

enum Failure {
    Unavailable(String),
    Invalid(String),
}

/// A provider that returns a fixed snapshot and counts how often it was asked.
pub struct MockProvider {
    snapshot: AccountSnapshot,
    failure: Option<Failure>,
    calls: AtomicUsize,
}

impl MockProvider {
    pub fn builder() -> MockProviderBuilder {
        MockProviderBuilder {
            holdings: Vec::new(),
            cash_cents: 0,
            equity_cents: None,
            failure: None,
        }
    }

    /// Number of `account_snapshot` calls so far (for assertion in tests).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl AccountProvider for MockProvider {
    fn account_snapshot(&self) -> Result<AccountSnapshot, ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match &self.failure {
            Some(Failure::Unavailable(message)) => Err(ProviderError::Unavailable(message.clone())),
            Some(Failure::Invalid(message)) => Err(ProviderError::Invalid(message.clone())),
            None => Ok(self.snapshot.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equity_defaults_to_cash_plus_holdings() {
        let provider = MockProvider::builder()
            .with_holding("A", 10_00, 5)
            .with_cash(15_00)
            .build();

        let snap = provider.account_snapshot().unwrap();
        assert_eq!(snap.total_equity, Price(65_00));
        assert_eq!(snap.holdings.len(), 1);
    }

    #[test]
    fn explicit_equity() {
        let provider = MockProvider::builder()
            .with_holding("A", 10_00, 5)
            .with_cash(15_00)
            .with_equity(100_00)
            .build();
        assert_eq!(provider.account_snapshot().unwrap().total_equity, Price(100_00));
    }

    #[test]
    fn failing_mode() {
        let provider = MockProvider::builder().failing("gateway down").build();
        let err = provider.account_snapshot().unwrap_err();
        assert!(err.to_string().contains("gateway down"));
    }

    #[test]
    fn overflowing_equity_is_invalid() {
        let provider = MockProvider::builder()
            .with_holding("A", 1_00, u64::MAX / 2)
            .build();
        assert!(matches!(
            provider.account_snapshot(),
            Err(ProviderError::Invalid(_))
        ));
    }

    #[test]
    fn counts_calls() {
        let provider = MockProvider::builder().build();
        assert_eq!(provider.calls(), 0);
        provider.account_snapshot().unwrap();
        provider.account_snapshot().unwrap();
        assert_eq!(provider.calls(), 2);
    }
}
