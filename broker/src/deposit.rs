//! Simulated deposit on top of another provider.

use cashfill::{AccountSnapshot, Price};
use log::debug;

use crate::AccountProvider;
use crate::error::ProviderError;

/// Adds a fixed amount to both cash and equity of the inner provider's
/// snapshot. Used to plan purchases for money not yet in the account.
pub struct Deposit<P> {
    inner: P,
    amount: Price,
}

impl<P: AccountProvider> Deposit<P> {
    pub fn new(inner: P, amount: Price) -> Self {
        Self { inner, amount }
    }

    pub fn amount(&self) -> Price {
        self.amount
    }
}

impl<P: AccountProvider> AccountProvider for Deposit<P> {
    fn account_snapshot(&self) -> Result<AccountSnapshot, ProviderError> {
        if self.amount.0 < 0 {
            return Err(ProviderError::Invalid(format!(
                "deposit must not be negative, got {}",
                self.amount
            )));
        }
        let snapshot = self.inner.account_snapshot()?;
        debug!("adding simulated deposit of {}", self.amount);
        Ok(snapshot.with_deposit(self.amount))
    }
}
