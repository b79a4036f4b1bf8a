//! Account data providers for cashfill.
//!
//! The allocation core only needs an [`AccountSnapshot`]; where it comes from
//! is behind the [`AccountProvider`] trait. Implementations:
//!
//! - [`FileProvider`]: JSON snapshot on disk (exported from a brokerage)
//! - [`MockProvider`]: in-memory snapshot for tests
//! - [`Deposit`]: wraps another provider and adds a simulated cash deposit

pub mod deposit;
pub mod error;
pub mod file;
pub mod mock;
pub mod types;

pub use deposit::Deposit;
pub use error::ProviderError;
pub use file::FileProvider;
pub use mock::MockProvider;
pub use types::{PositionRecord, SnapshotRecord};

use cashfill::AccountSnapshot;

/// Source of the account state an allocation runs against.
pub trait AccountProvider {
    /// Fetch the current cash, equity and holdings.
    fn account_snapshot(&self) -> Result<AccountSnapshot, ProviderError>;
}

impl<P: AccountProvider + ?Sized> AccountProvider for Box<P> {
    fn account_snapshot(&self) -> Result<AccountSnapshot, ProviderError> {
        (**self).account_snapshot()
    }
}

impl<P: AccountProvider + ?Sized> AccountProvider for &P {
    fn account_snapshot(&self) -> Result<AccountSnapshot, ProviderError> {
        (**self).account_snapshot()
    }
}
