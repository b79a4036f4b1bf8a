//! Errors raised by the allocation core.

/// Errors returned by [`AllocationEngine`](crate::AllocationEngine),
/// [`RemainingCashAllocator`](crate::RemainingCashAllocator) and
/// [`WeightReport`](crate::WeightReport).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AllocationError {
    /// Inputs failed validation; nothing was allocated.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Residual budget exceeds the knapsack table bound.
    #[error("budget of {budget} minor units exceeds the allocator limit of {max}")]
    BudgetTooLarge { budget: u64, max: u64 },
}

pub type Result<T> = std::result::Result<T, AllocationError>;
