//! Parallel allocation over independent scenarios.

use crate::engine::{AllocationEngine, AllocationResult};
use crate::error::Result;
use crate::holding::{AccountSnapshot, TargetWeights};

/// Allocate each snapshot against the same target weights on the rayon pool.
///
/// Typical use is comparing hypothetical deposits for one account. Results
/// come back in input order; each scenario fails or succeeds on its own.
///
/// # Example
///
/// ```ignore
/// use cashfill::{sweep::allocate_scenarios, AllocationEngine, Price};
///
/// let scenarios: Vec<_> = [0, 500_00, 1_000_00]
///     .into_iter()
///     .map(|d| snapshot.clone().with_deposit(Price(d)))
///     .collect();
/// let results = allocate_scenarios(&AllocationEngine::new(), &scenarios, &weights);
/// ```
pub fn allocate_scenarios(
    engine: &AllocationEngine,
    scenarios: &[AccountSnapshot],
    weights: &TargetWeights,
) -> Vec<Result<AllocationResult>> {
    use rayon::prelude::*;

    scenarios
        .par_iter()
        .map(|snapshot| engine.allocate_snapshot(snapshot, weights))
        .collect()
}
