//! cashfill-rebalancer: plan cash purchases toward target weights.
//!
//! Reads target weights from a JSON file, fetches the account snapshot from
//! the configured provider, runs the cashfill allocation engine, and prints
//! the resulting orders with an audit trail. No orders are placed.

pub mod audit;
pub mod config;
pub mod error;
pub mod plan;
pub mod target;
