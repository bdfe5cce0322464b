//! Core data types for the netting engine
//!
//! Asset identifiers are 20-byte addresses; balances are `U256` and venue
//! deltas are `I256`.
//!
//! ## Types
//!
//! - [`Hop`]: One decoded exchange step
//! - [`HopCase`]: How a hop resolves its asset pair
//! - [`PoolKey`] / [`PoolParams`]: Venue pool identity
//! - [`OperationContext`]: Caller-supplied per-operation inputs
//! - [`FundingMode`] / [`FundingAuthorization`]: Where the sell asset comes from
//! - [`SwapReceipt`]: SSZ-encoded settlement summary

mod context;
mod hop;
mod receipt;
pub mod amount;

// Re-export all types at module level
pub use context::{FundingAuthorization, FundingMode, HashParams, OperationContext};
pub use hop::{Hop, HopCase, PoolKey, PoolParams};
pub use receipt::SwapReceipt;
