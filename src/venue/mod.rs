//! Collaborator contracts: the liquidity venue, the asset bank and funding.
//!
//! ## Unlock protocol
//!
//! ```text
//! engine ──unlock(locker, cb, data)──▶ venue
//!                                        │
//! engine ◀──unlock_callback(venue, caller, selector, data)──┘
//!   │ exchange / take / sync / settle ─▶ venue
//!   └─ returns payload ─▶ venue ─▶ engine
//! ```
//!
//! The venue hands itself back into the callback, so the engine can call
//! venue primitives while the venue's `unlock` frame is still live.
//!
//! ## Sign convention
//!
//! [`BalanceDelta`] amounts are from the engine's point of view: negative
//! means the engine gave the asset up, positive means the venue owes it.
//!
//! ## Reference implementations
//!
//! - [`TokenBank`]: in-memory balances with optional transfer fees
//! - [`MemoryVenue`]: fixed-rate and scripted pools, delta netting
//! - [`MemoryFunding`]: signature-authorized and pre-approved pulls

use alloy_primitives::{Address, Selector, I256, U256};

use crate::error::{FundingError, Result, VenueError};
use crate::types::{FundingAuthorization, PoolKey};

pub mod bank;
pub mod funding;
pub mod memory;

pub use bank::TokenBank;
pub use funding::MemoryFunding;
pub use memory::{CallbackMode, MemoryVenue, Pool, Quote};

/// Signed settlement deltas for a pool's two assets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceDelta {
    pub amount0: I256,
    pub amount1: I256,
}

impl BalanceDelta {
    pub fn new(amount0: I256, amount1: I256) -> Self {
        Self { amount0, amount1 }
    }

    /// Build from (sell, buy) deltas for a given direction
    pub fn from_sell_buy(zero_for_one: bool, sell: I256, buy: I256) -> Self {
        if zero_for_one {
            Self::new(sell, buy)
        } else {
            Self::new(buy, sell)
        }
    }

    /// Split into (sell, buy) deltas for a given direction
    pub fn split(self, zero_for_one: bool) -> (I256, I256) {
        if zero_for_one {
            (self.amount0, self.amount1)
        } else {
            (self.amount1, self.amount0)
        }
    }
}

/// Asset custody shared by the engine, the venue and funding.
pub trait AssetBank {
    fn balance_of(&self, asset: Address, owner: Address) -> U256;

    /// Move `amount` of `asset`. Returns the amount actually credited to
    /// `to`, which is lower than `amount` for assets that charge a fee in
    /// transit.
    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<U256, VenueError>;
}

/// External liquidity venue reached through a reentrant unlock callback.
pub trait Venue {
    /// The venue's identity, presented as the callback caller.
    fn address(&self) -> Address;

    /// Asset custody the venue settles against.
    fn bank(&mut self) -> &mut dyn AssetBank;

    /// Open an unlocked section for `locker` and call `callback` exactly
    /// once with `data`. All deltas must net to zero before returning.
    fn unlock(
        &mut self,
        locker: Address,
        callback: &mut dyn UnlockCallback,
        data: &[u8],
    ) -> Result<Vec<u8>>;

    /// Exact-input exchange of `amount_in` against `pool`.
    fn exchange(
        &mut self,
        pool: &PoolKey,
        zero_for_one: bool,
        amount_in: U256,
        hook_data: &[u8],
    ) -> Result<BalanceDelta>;

    /// Withdraw `amount` of credit in `asset` to `to`.
    fn take(&mut self, asset: Address, to: Address, amount: U256) -> Result<()>;

    /// Snapshot the venue's holding of `asset` before a payment.
    fn sync(&mut self, asset: Address) -> Result<()>;

    /// Record a payment: the native `value` attached, or else whatever
    /// arrived in the synced asset since `sync`. Returns the recorded amount.
    fn settle(&mut self, value: U256) -> Result<U256>;
}

/// Receiver of the venue's unlock callback.
pub trait UnlockCallback {
    fn unlock_callback(
        &mut self,
        venue: &mut dyn Venue,
        caller: Address,
        selector: Selector,
        data: &[u8],
    ) -> Result<Vec<u8>>;
}

/// Pulls the funding asset from an external payer.
pub trait Funding {
    /// Signature-authorized pull from `from` to `to`.
    fn pull(
        &mut self,
        bank: &mut dyn AssetBank,
        authorization: &FundingAuthorization,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<(), FundingError>;

    /// Allowance-based pull by `spender` from `from` to `to`.
    fn pre_approved_transfer(
        &mut self,
        bank: &mut dyn AssetBank,
        asset: Address,
        from: Address,
        spender: Address,
        to: Address,
        amount: U256,
    ) -> std::result::Result<(), FundingError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed(v: i64) -> I256 {
        I256::try_from(v).unwrap()
    }

    #[test]
    fn test_balance_delta_direction() {
        let delta = BalanceDelta::from_sell_buy(true, signed(-10), signed(5));
        assert_eq!(delta.amount0, signed(-10));
        assert_eq!(delta.split(true), (signed(-10), signed(5)));

        let delta = BalanceDelta::from_sell_buy(false, signed(-10), signed(5));
        assert_eq!(delta.amount1, signed(-10));
        assert_eq!(delta.split(false), (signed(-10), signed(5)));
    }
}
