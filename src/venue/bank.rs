//! In-memory asset custody.
//!
//! Balances are keyed by `(asset, owner)`. Each asset may carry a transfer
//! fee in basis points, deducted from the amount credited to the receiver,
//! which is how fee-on-transfer assets are modelled.

use std::collections::HashMap;

use alloy_primitives::{Address, U256};

use crate::config::BASIS_POINTS;
use crate::error::VenueError;
use crate::types::amount::apply_share;
use crate::venue::AssetBank;

/// Balance table with optional per-asset transfer fees.
///
/// ## Example
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use hop_netting::venue::{AssetBank, TokenBank};
///
/// let asset = Address::with_last_byte(1);
/// let alice = Address::with_last_byte(0xa);
/// let bob = Address::with_last_byte(0xb);
///
/// let mut bank = TokenBank::new();
/// bank.mint(asset, alice, U256::from(1_000u64));
/// bank.set_transfer_fee(asset, 100); // 1%
///
/// let received = bank.transfer(asset, alice, bob, U256::from(1_000u64)).unwrap();
/// assert_eq!(received, U256::from(990u64));
/// assert_eq!(bank.balance_of(asset, bob), U256::from(990u64));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TokenBank {
    balances: HashMap<(Address, Address), U256>,
    fees: HashMap<Address, u16>,
}

impl TokenBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `owner` with newly created `amount` of `asset`
    pub fn mint(&mut self, asset: Address, owner: Address, amount: U256) {
        let balance = self.balances.entry((asset, owner)).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Charge `bps` of every transfer of `asset` (capped at 100%)
    pub fn set_transfer_fee(&mut self, asset: Address, bps: u16) {
        self.fees.insert(asset, bps.min(BASIS_POINTS));
    }

    pub fn transfer_fee(&self, asset: Address) -> u16 {
        self.fees.get(&asset).copied().unwrap_or(0)
    }
}

impl AssetBank for TokenBank {
    fn balance_of(&self, asset: Address, owner: Address) -> U256 {
        self.balances
            .get(&(asset, owner))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(
        &mut self,
        asset: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<U256, VenueError> {
        let available = self.balance_of(asset, from);
        if available < amount {
            return Err(VenueError::InsufficientBalance {
                asset,
                owner: from,
                needed: amount,
                available,
            });
        }

        let fee = apply_share(amount, self.transfer_fee(asset));
        let received = amount - fee;

        self.balances.insert((asset, from), available - amount);
        let balance = self.balances.entry((asset, to)).or_default();
        *balance = balance.saturating_add(received);

        Ok(received)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
