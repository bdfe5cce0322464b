//! In-memory liquidity venue.
//!
//! ## Architecture
//!
//! - **Slab**: Pool storage, keys reused after removal
//! - **HashMap**: Pool key to slab key mapping for O(1) lookup
//! - **Delta table**: Per-asset signed balance owed between locker and venue
//!
//! ## Atomicity
//!
//! `unlock` snapshots the bank and pool registry before running the
//! callback. If the callback fails, or returns with any nonzero delta,
//! the snapshot is restored and the error surfaces to the locker. No
//! partial effect survives a failed unlock.
//!
//! ## Quoting
//!
//! - [`Quote::Rate`]: `out = floor(in * rate)` for zero-for-one and
//!   `floor(in / rate)` the other way, with an optional input cap that
//!   produces partial fills
//! - [`Quote::Fixed`]: scripted (sell, buy) deltas, ignoring the input;
//!   used to model hostile or unusual pools
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use rust_decimal::Decimal;
//! use hop_netting::types::{PoolKey, PoolParams};
//! use hop_netting::venue::{MemoryVenue, Quote, Venue};
//!
//! let a = Address::with_last_byte(1);
//! let b = Address::with_last_byte(2);
//! let key = PoolKey::new(a, b, PoolParams::default());
//!
//! let mut venue = MemoryVenue::new(Address::with_last_byte(0xee));
//! venue.add_pool(key, Quote::rate(Decimal::new(5, 1))).unwrap();
//!
//! assert!(venue.pool(&key).is_some());
//! assert!(!venue.is_unlocked());
//! ```

use std::collections::HashMap;

use alloy_primitives::{Address, Selector, I256, U256};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use slab::Slab;
use tracing::{debug, trace};

use crate::config::{NATIVE_ASSET, UNLOCK_CALLBACK_SELECTOR};
use crate::error::{NettingError, Result, VenueError};
use crate::types::amount::to_signed;
use crate::types::PoolKey;
use crate::venue::{AssetBank, BalanceDelta, TokenBank, UnlockCallback, Venue};

/// How a pool prices an exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    /// Units of asset1 per unit of asset0, with an optional input cap.
    Rate { rate: Decimal, max_in: Option<U256> },
    /// Scripted (sell, buy) deltas returned regardless of input.
    Fixed { sell: I256, buy: I256 },
}

impl Quote {
    /// Unlimited-depth fixed-rate quote
    pub fn rate(rate: Decimal) -> Self {
        Quote::Rate { rate, max_in: None }
    }

    /// Fixed-rate quote that fills at most `max_in` per exchange
    pub fn capped(rate: Decimal, max_in: U256) -> Self {
        Quote::Rate {
            rate,
            max_in: Some(max_in),
        }
    }

    /// (sell, buy) deltas for an exact-input exchange
    fn deltas(&self, zero_for_one: bool, amount_in: U256) -> Result<(I256, I256)> {
        match *self {
            Quote::Fixed { sell, buy } => Ok((sell, buy)),
            Quote::Rate { rate, max_in } => {
                let filled = max_in.map_or(amount_in, |cap| amount_in.min(cap));
                let input = u128::try_from(filled)
                    .ok()
                    .and_then(Decimal::from_u128)
                    .ok_or(VenueError::QuoteOutOfRange(filled))?;

                let output = if zero_for_one {
                    input.checked_mul(rate)
                } else {
                    input.checked_div(rate)
                };
                let output = output
                    .map(|d| d.floor())
                    .and_then(|d| d.to_u128())
                    .map(U256::from)
                    .ok_or(VenueError::QuoteOutOfRange(filled))?;

                Ok((-to_signed(filled)?, to_signed(output)?))
            }
        }
    }
}

/// A registered pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pool {
    pub key: PoolKey,
    pub quote: Quote,
}

/// Callback behaviour, for exercising the engine's guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackMode {
    /// Call back once with the venue's own identity.
    #[default]
    Normal,
    /// Call back presenting a different caller.
    WrongCaller(Address),
    /// Call back with a different selector.
    WrongSelector(Selector),
    /// Call back twice in a row.
    Twice,
    /// Return without calling back.
    Skip,
}

/// State restored on a failed unlock.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    bank: TokenBank,
    pools: Slab<Pool>,
    pool_index: HashMap<PoolKey, usize>,
}

/// In-memory venue with delta netting and all-or-nothing unlocks.
#[derive(Debug)]
pub struct MemoryVenue {
    address: Address,
    state: Snapshot,
    deltas: HashMap<Address, I256>,
    locker: Option<Address>,
    synced: Option<(Address, U256)>,
    callback_mode: CallbackMode,
}

impl MemoryVenue {
    pub fn new(address: Address) -> Self {
        Self::with_bank(address, TokenBank::new())
    }

    /// Create a venue settling against an existing bank
    pub fn with_bank(address: Address, bank: TokenBank) -> Self {
        Self {
            address,
            state: Snapshot {
                bank,
                ..Snapshot::default()
            },
            deltas: HashMap::new(),
            locker: None,
            synced: None,
            callback_mode: CallbackMode::Normal,
        }
    }

    // ========================================================================
    // Pool registry
    // ========================================================================

    /// Register a pool
    ///
    /// # Returns
    ///
    /// The slab key for the pool
    pub fn add_pool(&mut self, key: PoolKey, quote: Quote) -> std::result::Result<usize, VenueError> {
        if self.state.pool_index.contains_key(&key) {
            return Err(VenueError::DuplicatePool);
        }
        let slot = self.state.pools.insert(Pool { key, quote });
        self.state.pool_index.insert(key, slot);
        Ok(slot)
    }

    /// Remove a pool, returning it if present
    pub fn remove_pool(&mut self, key: &PoolKey) -> Option<Pool> {
        let slot = self.state.pool_index.remove(key)?;
        Some(self.state.pools.remove(slot))
    }

    pub fn pool(&self, key: &PoolKey) -> Option<&Pool> {
        let slot = *self.state.pool_index.get(key)?;
        self.state.pools.get(slot)
    }

    pub fn pool_count(&self) -> usize {
        self.state.pools.len()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn bank_ref(&self) -> &TokenBank {
        &self.state.bank
    }

    pub fn bank_mut(&mut self) -> &mut TokenBank {
        &mut self.state.bank
    }

    pub fn set_callback_mode(&mut self, mode: CallbackMode) {
        self.callback_mode = mode;
    }

    pub fn is_unlocked(&self) -> bool {
        self.locker.is_some()
    }

    /// Current delta for `asset` (zero outside an unlock)
    pub fn delta(&self, asset: Address) -> I256 {
        self.deltas.get(&asset).copied().unwrap_or(I256::ZERO)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn require_unlocked(&self) -> std::result::Result<Address, VenueError> {
        self.locker.ok_or(VenueError::Locked)
    }

    fn accrue(&mut self, asset: Address, amount: I256) {
        if amount.is_zero() {
            return;
        }
        let delta = self.deltas.entry(asset).or_insert(I256::ZERO);
        *delta = delta.saturating_add(amount);
    }

    fn invoke(&mut self, callback: &mut dyn UnlockCallback, data: &[u8]) -> Result<Vec<u8>> {
        let own = self.address;
        match self.callback_mode {
            CallbackMode::Normal => callback.unlock_callback(self, own, UNLOCK_CALLBACK_SELECTOR, data),
            CallbackMode::WrongCaller(caller) => {
                callback.unlock_callback(self, caller, UNLOCK_CALLBACK_SELECTOR, data)
            }
            CallbackMode::WrongSelector(selector) => callback.unlock_callback(self, own, selector, data),
            CallbackMode::Twice => {
                callback.unlock_callback(self, own, UNLOCK_CALLBACK_SELECTOR, data)?;
                callback.unlock_callback(self, own, UNLOCK_CALLBACK_SELECTOR, data)
            }
            CallbackMode::Skip => Ok(Vec::new()),
        }
    }

    /// First unsettled asset, lowest address first
    fn check_settled(&self) -> std::result::Result<(), VenueError> {
        let open = self
            .deltas
            .iter()
            .filter(|(_, delta)| !delta.is_zero())
            .min_by_key(|(asset, _)| **asset);

        match open {
            Some((&asset, &delta)) => Err(VenueError::CurrencyNotSettled { asset, delta }),
            None => Ok(()),
        }
    }
}

impl Venue for MemoryVenue {
    fn address(&self) -> Address {
        self.address
    }

    fn bank(&mut self) -> &mut dyn AssetBank {
        &mut self.state.bank
    }

    fn unlock(
        &mut self,
        locker: Address,
        callback: &mut dyn UnlockCallback,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        if self.locker.is_some() {
            return Err(VenueError::AlreadyUnlocked.into());
        }

        let snapshot = self.state.clone();
        self.locker = Some(locker);
        debug!(%locker, "venue unlocked");

        let result = self
            .invoke(callback, data)
            .and_then(|payload| self.check_settled().map(|_| payload).map_err(NettingError::from));

        self.locker = None;
        self.synced = None;
        self.deltas.clear();

        if result.is_err() {
            self.state = snapshot;
            debug!(%locker, "venue unlock reverted");
        }
        result
    }

    fn exchange(
        &mut self,
        pool: &PoolKey,
        zero_for_one: bool,
        amount_in: U256,
        _hook_data: &[u8],
    ) -> Result<BalanceDelta> {
        self.require_unlocked()?;

        let quote = self
            .pool(pool)
            .map(|p| p.quote)
            .ok_or(VenueError::PoolNotFound {
                asset0: pool.asset0,
                asset1: pool.asset1,
                fee: pool.params.fee,
            })?;

        let (sell, buy) = quote.deltas(zero_for_one, amount_in)?;
        let (input, output) = if zero_for_one {
            (pool.asset0, pool.asset1)
        } else {
            (pool.asset1, pool.asset0)
        };
        self.accrue(input, sell);
        self.accrue(output, buy);

        trace!(%input, %output, %amount_in, %sell, %buy, "exchange");
        Ok(BalanceDelta::from_sell_buy(zero_for_one, sell, buy))
    }

    fn take(&mut self, asset: Address, to: Address, amount: U256) -> Result<()> {
        self.require_unlocked()?;
        let own = self.address;
        self.state.bank.transfer(asset, own, to, amount)?;
        self.accrue(asset, -to_signed(amount)?);
        Ok(())
    }

    fn sync(&mut self, asset: Address) -> Result<()> {
        let held = self.state.bank.balance_of(asset, self.address);
        self.synced = Some((asset, held));
        Ok(())
    }

    fn settle(&mut self, value: U256) -> Result<U256> {
        let locker = self.require_unlocked()?;
        let own = self.address;

        let (asset, paid) = if !value.is_zero() {
            let paid = self.state.bank.transfer(NATIVE_ASSET, locker, own, value)?;
            (NATIVE_ASSET, paid)
        } else {
            let (asset, before) = self.synced.take().ok_or(VenueError::NotSynced)?;
            let now = self.state.bank.balance_of(asset, own);
            (asset, now.saturating_sub(before))
        };

        self.accrue(asset, to_signed(paid)?);
        Ok(paid)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
