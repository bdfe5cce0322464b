//! Hop descriptors and venue pool identity.
//!
//! A [`Hop`] is one decoded exchange step. The decoder resolves the sell
//! and buy assets against the ledger, fixes the swap direction, and keeps
//! the pool parameters and hook payload verbatim for the venue.

use alloy_primitives::Address;

// ============================================================================
// HopCase enum
// ============================================================================

/// Selects which of {sell, buy} carry over from the previous hop.
///
/// Wire values:
/// - Continue = 0
/// - NewBuy = 1
/// - Chain = 2
/// - Explicit = 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HopCase {
    /// Same sell and buy assets as the previous hop.
    Continue,
    /// Same sell asset, new buy asset from the stream.
    NewBuy,
    /// Previous buy asset becomes the sell asset, new buy asset from the stream.
    Chain,
    /// Both assets from the stream.
    Explicit,
}

impl HopCase {
    /// Convert to the wire byte
    pub fn to_u8(self) -> u8 {
        match self {
            HopCase::Continue => 0,
            HopCase::NewBuy => 1,
            HopCase::Chain => 2,
            HopCase::Explicit => 3,
        }
    }

    /// Convert from the wire byte
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(HopCase::Continue),
            1 => Some(HopCase::NewBuy),
            2 => Some(HopCase::Chain),
            3 => Some(HopCase::Explicit),
            _ => None,
        }
    }

    /// Number of asset bytes this case reads from the stream.
    pub fn asset_bytes(self) -> usize {
        match self {
            HopCase::Continue => 0,
            HopCase::NewBuy | HopCase::Chain => 20,
            HopCase::Explicit => 40,
        }
    }
}

// ============================================================================
// Pool identity
// ============================================================================

/// Venue pool parameters carried per hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PoolParams {
    /// Fee tier (24-bit on the wire)
    pub fee: u32,
    /// Tick spacing (signed 24-bit on the wire)
    pub tick_spacing: i32,
    /// Hook contract identity
    pub hooks: Address,
}

/// A venue pool: an ordered asset pair plus its parameters.
///
/// `asset0` is always the lower address, matching how venues key pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PoolKey {
    pub asset0: Address,
    pub asset1: Address,
    pub params: PoolParams,
}

impl PoolKey {
    /// Build a key from an unordered pair.
    ///
    /// ```
    /// use alloy_primitives::Address;
    /// use hop_netting::types::{PoolKey, PoolParams};
    ///
    /// let a = Address::with_last_byte(2);
    /// let b = Address::with_last_byte(1);
    /// let key = PoolKey::new(a, b, PoolParams::default());
    /// assert_eq!(key.asset0, b);
    /// assert_eq!(key.asset1, a);
    /// ```
    pub fn new(a: Address, b: Address, params: PoolParams) -> Self {
        let (asset0, asset1) = if a < b { (a, b) } else { (b, a) };
        Self {
            asset0,
            asset1,
            params,
        }
    }

    /// Whether selling `sell` into this pool moves asset0 -> asset1.
    #[inline]
    pub fn zero_for_one(sell: Address, buy: Address) -> bool {
        sell < buy
    }
}

// ============================================================================
// Hop
// ============================================================================

/// One decoded exchange step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    /// Share of the current sell balance to sell, in bps
    pub share_bps: u16,
    /// How the asset pair was resolved
    pub case: HopCase,
    /// Asset given up
    pub sell: Address,
    /// Asset received
    pub buy: Address,
    /// Direction, fixed at decode time
    pub zero_for_one: bool,
    /// Pool parameters
    pub pool: PoolParams,
    /// Opaque payload forwarded to the pool's hook
    pub hook_data: Vec<u8>,
}

impl Hop {
    /// Key of the pool this hop trades against
    pub fn pool_key(&self) -> PoolKey {
        PoolKey::new(self.sell, self.buy, self.pool)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_case_conversion() {
        for case in [
            HopCase::Continue,
            HopCase::NewBuy,
            HopCase::Chain,
            HopCase::Explicit,
        ] {
            assert_eq!(HopCase::from_u8(case.to_u8()), Some(case));
        }
        assert_eq!(HopCase::from_u8(4), None);
    }

    #[test]
    fn test_hop_case_asset_bytes() {
        assert_eq!(HopCase::Continue.asset_bytes(), 0);
        assert_eq!(HopCase::NewBuy.asset_bytes(), 20);
        assert_eq!(HopCase::Chain.asset_bytes(), 20);
        assert_eq!(HopCase::Explicit.asset_bytes(), 40);
    }

    #[test]
    fn test_zero_for_one() {
        let low = Address::with_last_byte(1);
        let high = Address::with_last_byte(9);
        assert!(PoolKey::zero_for_one(low, high));
        assert!(!PoolKey::zero_for_one(high, low));
    }

    #[test]
    fn test_pool_key_is_order_independent() {
        let a = Address::with_last_byte(1);
        let b = Address::with_last_byte(9);
        let params = PoolParams {
            fee: 3000,
            tick_spacing: 60,
            hooks: Address::ZERO,
        };
        assert_eq!(PoolKey::new(a, b, params), PoolKey::new(b, a, params));
    }
}
