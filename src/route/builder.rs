//! Hop stream encoder.
//!
//! Produces the exact layout [`decode_next`](crate::route::decode_next)
//! consumes. Used to build routes for the engine, the demo binary and tests.
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::Address;
//! use hop_netting::route::RouteBuilder;
//! use hop_netting::types::PoolParams;
//!
//! let route = RouteBuilder::new()
//!     .new_buy(10_000, Address::with_last_byte(2), PoolParams::default(), b"")
//!     .chain(10_000, Address::with_last_byte(3), PoolParams::default(), b"")
//!     .build();
//!
//! assert_eq!(route.len(), 2 * (2 + 1 + 20 + 29));
//! ```
//!
//! Every hop method panics on a hook payload longer than
//! [`MAX_HOOK_PAYLOAD`], which the 24-bit length prefix cannot carry.

use alloy_primitives::Address;

use crate::types::{HopCase, PoolParams};

/// Largest hook payload the 24-bit length prefix can describe.
pub const MAX_HOOK_PAYLOAD: usize = (1 << 24) - 1;

/// Incremental hop stream encoder.
#[derive(Debug, Clone, Default)]
pub struct RouteBuilder {
    buf: Vec<u8>,
    hops: usize,
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case 0: same sell and buy as the previous hop.
    ///
    /// # Panics
    ///
    /// Panics if `hook_data` exceeds [`MAX_HOOK_PAYLOAD`] bytes.
    pub fn continue_hop(mut self, share_bps: u16, pool: PoolParams, hook_data: &[u8]) -> Self {
        self.push_header(share_bps, HopCase::Continue);
        self.push_pool(pool, hook_data);
        self
    }

    /// Case 1: same sell, new buy.
    ///
    /// # Panics
    ///
    /// Panics if `hook_data` exceeds [`MAX_HOOK_PAYLOAD`] bytes.
    pub fn new_buy(mut self, share_bps: u16, buy: Address, pool: PoolParams, hook_data: &[u8]) -> Self {
        self.push_header(share_bps, HopCase::NewBuy);
        self.buf.extend_from_slice(buy.as_slice());
        self.push_pool(pool, hook_data);
        self
    }

    /// Case 2: previous buy becomes sell, new buy.
    ///
    /// # Panics
    ///
    /// Panics if `hook_data` exceeds [`MAX_HOOK_PAYLOAD`] bytes.
    pub fn chain(mut self, share_bps: u16, buy: Address, pool: PoolParams, hook_data: &[u8]) -> Self {
        self.push_header(share_bps, HopCase::Chain);
        self.buf.extend_from_slice(buy.as_slice());
        self.push_pool(pool, hook_data);
        self
    }

    /// Case 3: both assets explicit.
    ///
    /// # Panics
    ///
    /// Panics if `hook_data` exceeds [`MAX_HOOK_PAYLOAD`] bytes.
    pub fn explicit(
        mut self,
        share_bps: u16,
        sell: Address,
        buy: Address,
        pool: PoolParams,
        hook_data: &[u8],
    ) -> Self {
        self.push_header(share_bps, HopCase::Explicit);
        self.buf.extend_from_slice(sell.as_slice());
        self.buf.extend_from_slice(buy.as_slice());
        self.push_pool(pool, hook_data);
        self
    }

    /// Number of hops encoded so far
    pub fn hop_count(&self) -> usize {
        self.hops
    }

    pub fn build(self) -> Vec<u8> {
        self.buf
    }

    fn push_header(&mut self, share_bps: u16, case: HopCase) {
        self.buf.extend_from_slice(&share_bps.to_be_bytes());
        self.buf.push(case.to_u8());
        self.hops += 1;
    }

    fn push_pool(&mut self, pool: PoolParams, hook_data: &[u8]) {
        assert!(hook_data.len() <= MAX_HOOK_PAYLOAD, "hook payload too large");

        self.buf.extend_from_slice(&pool.fee.to_be_bytes()[1..]);
        self.buf.extend_from_slice(&(pool.tick_spacing as u32).to_be_bytes()[1..]);
        self.buf.extend_from_slice(pool.hooks.as_slice());
        self.buf.extend_from_slice(&(hook_data.len() as u32).to_be_bytes()[1..]);
        self.buf.extend_from_slice(hook_data);
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
