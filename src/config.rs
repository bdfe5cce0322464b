//! Engine configuration and wire constants.
//!
//! Everything here is fixed at build time except [`EngineConfig`], which
//! carries the engine's own identity (the address that holds custody of
//! swept credits and self-funded balances).

use alloy_primitives::{address, fixed_bytes, Address, Selector};

/// Maximum number of distinct assets tracked during one operation.
pub const LEDGER_CAPACITY: usize = 8;

/// Denominator for hop shares: 10_000 bps = 100%.
pub const BASIS_POINTS: u16 = 10_000;

/// Smallest possible hop record: share (2) + case (1) + fee (3) +
/// tick spacing (3) + hook (20) + payload length (3).
///
/// The execution loop stops once fewer bytes than this remain.
pub const HOP_HEADER_LEN: usize = 2 + 1 + 3 + 3 + 20 + 3;

/// Selector the venue presents when it calls back into the engine
/// (`unlockCallback(bytes)`).
pub const UNLOCK_CALLBACK_SELECTOR: Selector = fixed_bytes!("91dd7346");

/// Sentinel identifier for the chain's native asset.
pub const NATIVE_ASSET: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

/// Default engine identity used by the demo binary and tests.
pub const DEFAULT_ENGINE_ADDRESS: Address = address!("00000000000000000000000000000000000e4e11");

/// Per-engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Address the engine acts as: custody for swept credits and the
    /// source of self-funded payments.
    pub address: Address,
}

impl EngineConfig {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE_ADDRESS)
    }
}
