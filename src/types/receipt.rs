//! Settlement receipt for one netting operation.
//!
//! The receipt doubles as the callback's return payload: the state machine
//! SSZ-encodes it inside the venue callback and decodes it once `unlock`
//! returns, so the venue only ever sees opaque bytes.

use alloy_primitives::{Address, B256, U256};
use sha2::{Digest, Sha256};
use ssz_rs::prelude::*;

/// Summary of a settled operation.
///
/// Addresses and amounts are stored as 32-byte big-endian words so the
/// container is fixed-size.
///
/// ## Example
///
/// ```
/// use hop_netting::types::SwapReceipt;
///
/// let hash = SwapReceipt::compute_hash(b"route bytes");
/// assert_eq!(hash.len(), 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct SwapReceipt {
    /// Funding asset (left-padded)
    pub sell_asset: [u8; 32],

    /// Final buy asset (left-padded)
    pub buy_asset: [u8; 32],

    /// Recipient of the buy asset (left-padded)
    pub recipient: [u8; 32],

    /// Funding amount the caller committed
    pub sell_nominal: [u8; 32],

    /// Funding amount the venue recorded; lower than nominal when the
    /// asset charged a fee in transit
    pub sell_received: [u8; 32],

    /// Funding amount actually consumed by the route
    pub sell_spent: [u8; 32],

    /// Settled buy amount delivered to the recipient
    pub buy_amount: [u8; 32],

    /// Number of hops executed
    pub hops: u64,

    /// SHA-256 of the hop stream
    pub route_hash: [u8; 32],
}

impl SwapReceipt {
    /// Create a receipt from typed values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sell_asset: Address,
        buy_asset: Address,
        recipient: Address,
        sell_nominal: U256,
        sell_received: U256,
        sell_spent: U256,
        buy_amount: U256,
        hops: u64,
        route: &[u8],
    ) -> Self {
        Self {
            sell_asset: sell_asset.into_word().0,
            buy_asset: buy_asset.into_word().0,
            recipient: recipient.into_word().0,
            sell_nominal: sell_nominal.to_be_bytes::<32>(),
            sell_received: sell_received.to_be_bytes::<32>(),
            sell_spent: sell_spent.to_be_bytes::<32>(),
            buy_amount: buy_amount.to_be_bytes::<32>(),
            hops,
            route_hash: Self::compute_hash(route),
        }
    }

    /// SHA-256 of arbitrary bytes.
    pub fn compute_hash(data: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    pub fn sell_asset(&self) -> Address {
        Address::from_word(B256::from(self.sell_asset))
    }

    pub fn buy_asset(&self) -> Address {
        Address::from_word(B256::from(self.buy_asset))
    }

    pub fn recipient(&self) -> Address {
        Address::from_word(B256::from(self.recipient))
    }

    pub fn sell_nominal(&self) -> U256 {
        U256::from_be_bytes(self.sell_nominal)
    }

    pub fn sell_received(&self) -> U256 {
        U256::from_be_bytes(self.sell_received)
    }

    pub fn sell_spent(&self) -> U256 {
        U256::from_be_bytes(self.sell_spent)
    }

    /// Final settled buy amount.
    pub fn buy_amount(&self) -> U256 {
        U256::from_be_bytes(self.buy_amount)
    }

    /// Funding lost in transit: `nominal - received`.
    pub fn transfer_shortfall(&self) -> U256 {
        self.sell_nominal().saturating_sub(self.sell_received())
    }

    /// Route hash as a hex string
    pub fn route_hash_hex(&self) -> String {
        hex::encode(self.route_hash)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
