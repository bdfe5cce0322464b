//! Per-operation context supplied by the caller.
//!
//! An [`OperationContext`] is built fresh for every call to
//! [`SwapStateMachine::execute`](crate::engine::SwapStateMachine::execute)
//! and owned by that invocation until it returns.

use alloy_primitives::{Address, U256};
use sha2::{Digest, Sha256};

// ============================================================================
// Hash parameters
// ============================================================================

/// Multiplier/modulus pair for the ledger's perfect hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub mul: U256,
    pub modulus: U256,
}

impl HashParams {
    pub fn new(mul: U256, modulus: U256) -> Self {
        Self { mul, modulus }
    }
}

impl Default for HashParams {
    /// Identity hash: the bucket is the asset's low bits.
    fn default() -> Self {
        Self {
            mul: U256::from(1u64),
            modulus: U256::MAX,
        }
    }
}

// ============================================================================
// Funding
// ============================================================================

/// Offline authorization for a signature-authorized pull.
///
/// The signature is a SHA-256 commitment over the payer's secret and the
/// pull terms; the funding collaborator holds the matching secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingAuthorization {
    /// Maximum amount the payer authorizes
    pub amount: U256,
    /// Replay-protection nonce
    pub nonce: u64,
    /// Commitment over (secret, asset, payer, amount, nonce)
    pub signature: [u8; 32],
}

impl FundingAuthorization {
    /// Sign pull terms with `secret`.
    pub fn sign(secret: &[u8], asset: Address, payer: Address, amount: U256, nonce: u64) -> Self {
        Self {
            amount,
            nonce,
            signature: Self::digest(secret, asset, payer, amount, nonce),
        }
    }

    /// Check the signature against `secret` for the given asset and payer.
    pub fn verify(&self, secret: &[u8], asset: Address, payer: Address) -> bool {
        Self::digest(secret, asset, payer, self.amount, self.nonce) == self.signature
    }

    fn digest(secret: &[u8], asset: Address, payer: Address, amount: U256, nonce: u64) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(secret);
        hasher.update(asset.as_slice());
        hasher.update(payer.as_slice());
        hasher.update(amount.to_be_bytes::<32>());
        hasher.update(nonce.to_be_bytes());
        hasher.finalize().into()
    }
}

/// Where the funding asset comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FundingMode {
    /// The engine already holds the funding asset; sell `bps` of its holding.
    SelfFunded { bps: u16 },
    /// Pull from `payer` under an offline authorization.
    Authorized {
        payer: Address,
        authorization: FundingAuthorization,
    },
    /// Pull `amount` from `payer` against a standing allowance.
    PreApproved { payer: Address, amount: U256 },
}

impl FundingMode {
    /// Account that ultimately pays, given the engine's own address.
    pub fn payer(&self, engine: Address) -> Address {
        match self {
            FundingMode::SelfFunded { .. } => engine,
            FundingMode::Authorized { payer, .. } | FundingMode::PreApproved { payer, .. } => *payer,
        }
    }

    #[inline]
    pub fn is_self_funded(&self) -> bool {
        matches!(self, FundingMode::SelfFunded { .. })
    }
}

// ============================================================================
// Operation context
// ============================================================================

/// Everything one netting operation needs.
///
/// ## Example
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use hop_netting::types::{FundingMode, OperationContext};
///
/// let ctx = OperationContext::new(
///     Address::with_last_byte(0xaa),      // recipient
///     Address::with_last_byte(0x01),      // funding asset
///     FundingMode::SelfFunded { bps: 10_000 },
///     Vec::new(),                         // hop stream
/// )
/// .with_min_buy_amount(U256::from(1_000u64));
///
/// assert_eq!(ctx.min_buy_amount, U256::from(1_000u64));
/// assert!(!ctx.fee_on_transfer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    /// Receives the final buy asset
    pub recipient: Address,
    /// Funding (global sell) asset
    pub sell_asset: Address,
    /// Minimum acceptable settled buy amount
    pub min_buy_amount: U256,
    /// Ledger hash parameters
    pub hash: HashParams,
    /// Whether the funding asset may deduct a fee in transit
    pub fee_on_transfer: bool,
    /// Funding source
    pub funding: FundingMode,
    /// Encoded hop stream
    pub route: Vec<u8>,
}

impl OperationContext {
    pub fn new(recipient: Address, sell_asset: Address, funding: FundingMode, route: Vec<u8>) -> Self {
        Self {
            recipient,
            sell_asset,
            min_buy_amount: U256::ZERO,
            hash: HashParams::default(),
            fee_on_transfer: false,
            funding,
            route,
        }
    }

    pub fn with_min_buy_amount(mut self, min_buy_amount: U256) -> Self {
        self.min_buy_amount = min_buy_amount;
        self
    }

    pub fn with_hash_params(mut self, hash: HashParams) -> Self {
        self.hash = hash;
        self
    }

    pub fn with_fee_on_transfer(mut self, fee_on_transfer: bool) -> Self {
        self.fee_on_transfer = fee_on_transfer;
        self
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
