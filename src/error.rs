//! Error types for the netting engine.
//!
//! Every variant is fatal to the operation that raised it: the state
//! machine never recovers locally, it resets and hands the error to the
//! caller. Collaborator failures are wrapped so `?` composes across the
//! venue and funding seams.

use alloy_primitives::{Address, Selector, I256, U256};
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, NettingError>;

/// Faults raised while decoding the hop stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Fewer bytes remain than the next field needs.
    #[error("hop stream truncated reading {field}: need {needed} bytes, {remaining} remain")]
    Truncated {
        field: &'static str,
        needed: usize,
        remaining: usize,
    },

    /// Case code outside 0..=3.
    #[error("unknown hop case {0}")]
    UnknownCase(u8),

    /// Share above 10_000 bps.
    #[error("hop share {0} bps exceeds 10000")]
    InvalidShare(u16),

    /// Case 0 used before any buy asset was chosen.
    #[error("hop reuses the previous buy asset but none was set")]
    MissingBuyAsset,
}

/// Faults raised by a venue implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VenueError {
    #[error("venue is not unlocked")]
    Locked,

    #[error("venue is already unlocked")]
    AlreadyUnlocked,

    #[error("no pool for {asset0}/{asset1} fee {fee}")]
    PoolNotFound {
        asset0: Address,
        asset1: Address,
        fee: u32,
    },

    #[error("pool already registered")]
    DuplicatePool,

    #[error("asset {asset} left unsettled with delta {delta}")]
    CurrencyNotSettled { asset: Address, delta: I256 },

    #[error("{owner} holds {available} of {asset}, needs {needed}")]
    InsufficientBalance {
        asset: Address,
        owner: Address,
        needed: U256,
        available: U256,
    },

    #[error("settle called without a prior sync")]
    NotSynced,

    #[error("amount {0} outside the venue's quoting range")]
    QuoteOutOfRange(U256),
}

/// Faults raised by a funding collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FundingError {
    #[error("authorization signature does not match")]
    InvalidSignature,

    #[error("authorization nonce {nonce} already used by {payer}")]
    NonceReused { payer: Address, nonce: u64 },

    #[error("authorization covers {authorized}, pull requested {requested}")]
    AmountExceedsAuthorization { authorized: U256, requested: U256 },

    #[error("allowance {allowance} below requested {requested}")]
    InsufficientAllowance { allowance: U256, requested: U256 },

    #[error("no signing key registered for {0}")]
    UnknownPayer(Address),

    #[error(transparent)]
    Bank(#[from] VenueError),
}

/// Top-level error for one netting operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NettingError {
    /// Two distinct assets hashed into the same ledger bucket.
    #[error("hash collision: bucket holds {old}, cannot place {new}")]
    HashCollision { old: Address, new: Address },

    /// The null asset identifier was used.
    #[error("zero asset identifier")]
    ZeroAsset,

    /// Hash modulus of zero.
    #[error("hash modulus must be nonzero")]
    InvalidHashModulus,

    /// The route acquired the operation's own funding asset.
    #[error("route buys its own funding asset {0}")]
    BoughtFundingAsset(Address),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Settled buy amount is below the caller's minimum.
    #[error("slippage exceeded: wanted at least {min}, settled {actual}")]
    SlippageExceeded { min: U256, actual: U256 },

    /// A callback token is already armed for another caller.
    #[error("callback already armed for {0}")]
    ReentrantCallback(Address),

    /// Callback arrived from the wrong caller or with the wrong selector.
    #[error("confused callback: expected {expected_caller}/{expected_selector}, got {caller}/{selector}")]
    ConfusedCallback {
        expected_caller: Address,
        expected_selector: Selector,
        caller: Address,
        selector: Selector,
    },

    /// Callback arrived with no armed token.
    #[error("callback not armed")]
    CallbackNotArmed,

    /// The venue returned without ever calling back.
    #[error("callback for {0} was never consumed")]
    OperatorNotSpent(Address),

    /// The operation would move no value.
    #[error("zero sell amount of {0}")]
    ZeroSellAmount(Address),

    /// An amount does not fit the signed 256-bit range.
    #[error("amount {0} exceeds the signed range")]
    AmountOverflow(U256),

    /// Applying a venue delta would drive a running balance negative.
    #[error("delta {delta} on {asset} underflows balance {balance}")]
    DeltaUnderflow {
        asset: Address,
        balance: U256,
        delta: I256,
    },

    /// The native asset can only fund self-funded operations.
    #[error("native asset cannot be pulled from a payer")]
    NativeFundingUnsupported,

    /// The venue's unlock return payload did not decode.
    #[error("malformed callback return payload")]
    MalformedReturn,

    #[error(transparent)]
    Venue(#[from] VenueError),

    #[error(transparent)]
    Funding(#[from] FundingError),
}
