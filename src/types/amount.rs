//! Amount arithmetic and formatting.
//!
//! ## Overview
//!
//! Running balances are unsigned 256-bit integers; venue deltas are signed
//! 256-bit integers. Every conversion between the two is checked.
//!
//! Hop shares are basis points: 10_000 bps is the whole running balance.
//! Share math floors and never overflows, even for `U256::MAX` balances.
//!
//! ## Examples
//!
//! ```
//! use alloy_primitives::U256;
//! use hop_netting::types::amount::{apply_share, format_units, parse_units};
//!
//! assert_eq!(apply_share(U256::from(1_000_000u64), 2_500), U256::from(250_000u64));
//!
//! let amount = parse_units("1.5", 6).unwrap();
//! assert_eq!(amount, U256::from(1_500_000u64));
//! assert_eq!(format_units(amount, 6), "1.5");
//! ```

use std::str::FromStr;

use alloy_primitives::{I256, U256};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::config::BASIS_POINTS;
use crate::error::{NettingError, Result};

/// Largest number of decimals accepted by [`parse_units`].
pub const MAX_DECIMALS: u32 = 18;

// ============================================================================
// Share and delta arithmetic
// ============================================================================

/// `floor(amount * bps / 10_000)` without intermediate overflow.
///
/// `bps` is expected to be at most 10_000; the decoder rejects larger
/// shares before this is reached.
pub fn apply_share(amount: U256, bps: u16) -> U256 {
    let basis = U256::from(BASIS_POINTS);
    let bps = U256::from(bps);
    let whole = amount / basis;
    let rest = amount % basis;
    whole * bps + rest * bps / basis
}

/// Convert an unsigned amount into the venue's signed delta range.
pub fn to_signed(amount: U256) -> Result<I256> {
    I256::try_from(amount).map_err(|_| NettingError::AmountOverflow(amount))
}

/// Apply a signed delta to a running balance.
///
/// Returns `None` if the result would be negative or overflow.
pub fn apply_delta(balance: U256, delta: I256) -> Option<U256> {
    if delta.is_negative() {
        balance.checked_sub(delta.unsigned_abs())
    } else {
        balance.checked_add(delta.into_raw())
    }
}

// ============================================================================
// Decimal helpers (display and parsing only)
// ============================================================================

/// Hop share as a percentage, e.g. `2_500` bps -> `25.00`.
pub fn share_to_percent(bps: u16) -> Decimal {
    Decimal::new(i64::from(bps), 2)
}

/// Parse a decimal string into base units with `decimals` places.
///
/// Returns `None` for negative, malformed or out-of-range input.
///
/// ```
/// use alloy_primitives::U256;
/// use hop_netting::types::amount::parse_units;
///
/// assert_eq!(parse_units("0.000001", 6), Some(U256::from(1u64)));
/// assert_eq!(parse_units("-1", 6), None);
/// ```
pub fn parse_units(s: &str, decimals: u32) -> Option<U256> {
    if decimals > MAX_DECIMALS {
        return None;
    }
    let decimal = Decimal::from_str(s).ok()?;
    if decimal.is_sign_negative() {
        return None;
    }
    let scaled = decimal.checked_mul(Decimal::from(10u64.pow(decimals)))?;
    scaled.round_dp(0).to_u128().map(U256::from)
}

/// Render base units as a trimmed decimal string.
///
/// Amounts too large for `Decimal` fall back to the raw integer.
pub fn format_units(amount: U256, decimals: u32) -> String {
    let decimal = u128::try_from(amount)
        .ok()
        .and_then(|raw| i128::try_from(raw).ok())
        .and_then(|raw| Decimal::try_from_i128_with_scale(raw, decimals).ok());

    match decimal {
        Some(d) => d.normalize().to_string(),
        None => amount.to_string(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
