//! Perfect-hash bucketing for the asset ledger.
//!
//! `bucket(asset) = (asset * mul mod modulus) mod 8`, with the product
//! taken at full 512-bit precision. Callers pick `(mul, modulus)` so the
//! assets of one route land in distinct buckets; [`find_perfect_hash`]
//! searches for such a multiplier off the hot path.

use alloy_primitives::{Address, U256};

use crate::config::LEDGER_CAPACITY;
use crate::types::HashParams;

/// Mersenne prime 2^61 - 1, a convenient modulus for searches.
pub const DEFAULT_HASH_MODULUS: u64 = (1 << 61) - 1;

/// Bucket index for `asset` under `params`.
///
/// `params.modulus` must be nonzero; the ledger rejects a zero modulus at
/// construction.
#[inline]
pub fn bucket(asset: Address, params: &HashParams) -> usize {
    let word = U256::from_be_slice(asset.as_slice());
    let mixed = word.mul_mod(params.mul, params.modulus);
    (mixed % U256::from(LEDGER_CAPACITY)).as_limbs()[0] as usize
}

/// Search multipliers `1..=attempts` for one that maps every distinct
/// asset in `assets` to its own bucket.
///
/// Returns `None` if more than [`LEDGER_CAPACITY`] distinct assets are
/// given or no multiplier in range works.
///
/// # Example
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use hop_netting::ledger::hash::{bucket, find_perfect_hash, DEFAULT_HASH_MODULUS};
///
/// let assets: Vec<Address> = (1..=8u8).map(|b| Address::repeat_byte(b)).collect();
/// let params = find_perfect_hash(&assets, U256::from(DEFAULT_HASH_MODULUS), 1_000_000).unwrap();
///
/// let mut seen = [false; 8];
/// for asset in &assets {
///     let b = bucket(*asset, &params);
///     assert!(!seen[b]);
///     seen[b] = true;
/// }
/// ```
pub fn find_perfect_hash(assets: &[Address], modulus: U256, attempts: u64) -> Option<HashParams> {
    if modulus.is_zero() {
        return None;
    }

    let mut distinct: Vec<Address> = assets.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    if distinct.len() > LEDGER_CAPACITY {
        return None;
    }

    (1..=attempts).map(U256::from).find_map(|mul| {
        let params = HashParams::new(mul, modulus);
        let mut occupied = 0u8;
        for asset in &distinct {
            let bit = 1u8 << bucket(*asset, &params);
            if occupied & bit != 0 {
                return None;
            }
            occupied |= bit;
        }
        Some(params)
    })
}

// ============================================================================
// Unit Tests
// ============================================================================
