//! Randomised tests for the asset ledger.
//!
//! These tests verify:
//! 1. Backpointers match list positions after any track/untrack interleaving
//! 2. The list never exceeds eight entries
//! 3. Colliding assets always fail, never overwrite
//! 4. Seeded runs are deterministic
//!
//! ## Running
//!
//! ```bash
//! cargo test --release --test ledger_stress -- --nocapture
//! ```

use alloy_primitives::{Address, U256};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use hop_netting::config::LEDGER_CAPACITY;
use hop_netting::ledger::hash::{bucket, find_perfect_hash, DEFAULT_HASH_MODULUS};
use hop_netting::types::HashParams;
use hop_netting::{AssetLedger, NettingError, NoteId};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Operations per randomised run
const OPS_PER_RUN: usize = 10_000;

/// Independent seeds per property
const RUNS: u64 = 16;

/// Multipliers tried when searching for a perfect hash
const HASH_ATTEMPTS: u64 = 1_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn random_address(rng: &mut ChaCha8Rng) -> Address {
    let mut bytes = [0u8; 20];
    rng.fill(&mut bytes);
    bytes[0] |= 1; // never the zero address
    Address::from(bytes)
}

/// `count` distinct random assets plus hash params that separate them
fn random_assets(rng: &mut ChaCha8Rng, count: usize) -> (Vec<Address>, HashParams) {
    let assets: Vec<Address> = (0..count).map(|_| random_address(rng)).collect();
    let params = find_perfect_hash(&assets, U256::from(DEFAULT_HASH_MODULUS), HASH_ATTEMPTS)
        .expect("perfect hash within attempt budget");
    (assets, params)
}

fn assert_backpointers(ledger: &AssetLedger) {
    assert!(ledger.len() <= LEDGER_CAPACITY);
    for (position, (id, note)) in ledger.tracked().enumerate() {
        assert_eq!(note.slot, Some(position), "note {:?} out of place", id);
    }
    assert!(ledger.is_consistent());
}

/// Run random track/untrack operations and return the final list order
fn run_interleaving(seed: u64) -> Vec<Address> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let count = rng.gen_range(1..=LEDGER_CAPACITY);
    let (assets, params) = random_assets(&mut rng, count);

    let mut ledger = AssetLedger::new(assets[0], params).unwrap();
    let ids: Vec<NoteId> = assets
        .iter()
        .map(|a| ledger.get_or_create(*a).unwrap())
        .collect();

    for _ in 0..OPS_PER_RUN {
        let id = ids[rng.gen_range(0..ids.len())];
        if rng.gen_bool(0.5) {
            ledger.track(id);
        } else {
            ledger.untrack(id);
        }
        assert_backpointers(&ledger);
    }

    ledger.tracked().map(|(_, note)| note.asset).collect()
}

// ============================================================================
// PROPERTIES
// ============================================================================

#[test]
fn stress_backpointers_survive_interleaving() {
    for seed in 0..RUNS {
        run_interleaving(seed);
    }
}

#[test]
fn stress_interleaving_is_deterministic() {
    for seed in 0..RUNS {
        assert_eq!(run_interleaving(seed), run_interleaving(seed));
    }
}

#[test]
fn stress_full_ledger_tracks_all_eight() {
    let mut rng = ChaCha8Rng::seed_from_u64(0xfeed);
    let (assets, params) = random_assets(&mut rng, LEDGER_CAPACITY);

    let mut ledger = AssetLedger::new(assets[0], params).unwrap();
    for asset in &assets {
        let id = ledger.get_or_create(*asset).unwrap();
        ledger.track(id);
    }

    assert_eq!(ledger.len(), LEDGER_CAPACITY);
    assert_backpointers(&ledger);

    // Every further asset must collide with one of the eight
    for _ in 0..1_000 {
        let stranger = random_address(&mut rng);
        if assets.contains(&stranger) {
            continue;
        }
        let err = ledger.get_or_create(stranger).unwrap_err();
        assert!(matches!(err, NettingError::HashCollision { new, .. } if new == stranger));
    }
    assert_eq!(ledger.len(), LEDGER_CAPACITY);
}

#[test]
fn stress_collisions_never_overwrite() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let params = HashParams::new(U256::from(rng.gen_range(1u64..1_000)), U256::from(DEFAULT_HASH_MODULUS));

    for _ in 0..OPS_PER_RUN {
        let first = random_address(&mut rng);
        let second = random_address(&mut rng);
        if first == second || bucket(first, &params) != bucket(second, &params) {
            continue;
        }

        let mut ledger = AssetLedger::new(first, params).unwrap();
        let err = ledger.get_or_create(second).unwrap_err();

        assert_eq!(err, NettingError::HashCollision { old: first, new: second });
        let id = ledger.find(first).unwrap();
        assert_eq!(ledger.note(id).asset, first);
        assert!(ledger.find(second).is_none());
    }
}

#[test]
fn stress_untrack_then_retrack_keeps_amounts() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let (assets, params) = random_assets(&mut rng, 5);

    let mut ledger = AssetLedger::new(assets[0], params).unwrap();
    for (i, asset) in assets.iter().enumerate() {
        let id = ledger.get_or_create(*asset).unwrap();
        ledger.track(id);
        ledger.note_mut(id).amount = U256::from(i as u64 * 100);
    }

    for asset in &assets {
        let id = ledger.find(*asset).unwrap();
        ledger.untrack(id);
        ledger.track(id);
        assert_backpointers(&ledger);
    }

    for (i, asset) in assets.iter().enumerate() {
        let id = ledger.find(*asset).unwrap();
        assert_eq!(ledger.note(id).amount, U256::from(i as u64 * 100));
    }
    let funding = ledger.global_sell_asset();
    assert_eq!(ledger.sweep_all(funding).count(), 4);
}
