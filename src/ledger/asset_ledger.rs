//! Bounded enumerable map from asset to running credit.
//!
//! ## Architecture
//!
//! - **Buckets**: `[Note; 8]`, addressed by the perfect hash
//! - **List**: `[NoteId; 8]` plus a length, the enumerable view
//! - **Backpointers**: every tracked Note stores its list position
//!
//! Nothing here allocates or resizes. Insert, lookup and removal are O(1).
//!
//! ## Pointers
//!
//! Besides the map, the ledger carries the route cursor's view of the
//! world: the current hop's `sell` and `buy` Notes and the operation's
//! `global_sell` (funding) Note with its fixed total amount.
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use hop_netting::ledger::AssetLedger;
//! use hop_netting::types::HashParams;
//!
//! let a = Address::with_last_byte(1);
//! let b = Address::with_last_byte(2);
//! let mut ledger = AssetLedger::new(a, HashParams::default()).unwrap();
//!
//! let id = ledger.get_or_create(b).unwrap();
//! ledger.track(id);
//! ledger.note_mut(id).amount = U256::from(500u64);
//!
//! assert_eq!(ledger.len(), 2);
//! assert_eq!(ledger.sweep_all(a).count(), 1);
//! ```

use alloy_primitives::{Address, U256};

use crate::config::LEDGER_CAPACITY;
use crate::error::{NettingError, Result};
use crate::ledger::hash::bucket;
use crate::ledger::{Note, NoteId};
use crate::types::HashParams;

/// Per-operation asset ledger.
#[derive(Debug, Clone)]
pub struct AssetLedger {
    /// Hash buckets
    notes: [Note; LEDGER_CAPACITY],

    /// Enumerable list of tracked buckets
    tracked: [NoteId; LEDGER_CAPACITY],

    /// Number of tracked Notes
    len: usize,

    /// Perfect-hash parameters
    hash: HashParams,

    /// Funding asset Note (never relocated)
    global_sell: NoteId,

    /// Fixed total amount of the funding asset
    global_sell_amount: U256,

    /// Current hop's outgoing asset
    sell: NoteId,

    /// Current hop's incoming asset (None before the first hop)
    buy: Option<NoteId>,
}

impl AssetLedger {
    /// Create a ledger seeded with the funding asset at list position 0.
    ///
    /// # Errors
    ///
    /// - `ZeroAsset` if `funding_asset` is the null identifier
    /// - `InvalidHashModulus` if `hash.modulus` is zero
    pub fn new(funding_asset: Address, hash: HashParams) -> Result<Self> {
        if hash.modulus.is_zero() {
            return Err(NettingError::InvalidHashModulus);
        }

        let mut ledger = Self {
            notes: [Note::default(); LEDGER_CAPACITY],
            tracked: [NoteId::default(); LEDGER_CAPACITY],
            len: 0,
            hash,
            global_sell: NoteId::default(),
            global_sell_amount: U256::ZERO,
            sell: NoteId::default(),
            buy: None,
        };

        let id = ledger.get_or_create(funding_asset)?;
        ledger.track(id);
        ledger.global_sell = id;
        ledger.sell = id;
        Ok(ledger)
    }

    // ========================================================================
    // Map operations
    // ========================================================================

    /// Bucket index for `asset` under this ledger's hash parameters
    #[inline]
    pub fn bucket(&self, asset: Address) -> usize {
        bucket(asset, &self.hash)
    }

    /// Find or initialise the Note for `asset`.
    ///
    /// The Note is not tracked by this call.
    ///
    /// # Errors
    ///
    /// - `ZeroAsset` for the null identifier
    /// - `HashCollision` if the bucket already holds a different asset
    pub fn get_or_create(&mut self, asset: Address) -> Result<NoteId> {
        if asset.is_zero() {
            return Err(NettingError::ZeroAsset);
        }

        let id = NoteId(self.bucket(asset));
        let note = &mut self.notes[id.0];

        if note.asset == asset {
            return Ok(id);
        }
        if note.is_vacant() {
            *note = Note::new(asset);
            return Ok(id);
        }
        Err(NettingError::HashCollision {
            old: note.asset,
            new: asset,
        })
    }

    /// Look up an asset's Note without creating one
    pub fn find(&self, asset: Address) -> Option<NoteId> {
        if asset.is_zero() {
            return None;
        }
        let id = NoteId(self.bucket(asset));
        (self.notes[id.0].asset == asset).then_some(id)
    }

    /// Append a Note to the enumerable list. No-op if already tracked.
    pub fn track(&mut self, id: NoteId) {
        if self.notes[id.0].is_tracked() {
            return;
        }
        // One list entry per bucket, so the list cannot overflow
        debug_assert!(self.len < LEDGER_CAPACITY);

        self.notes[id.0].slot = Some(self.len);
        self.tracked[self.len] = id;
        self.len += 1;
    }

    /// Remove a Note from the enumerable list by swap-and-pop.
    ///
    /// The last Note moves into the vacated position. No-op if the Note
    /// is not tracked. The Note keeps its bucket and amount.
    pub fn untrack(&mut self, id: NoteId) {
        let Some(slot) = self.notes[id.0].slot.take() else {
            return;
        };

        self.len -= 1;
        if slot != self.len {
            let last = self.tracked[self.len];
            self.tracked[slot] = last;
            self.notes[last.0].slot = Some(slot);
        }
    }

    /// Tracked Notes in list order
    pub fn tracked(&self) -> impl Iterator<Item = (NoteId, &Note)> + '_ {
        self.tracked[..self.len]
            .iter()
            .map(move |id| (*id, &self.notes[id.0]))
    }

    /// Tracked Notes in list order, skipping `except`
    pub fn sweep_all(&self, except: Address) -> impl Iterator<Item = (NoteId, &Note)> + '_ {
        self.tracked().filter(move |(_, note)| note.asset != except)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn note(&self, id: NoteId) -> &Note {
        &self.notes[id.0]
    }

    #[inline]
    pub fn note_mut(&mut self, id: NoteId) -> &mut Note {
        &mut self.notes[id.0]
    }

    /// Number of tracked Notes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        LEDGER_CAPACITY
    }

    #[inline]
    pub fn hash_params(&self) -> HashParams {
        self.hash
    }

    // ========================================================================
    // Route pointers
    // ========================================================================

    #[inline]
    pub fn sell(&self) -> NoteId {
        self.sell
    }

    #[inline]
    pub fn set_sell(&mut self, id: NoteId) {
        self.sell = id;
    }

    #[inline]
    pub fn buy(&self) -> Option<NoteId> {
        self.buy
    }

    #[inline]
    pub fn set_buy(&mut self, id: NoteId) {
        self.buy = Some(id);
    }

    #[inline]
    pub fn global_sell(&self) -> NoteId {
        self.global_sell
    }

    /// Funding asset identifier
    #[inline]
    pub fn global_sell_asset(&self) -> Address {
        self.notes[self.global_sell.0].asset
    }

    #[inline]
    pub fn global_sell_amount(&self) -> U256 {
        self.global_sell_amount
    }

    #[inline]
    pub fn set_global_sell_amount(&mut self, amount: U256) {
        self.global_sell_amount = amount;
    }

    // ========================================================================
    // Invariants
    // ========================================================================

    /// Check the list/backpointer invariants.
    ///
    /// Every tracked Note's `slot` equals its list position, tracked
    /// assets are non-null and distinct, and untracked buckets have no slot.
    pub fn is_consistent(&self) -> bool {
        if self.len > LEDGER_CAPACITY {
            return false;
        }

        let mut listed = [false; LEDGER_CAPACITY];
        for (position, id) in self.tracked[..self.len].iter().enumerate() {
            let note = &self.notes[id.0];
            if note.slot != Some(position) || note.is_vacant() || listed[id.0] {
                return false;
            }
            listed[id.0] = true;
        }

        self.notes
            .iter()
            .enumerate()
            .all(|(index, note)| listed[index] || note.slot.is_none())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Identity hash: bucket = last byte mod 8
    fn asset(b: u8) -> Address {
        Address::with_last_byte(b)
    }

    fn ledger() -> AssetLedger {
        AssetLedger::new(asset(1), HashParams::default()).unwrap()
    }

    #[test]
    fn test_ledger_new_seeds_funding() {
        let ledger = ledger();

        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.global_sell_asset(), asset(1));
        assert_eq!(ledger.sell(), ledger.global_sell());
        assert!(ledger.buy().is_none());
        assert_eq!(ledger.note(ledger.global_sell()).slot, Some(0));
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_ledger_keeps_searched_hash_params() {
        let params =
            crate::ledger::hash::find_perfect_hash(&[asset(1), asset(9)], U256::from(251u64), 1_000)
                .unwrap();
        let mut ledger = AssetLedger::new(asset(1), params).unwrap();

        assert_eq!(ledger.hash_params(), params);
        // 0x01 and 0x09 share a bucket under the identity hash
        let id = ledger.get_or_create(asset(9)).unwrap();
        assert_eq!(ledger.note(id).asset, asset(9));
    }

    #[test]
    fn test_ledger_new_rejects_zero_asset() {
        let err = AssetLedger::new(Address::ZERO, HashParams::default()).unwrap_err();
        assert_eq!(err, NettingError::ZeroAsset);
    }

    #[test]
    fn test_ledger_new_rejects_zero_modulus() {
        let params = HashParams::new(U256::from(1u64), U256::ZERO);
        let err = AssetLedger::new(asset(1), params).unwrap_err();
        assert_eq!(err, NettingError::InvalidHashModulus);
    }

    #[test]
    fn test_get_or_create_returns_same_note() {
        let mut ledger = ledger();

        let first = ledger.get_or_create(asset(2)).unwrap();
        ledger.note_mut(first).amount = U256::from(9u64);
        let second = ledger.get_or_create(asset(2)).unwrap();

        assert_eq!(first, second);
        assert_eq!(ledger.note(second).amount, U256::from(9u64));
        // Not tracked until asked
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_get_or_create_collision() {
        let mut ledger = ledger();
        ledger.get_or_create(asset(2)).unwrap();

        // 0x0a mod 8 == 2
        let err = ledger.get_or_create(asset(0x0a)).unwrap_err();
        assert_eq!(
            err,
            NettingError::HashCollision {
                old: asset(2),
                new: asset(0x0a),
            }
        );
    }

    #[test]
    fn test_get_or_create_zero_asset() {
        let mut ledger = ledger();
        assert_eq!(
            ledger.get_or_create(Address::ZERO).unwrap_err(),
            NettingError::ZeroAsset
        );
    }

    #[test]
    fn test_track_is_idempotent() {
        let mut ledger = ledger();
        let id = ledger.get_or_create(asset(2)).unwrap();

        ledger.track(id);
        ledger.track(id);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.note(id).slot, Some(1));
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_untrack_swaps_last_into_hole() {
        let mut ledger = ledger();
        let ids: Vec<NoteId> = (2..=4)
            .map(|b| {
                let id = ledger.get_or_create(asset(b)).unwrap();
                ledger.track(id);
                id
            })
            .collect();
        // list: [1, 2, 3, 4]

        ledger.untrack(ids[0]);
        // list: [1, 4, 3]

        assert_eq!(ledger.len(), 3);
        assert!(ledger.note(ids[0]).slot.is_none());
        assert_eq!(ledger.note(ids[2]).slot, Some(1));
        let order: Vec<Address> = ledger.tracked().map(|(_, n)| n.asset).collect();
        assert_eq!(order, vec![asset(1), asset(4), asset(3)]);
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_untrack_last_and_untracked() {
        let mut ledger = ledger();
        let id = ledger.get_or_create(asset(2)).unwrap();
        ledger.track(id);

        ledger.untrack(id);
        ledger.untrack(id);

        assert_eq!(ledger.len(), 1);
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_untrack_keeps_bucket() {
        let mut ledger = ledger();
        let id = ledger.get_or_create(asset(2)).unwrap();
        ledger.track(id);
        ledger.note_mut(id).amount = U256::from(5u64);

        ledger.untrack(id);

        assert_eq!(ledger.find(asset(2)), Some(id));
        assert_eq!(ledger.note(id).amount, U256::from(5u64));
        // The bucket still belongs to asset 2
        assert!(ledger.get_or_create(asset(0x0a)).is_err());
    }

    #[test]
    fn test_fill_to_capacity() {
        let mut ledger = ledger();
        for b in 2..=8 {
            let id = ledger.get_or_create(asset(b)).unwrap();
            ledger.track(id);
        }

        assert_eq!(ledger.len(), ledger.capacity());
        assert!(ledger.is_consistent());
    }

    #[test]
    fn test_sweep_all_skips_excluded() {
        let mut ledger = ledger();
        for b in 2..=3 {
            let id = ledger.get_or_create(asset(b)).unwrap();
            ledger.track(id);
        }

        let swept: Vec<Address> = ledger.sweep_all(asset(2)).map(|(_, n)| n.asset).collect();
        assert_eq!(swept, vec![asset(1), asset(3)]);
    }

    #[test]
    fn test_find() {
        let mut ledger = ledger();
        assert!(ledger.find(asset(2)).is_none());
        let id = ledger.get_or_create(asset(2)).unwrap();
        assert_eq!(ledger.find(asset(2)), Some(id));
        assert!(ledger.find(asset(0x0a)).is_none());
        assert!(ledger.find(Address::ZERO).is_none());
    }
}
