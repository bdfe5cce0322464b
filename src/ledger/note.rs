//! Note storage for the asset ledger.
//!
//! ## Design
//!
//! A `Note` is the running credit the engine holds against the venue for
//! one asset. Notes live in fixed hash buckets; the enumerable list only
//! stores bucket indices. Each tracked Note keeps a backpointer (`slot`)
//! to its own list position so it can be removed in O(1).
//!
//! ```text
//! buckets: [ -, A, -, C, -, -, B, - ]      list: [1, 6, 3]
//!               slot=0    slot=2  slot=1
//! ```

use alloy_primitives::{Address, U256};

/// Index of a Note's hash bucket.
///
/// Stable for the whole operation: buckets never move, only list
/// positions do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NoteId(pub(crate) usize);

impl NoteId {
    /// Bucket index
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Running credit for one asset during the active operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Note {
    /// Asset this Note tracks; zero while the bucket is free
    pub asset: Address,

    /// Net credit held against the venue
    pub amount: U256,

    /// Position in the ledger's enumerable list
    /// None if the Note is not currently tracked
    pub slot: Option<usize>,
}

impl Note {
    /// Create an untracked Note with zero credit
    ///
    /// # Example
    ///
    /// ```
    /// use alloy_primitives::Address;
    /// use hop_netting::ledger::Note;
    ///
    /// let note = Note::new(Address::with_last_byte(1));
    /// assert!(!note.is_tracked());
    /// assert!(note.amount.is_zero());
    /// ```
    #[inline]
    pub fn new(asset: Address) -> Self {
        Self {
            asset,
            amount: U256::ZERO,
            slot: None,
        }
    }

    /// Check if this Note is in the enumerable list
    #[inline]
    pub fn is_tracked(&self) -> bool {
        self.slot.is_some()
    }

    /// Check if the bucket holding this Note is unused
    #[inline]
    pub fn is_vacant(&self) -> bool {
        self.asset.is_zero()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
