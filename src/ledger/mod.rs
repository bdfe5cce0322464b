//! Asset ledger: the per-operation record of credits held against the venue.
//!
//! ## Architecture
//!
//! The ledger is a bounded perfect-hash map with an enumerable index:
//!
//! - **Buckets**: eight fixed slots addressed by a caller-chosen hash
//! - **List**: dense array of tracked bucket indices
//! - **Backpointers**: each tracked Note knows its list position
//!
//! ## Components
//!
//! - [`Note`]: Running credit for one asset
//! - [`NoteId`]: Stable bucket handle for a Note
//! - [`AssetLedger`]: The map plus the route's sell/buy/funding pointers
//! - [`hash`]: Bucketing and off-line multiplier search
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | get_or_create | O(1) |
//! | track | O(1) |
//! | untrack | O(1) |
//! | sweep_all | O(n), n <= 8 |

pub mod asset_ledger;
pub mod hash;
pub mod note;

pub use asset_ledger::AssetLedger;
pub use note::{Note, NoteId};
