//! # Hop Netting
//!
//! Multi-asset netting engine for atomic multi-hop swaps against a single
//! liquidity venue.
//!
//! ## Architecture
//!
//! The crate consists of:
//! - **Types**: Hops, pool keys, operation context, receipts
//! - **Ledger**: Bounded perfect-hash map of per-asset credits
//! - **Route**: Decoder and encoder for the compact hop stream
//! - **Venue**: Collaborator traits plus in-memory implementations
//! - **Engine**: Callback guard, state machine and settlement
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical inputs settle to identical balances
//! 2. **Bounded Memory**: At most eight assets per operation, no per-hop allocation in the ledger
//! 3. **Net Settlement**: Intermediate assets never leave the venue mid-route
//! 4. **All or Nothing**: Any failure unwinds the whole operation

// ============================================================================
// Module declarations
// ============================================================================

/// Constants and engine configuration
pub mod config;

/// Error types
pub mod error;

/// Core data types: Hop, PoolKey, OperationContext, SwapReceipt
pub mod types;

/// Asset ledger: perfect-hash credit map
pub mod ledger;

/// Route codec: hop stream decoding and encoding
pub mod route;

/// Venue, bank and funding collaborators
pub mod venue;

/// Netting engine: state machine and settlement
pub mod engine;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::EngineConfig;
pub use engine::{CallbackAuthorization, Phase, SwapStateMachine};
pub use error::{NettingError, Result};
pub use ledger::{AssetLedger, Note, NoteId};
pub use route::{decode_next, RouteBuilder, RouteCursor};
pub use types::{FundingMode, Hop, HopCase, OperationContext, PoolKey, PoolParams, SwapReceipt};
pub use venue::{AssetBank, Funding, UnlockCallback, Venue};
