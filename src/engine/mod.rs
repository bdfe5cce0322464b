//! Netting engine for Hop Netting.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **Atomicity**: An operation settles completely or leaves no trace
//! 2. **Netting**: Each asset is settled once, after every hop has run
//! 3. **Synchronous Execution**: The venue calls straight back into the engine
//! 4. **Exact Arithmetic**: 256-bit integers, no rounding beyond share floors
//!
//! ## Components
//!
//! - [`SwapStateMachine`]: Operation lifecycle and hop execution
//! - [`CallbackAuthorization`]: One-shot guard for the venue callback
//! - [`settlement`]: Credit withdrawal and funding payment
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::{Address, U256};
//! use rust_decimal::Decimal;
//! use hop_netting::config::EngineConfig;
//! use hop_netting::engine::{Phase, SwapStateMachine};
//! use hop_netting::route::RouteBuilder;
//! use hop_netting::types::{FundingMode, OperationContext, PoolKey, PoolParams};
//! use hop_netting::venue::{MemoryFunding, MemoryVenue, Quote};
//!
//! let (a, b, c) = (Address::with_last_byte(1), Address::with_last_byte(2), Address::with_last_byte(3));
//! let venue_id = Address::with_last_byte(0xee);
//! let config = EngineConfig::default();
//!
//! let mut venue = MemoryVenue::new(venue_id);
//! venue.add_pool(PoolKey::new(a, b, PoolParams::default()), Quote::rate(Decimal::ONE)).unwrap();
//! venue.add_pool(PoolKey::new(b, c, PoolParams::default()), Quote::rate(Decimal::ONE)).unwrap();
//! venue.bank_mut().mint(b, venue_id, U256::from(1_000u64));
//! venue.bank_mut().mint(c, venue_id, U256::from(1_000u64));
//! venue.bank_mut().mint(a, config.address, U256::from(500u64));
//!
//! let route = RouteBuilder::new()
//!     .new_buy(10_000, b, PoolParams::default(), b"")
//!     .chain(10_000, c, PoolParams::default(), b"")
//!     .build();
//! let ctx = OperationContext::new(Address::with_last_byte(0xaa), a, FundingMode::SelfFunded { bps: 10_000 }, route);
//!
//! let mut engine = SwapStateMachine::new(config, MemoryFunding::new());
//! let receipt = engine.execute(&mut venue, ctx).unwrap();
//!
//! assert_eq!(receipt.hops, 2);
//! assert_eq!(receipt.buy_amount(), U256::from(500u64));
//! assert_eq!(engine.phase(), Phase::Idle);
//! ```

pub mod callback;
pub mod settlement;
pub mod state_machine;

pub use callback::{CallbackAuthorization, CallbackToken, Continuation};
pub use state_machine::{Phase, SwapStateMachine};
