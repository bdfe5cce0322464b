//! Operation lifecycle.
//!
//! ```text
//!  Idle ──execute──▶ Authorized ──callback──▶ Executing ──▶ Settling ──▶ Idle
//!    ▲                   │                        │             │
//!    └──────────────── any failure: reset, clear slot ◀─────────┘
//! ```
//!
//! `execute` arms the callback slot for the venue, then asks the venue to
//! unlock. The venue calls [`UnlockCallback::unlock_callback`], which
//! consumes the slot and runs the route:
//!
//! 1. Work out the funding amount. In fee-on-transfer mode pay it into
//!    the venue up front and use what the venue recorded.
//! 2. Decode and execute hops until the stream is exhausted, applying
//!    each exchange's deltas to the ledger.
//! 3. Take all credits out ([`settlement::take`]).
//! 4. Pay the funding debt, or refund unspent credit in fee-on-transfer
//!    mode.
//!
//! The receipt travels back through the venue as SSZ bytes.

use alloy_primitives::{Address, Selector, U256};
use tracing::{debug, info, warn};

use crate::config::{EngineConfig, BASIS_POINTS, UNLOCK_CALLBACK_SELECTOR};
use crate::engine::callback::{CallbackAuthorization, Continuation};
use crate::engine::settlement;
use crate::error::{DecodeError, NettingError, Result};
use crate::ledger::AssetLedger;
use crate::route::{decode_next, RouteCursor};
use crate::types::amount::{apply_delta, apply_share};
use crate::types::{FundingMode, Hop, OperationContext, SwapReceipt};
use crate::venue::{Funding, UnlockCallback, Venue};

/// Lifecycle phase of the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No operation in flight.
    #[default]
    Idle,
    /// Callback armed, waiting for the venue.
    Authorized,
    /// Inside the callback, running hops.
    Executing,
    /// Hops done, settling credits and debt.
    Settling,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Authorized => "authorized",
            Phase::Executing => "executing",
            Phase::Settling => "settling",
        }
    }
}

/// Drives one netting operation at a time against a [`Venue`].
///
/// ## Example
///
/// ```
/// use alloy_primitives::{Address, U256};
/// use rust_decimal::Decimal;
/// use hop_netting::config::EngineConfig;
/// use hop_netting::engine::SwapStateMachine;
/// use hop_netting::route::RouteBuilder;
/// use hop_netting::types::{FundingMode, OperationContext, PoolKey, PoolParams};
/// use hop_netting::venue::{AssetBank, MemoryFunding, MemoryVenue, Quote};
///
/// let (a, b) = (Address::with_last_byte(1), Address::with_last_byte(2));
/// let user = Address::with_last_byte(0xaa);
/// let config = EngineConfig::default();
///
/// let venue_id = Address::with_last_byte(0xee);
/// let mut venue = MemoryVenue::new(venue_id);
/// venue.add_pool(PoolKey::new(a, b, PoolParams::default()), Quote::rate(Decimal::TWO)).unwrap();
/// venue.bank_mut().mint(b, venue_id, U256::from(1_000u64));
/// venue.bank_mut().mint(a, config.address, U256::from(100u64));
///
/// let route = RouteBuilder::new().new_buy(10_000, b, PoolParams::default(), b"").build();
/// let ctx = OperationContext::new(user, a, FundingMode::SelfFunded { bps: 10_000 }, route);
///
/// let mut engine = SwapStateMachine::new(config, MemoryFunding::new());
/// let receipt = engine.execute(&mut venue, ctx).unwrap();
///
/// assert_eq!(receipt.buy_amount(), U256::from(200u64));
/// assert_eq!(venue.bank_ref().balance_of(b, user), U256::from(200u64));
/// ```
#[derive(Debug)]
pub struct SwapStateMachine<F> {
    config: EngineConfig,
    funding: F,
    authorization: CallbackAuthorization,
    phase: Phase,
    pending: Option<OperationContext>,
}

impl<F: Funding + Clone> SwapStateMachine<F> {
    pub fn new(config: EngineConfig, funding: F) -> Self {
        Self {
            config,
            funding,
            authorization: CallbackAuthorization::new(),
            phase: Phase::Idle,
            pending: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn authorization(&self) -> &CallbackAuthorization {
        &self.authorization
    }

    pub fn funding(&self) -> &F {
        &self.funding
    }

    pub fn funding_mut(&mut self) -> &mut F {
        &mut self.funding
    }

    /// Run one operation to completion.
    ///
    /// On success every credit has been taken out of the venue and the
    /// funding debt paid. On failure the venue rolls back its own state, the
    /// funding collaborator is restored to its state before the call (used
    /// nonces and allowances included) and the machine returns to
    /// [`Phase::Idle`] with an empty callback slot.
    ///
    /// # Errors
    ///
    /// - `ReentrantCallback` if an operation is already in flight
    /// - `OperatorNotSpent` if the venue returned without calling back
    /// - `MalformedReturn` if the callback payload cannot be decoded
    /// - any decode, ledger, settlement, venue or funding error raised
    ///   inside the callback
    pub fn execute(&mut self, venue: &mut dyn Venue, context: OperationContext) -> Result<SwapReceipt> {
        if let Some(token) = self.authorization.armed() {
            return Err(NettingError::ReentrantCallback(token.caller));
        }
        if self.phase != Phase::Idle {
            return Err(NettingError::ReentrantCallback(venue.address()));
        }

        info!(
            sell = %context.sell_asset,
            recipient = %context.recipient,
            route_len = context.route.len(),
            fee_on_transfer = context.fee_on_transfer,
            "netting operation started"
        );

        let saved_funding = self.funding.clone();
        let outcome = self.run(venue, context);

        if let Err(err) = &outcome {
            warn!(%err, phase = self.phase.as_str(), "netting operation aborted");
            self.authorization.clear();
            self.funding = saved_funding;
        }
        self.pending = None;
        self.phase = Phase::Idle;
        outcome
    }

    fn run(&mut self, venue: &mut dyn Venue, context: OperationContext) -> Result<SwapReceipt> {
        let caller = venue.address();
        self.authorization
            .arm(caller, UNLOCK_CALLBACK_SELECTOR, Continuation::SettleRoute)?;

        let payload = context.route.clone();
        self.pending = Some(context);
        self.phase = Phase::Authorized;

        let locker = self.config.address;
        let returned = venue.unlock(locker, self, &payload)?;
        self.authorization.assert_spent()?;

        let receipt: SwapReceipt =
            ssz_rs::deserialize(&returned).map_err(|_| NettingError::MalformedReturn)?;

        info!(
            buy = %receipt.buy_asset(),
            buy_amount = %receipt.buy_amount(),
            sell_spent = %receipt.sell_spent(),
            hops = receipt.hops,
            "netting operation settled"
        );
        Ok(receipt)
    }

    /// Funding amount the caller committed, before any transfer fee
    fn nominal_amount(&self, venue: &mut dyn Venue, context: &OperationContext) -> Result<U256> {
        match &context.funding {
            FundingMode::SelfFunded { bps } => {
                if *bps > BASIS_POINTS {
                    return Err(DecodeError::InvalidShare(*bps).into());
                }
                let held = venue.bank().balance_of(context.sell_asset, self.config.address);
                Ok(apply_share(held, *bps))
            }
            FundingMode::Authorized { authorization, .. } => Ok(authorization.amount),
            FundingMode::PreApproved { amount, .. } => Ok(*amount),
        }
    }

    /// Fund, execute and settle the pending route
    fn settle_route(
        &mut self,
        venue: &mut dyn Venue,
        context: &OperationContext,
        route: &[u8],
    ) -> Result<SwapReceipt> {
        self.phase = Phase::Executing;
        let engine = self.config.address;
        let sell_asset = context.sell_asset;

        let mut ledger = AssetLedger::new(sell_asset, context.hash)?;

        let nominal = self.nominal_amount(venue, context)?;
        let received = if context.fee_on_transfer && !nominal.is_zero() {
            settlement::pay(venue, &mut self.funding, engine, sell_asset, &context.funding, nominal)?
        } else {
            nominal
        };
        if received.is_zero() {
            return Err(NettingError::ZeroSellAmount(sell_asset));
        }

        let global = ledger.global_sell();
        ledger.note_mut(global).amount = received;
        ledger.set_global_sell_amount(received);
        debug!(%sell_asset, %nominal, %received, "funding recorded");

        let mut cursor = RouteCursor::new(route);
        let mut hops = 0u64;
        while cursor.has_hop() {
            let hop = decode_next(&mut cursor, &mut ledger)?;
            Self::execute_hop(venue, &mut ledger, &hop)?;
            hops += 1;
        }
        if hops == 0 {
            return Err(NettingError::ZeroSellAmount(sell_asset));
        }

        self.phase = Phase::Settling;
        let (buy_asset, buy_amount) = settlement::take(
            venue,
            &mut ledger,
            engine,
            context.recipient,
            context.min_buy_amount,
        )?;

        let residual = ledger.note(global).amount;
        let spent = if context.fee_on_transfer {
            let consumed = received.saturating_sub(residual);
            if consumed.is_zero() {
                return Err(NettingError::ZeroSellAmount(sell_asset));
            }
            if !residual.is_zero() {
                let payer = context.funding.payer(engine);
                venue.take(sell_asset, payer, residual)?;
                debug!(%sell_asset, %residual, %payer, "refunded unspent funding");
            }
            consumed
        } else {
            let debt = ledger.global_sell_amount().saturating_sub(residual);
            if debt.is_zero() {
                return Err(NettingError::ZeroSellAmount(sell_asset));
            }
            settlement::pay(venue, &mut self.funding, engine, sell_asset, &context.funding, debt)?;
            debt
        };

        Ok(SwapReceipt::new(
            sell_asset,
            buy_asset,
            context.recipient,
            nominal,
            received,
            spent,
            buy_amount,
            hops,
            route,
        ))
    }

    /// Exchange one hop's share of the sell Note and apply the deltas
    fn execute_hop(venue: &mut dyn Venue, ledger: &mut AssetLedger, hop: &Hop) -> Result<()> {
        let sell = ledger.sell();
        let buy = ledger.buy().ok_or(DecodeError::MissingBuyAsset)?;

        let amount_in = apply_share(ledger.note(sell).amount, hop.share_bps);
        let delta = venue.exchange(&hop.pool_key(), hop.zero_for_one, amount_in, &hop.hook_data)?;
        let (sell_delta, buy_delta) = delta.split(hop.zero_for_one);

        let balance = ledger.note(sell).amount;
        ledger.note_mut(sell).amount =
            apply_delta(balance, sell_delta).ok_or(NettingError::DeltaUnderflow {
                asset: hop.sell,
                balance,
                delta: sell_delta,
            })?;

        let balance = ledger.note(buy).amount;
        ledger.note_mut(buy).amount =
            apply_delta(balance, buy_delta).ok_or(NettingError::DeltaUnderflow {
                asset: hop.buy,
                balance,
                delta: buy_delta,
            })?;

        debug!(
            sell = %hop.sell,
            buy = %hop.buy,
            share_bps = hop.share_bps,
            %amount_in,
            %sell_delta,
            %buy_delta,
            "hop executed"
        );
        Ok(())
    }
}

impl<F: Funding + Clone> UnlockCallback for SwapStateMachine<F> {
    fn unlock_callback(
        &mut self,
        venue: &mut dyn Venue,
        caller: Address,
        selector: Selector,
        data: &[u8],
    ) -> Result<Vec<u8>> {
        match self.authorization.consume(caller, selector)? {
            Continuation::SettleRoute => {
                let context = self.pending.take().ok_or(NettingError::CallbackNotArmed)?;
                let receipt = self.settle_route(venue, &context, data)?;
                ssz_rs::serialize(&receipt).map_err(|_| NettingError::MalformedReturn)
            }
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
