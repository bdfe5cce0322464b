//! Settlement against the venue.
//!
//! - [`take`]: withdraw every intermediate credit to the engine and the
//!   final buy credit to the recipient, after the slippage check
//! - [`pay`]: pay the funding asset into the venue from the configured
//!   source and return the amount the venue recorded

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::config::NATIVE_ASSET;
use crate::error::{NettingError, Result};
use crate::ledger::AssetLedger;
use crate::types::FundingMode;
use crate::venue::{Funding, Venue};

/// Withdraw all credits recorded in `ledger`.
///
/// Order of work:
/// 1. untrack the final buy Note, and the funding Note if it is empty
/// 2. take every remaining nonzero credit to `engine`, skipping the
///    funding Note (it is paid or refunded separately)
/// 3. check the buy amount against `min_buy`
/// 4. take the buy credit to `recipient`
///
/// # Returns
///
/// The buy asset and the amount delivered to `recipient`.
///
/// # Errors
///
/// - `BoughtFundingAsset` if the funding Note survives anywhere but the
///   head of the tracked list
/// - `SlippageExceeded` if the buy credit is below `min_buy`
/// - any venue failure from `take`
pub fn take(
    venue: &mut dyn Venue,
    ledger: &mut AssetLedger,
    engine: Address,
    recipient: Address,
    min_buy: U256,
) -> Result<(Address, U256)> {
    let global_asset = ledger.global_sell_asset();
    let buy = ledger
        .buy()
        .ok_or(NettingError::ZeroSellAmount(global_asset))?;

    ledger.untrack(buy);
    let global = ledger.global_sell();
    if ledger.note(global).amount.is_zero() {
        ledger.untrack(global);
    }

    let swept: Vec<_> = ledger
        .tracked()
        .map(|(id, note)| (id, note.asset, note.amount))
        .collect();

    for (position, (id, asset, amount)) in swept.into_iter().enumerate() {
        if asset == global_asset {
            if position != 0 {
                return Err(NettingError::BoughtFundingAsset(asset));
            }
            continue;
        }
        if amount.is_zero() {
            continue;
        }
        venue.take(asset, engine, amount)?;
        ledger.note_mut(id).amount = U256::ZERO;
        debug!(%asset, %amount, "swept intermediate credit");
    }

    let buy_note = ledger.note(buy);
    let (buy_asset, buy_amount) = (buy_note.asset, buy_note.amount);
    if buy_amount < min_buy {
        return Err(NettingError::SlippageExceeded {
            min: min_buy,
            actual: buy_amount,
        });
    }

    venue.take(buy_asset, recipient, buy_amount)?;
    debug!(%buy_asset, %buy_amount, %recipient, "delivered buy credit");
    Ok((buy_asset, buy_amount))
}

/// Pay `amount` of `asset` into the venue from the source `mode` names.
///
/// The native asset is paid by value and only from the engine's own
/// holdings. Everything else is synced, transferred, then settled, so
/// the returned amount is what the venue actually received.
pub fn pay(
    venue: &mut dyn Venue,
    funding: &mut dyn Funding,
    engine: Address,
    asset: Address,
    mode: &FundingMode,
    amount: U256,
) -> Result<U256> {
    if asset == NATIVE_ASSET {
        if !mode.is_self_funded() {
            return Err(NettingError::NativeFundingUnsupported);
        }
        return venue.settle(amount);
    }

    let venue_address = venue.address();
    venue.sync(asset)?;
    match mode {
        FundingMode::SelfFunded { .. } => {
            venue.bank().transfer(asset, engine, venue_address, amount)?;
        }
        FundingMode::Authorized { payer, authorization } => {
            funding.pull(venue.bank(), authorization, asset, *payer, venue_address, amount)?;
        }
        FundingMode::PreApproved { payer, .. } => {
            funding.pre_approved_transfer(venue.bank(), asset, *payer, engine, venue_address, amount)?;
        }
    }

    let recorded = venue.settle(U256::ZERO)?;
    debug!(%asset, %amount, %recorded, "paid funding asset");
    Ok(recorded)
}

// ============================================================================
// Unit Tests
// ============================================================================
