//! Hop decoder.
//!
//! Decodes one hop record and moves the ledger's sell/buy pointers to the
//! hop's asset pair. Layout (big-endian):
//!
//! ```text
//! share u16 | case u8 | [sell 20B] | [buy 20B] | fee u24 | tick i24 | hook 20B | len u24 | payload
//!                        case 3      case 1-3
//! ```
//!
//! For cases 2 and 3 the outgoing sell Note is untracked first if its
//! balance is zero; only then does the sell pointer move.

use alloy_primitives::Address;

use crate::config::BASIS_POINTS;
use crate::error::{DecodeError, NettingError, Result};
use crate::ledger::AssetLedger;
use crate::route::RouteCursor;
use crate::types::{Hop, HopCase, PoolKey, PoolParams};

/// Decode the next hop at `cursor`, updating `ledger`'s route pointers.
///
/// # Errors
///
/// - `Decode(..)` for a short read, unknown case, share above 10_000 bps,
///   or a case that reuses a buy asset before one was set
/// - `HashCollision` / `ZeroAsset` from the ledger
/// - `BoughtFundingAsset` if the buy asset is the funding asset
pub fn decode_next(cursor: &mut RouteCursor<'_>, ledger: &mut AssetLedger) -> Result<Hop> {
    let share_bps = cursor.read_u16("share")?;
    if share_bps > BASIS_POINTS {
        return Err(DecodeError::InvalidShare(share_bps).into());
    }

    let raw_case = cursor.read_u8("case")?;
    let case = HopCase::from_u8(raw_case).ok_or(DecodeError::UnknownCase(raw_case))?;

    match case {
        HopCase::Continue => {
            if ledger.buy().is_none() {
                return Err(DecodeError::MissingBuyAsset.into());
            }
        }
        HopCase::NewBuy => {
            let buy = cursor.read_address("buy asset")?;
            resolve_buy(ledger, buy)?;
        }
        HopCase::Chain => {
            let buy = cursor.read_address("buy asset")?;
            let previous_buy = ledger.buy().ok_or(DecodeError::MissingBuyAsset)?;
            retire_sell(ledger);
            ledger.set_sell(previous_buy);
            resolve_buy(ledger, buy)?;
        }
        HopCase::Explicit => {
            let sell = cursor.read_address("sell asset")?;
            let buy = cursor.read_address("buy asset")?;
            retire_sell(ledger);
            let id = ledger.get_or_create(sell)?;
            ledger.track(id);
            ledger.set_sell(id);
            resolve_buy(ledger, buy)?;
        }
    }

    let pool = PoolParams {
        fee: cursor.read_u24("pool fee")?,
        tick_spacing: cursor.read_i24("tick spacing")?,
        hooks: cursor.read_address("hook")?,
    };
    let payload_len = cursor.read_u24("hook payload length")? as usize;
    let hook_data = cursor.take("hook payload", payload_len)?.to_vec();

    let sell = ledger.note(ledger.sell()).asset;
    let buy = ledger
        .buy()
        .map(|id| ledger.note(id).asset)
        .ok_or(DecodeError::MissingBuyAsset)?;

    Ok(Hop {
        share_bps,
        case,
        sell,
        buy,
        zero_for_one: PoolKey::zero_for_one(sell, buy),
        pool,
        hook_data,
    })
}

/// Drop the outgoing sell Note from the list once it carries no credit.
fn retire_sell(ledger: &mut AssetLedger) {
    let sell = ledger.sell();
    if ledger.note(sell).amount.is_zero() {
        ledger.untrack(sell);
    }
}

fn resolve_buy(ledger: &mut AssetLedger, buy: Address) -> Result<()> {
    if buy == ledger.global_sell_asset() {
        return Err(NettingError::BoughtFundingAsset(buy));
    }
    let id = ledger.get_or_create(buy)?;
    ledger.track(id);
    ledger.set_buy(id);
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
