//! Hop Netting - Demo Binary
//!
//! Runs a split two-leg route against an in-memory venue and prints the
//! settled receipt. Set `RUST_LOG=debug` to see per-hop deltas.

use alloy_primitives::{Address, U256};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use hop_netting::config::EngineConfig;
use hop_netting::route::RouteBuilder;
use hop_netting::types::amount::{format_units, share_to_percent};
use hop_netting::types::{FundingMode, OperationContext, PoolKey, PoolParams};
use hop_netting::venue::{AssetBank, MemoryFunding, MemoryVenue, Quote};
use hop_netting::{Result, SwapStateMachine};

const DECIMALS: u32 = 6;

fn units(whole: u64) -> U256 {
    U256::from(whole) * U256::from(10u64.pow(DECIMALS))
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    println!("===========================================");
    println!("  Hop Netting - multi-hop netting demo");
    println!("===========================================");
    println!();

    let usdc = Address::with_last_byte(0x01);
    let weth = Address::with_last_byte(0x02);
    let dai = Address::with_last_byte(0x03);
    let user = Address::with_last_byte(0xaa);
    let venue_id = Address::with_last_byte(0xee);
    let config = EngineConfig::default();

    let low_fee = PoolParams {
        fee: 500,
        tick_spacing: 10,
        hooks: Address::ZERO,
    };
    let high_fee = PoolParams {
        fee: 3_000,
        tick_spacing: 60,
        hooks: Address::ZERO,
    };

    let mut venue = MemoryVenue::new(venue_id);
    venue.add_pool(PoolKey::new(usdc, weth, low_fee), Quote::rate(Decimal::new(5, 4)))?;
    venue.add_pool(PoolKey::new(usdc, weth, high_fee), Quote::rate(Decimal::new(49, 5)))?;
    venue.add_pool(PoolKey::new(weth, dai, low_fee), Quote::rate(Decimal::new(2_000, 0)))?;
    venue.bank_mut().mint(weth, venue_id, units(1_000));
    venue.bank_mut().mint(dai, venue_id, units(10_000_000));
    venue.bank_mut().mint(usdc, config.address, units(10_000));

    // USDC -> WETH across two pools (40/60), then all WETH -> DAI
    let route = RouteBuilder::new()
        .new_buy(4_000, weth, low_fee, b"")
        .continue_hop(10_000, high_fee, b"")
        .chain(10_000, dai, low_fee, b"")
        .build();

    println!("Route: {} bytes", route.len());
    println!("  leg 1: {}% of USDC via 0.05% pool", share_to_percent(4_000));
    println!("  leg 2: remaining USDC via 0.30% pool");
    println!("  leg 3: {}% of WETH to DAI", share_to_percent(10_000));
    println!();

    let ctx = OperationContext::new(user, usdc, FundingMode::SelfFunded { bps: 10_000 }, route)
        .with_min_buy_amount(units(9_000));

    let mut engine = SwapStateMachine::new(config, MemoryFunding::new());
    let receipt = engine.execute(&mut venue, ctx)?;

    println!("Receipt:");
    println!("  hops:       {}", receipt.hops);
    println!("  sold:       {} USDC", format_units(receipt.sell_spent(), DECIMALS));
    println!("  bought:     {} DAI", format_units(receipt.buy_amount(), DECIMALS));
    println!("  route hash: 0x{}", receipt.route_hash_hex());
    println!(
        "  recipient:  {} DAI",
        format_units(venue.bank_ref().balance_of(dai, user), DECIMALS)
    );

    match ssz_rs::serialize(&receipt) {
        Ok(bytes) => println!("  SSZ size:   {} bytes", bytes.len()),
        Err(e) => println!("  ERROR: failed to serialize receipt: {:?}", e),
    }

    Ok(())
}
