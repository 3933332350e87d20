//! Diagnostic tool - offline configuration and call-data check
//!
//! Run with: cargo run --bin diagnose
//!
//! Verifies the environment without touching the network: effective settings,
//! address validity, and the exact call data a pair fetch would send.

use alloy_primitives::Address;
use alloy_sol_types::{sol, SolCall};
use std::env;
use std::str::FromStr;

sol! {
    interface IUniswapV2Pair {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function totalSupply() external view returns (uint256);
    }
}

const MULTICALL2: &str = "0x5BA1e12693Dc8F9c48aAD8770482f4739bEeD696";
const EXAMPLE_PAIR: &str = "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc";

fn main() {
    println!("🔍 PAIRLENS DIAGNOSTIC CHECK\n");

    // Load .env
    dotenvy::dotenv().ok();

    println!("═══════════════════════════════════════════════════");
    println!("                  CONFIGURATION                     ");
    println!("═══════════════════════════════════════════════════\n");

    let checks = [
        ("RPC_URL", "https://eth.llamarpc.com", "JSON-RPC endpoint"),
        ("CHAIN_ID", "1", "Target chain"),
        ("MULTICALL_ADDRESS", MULTICALL2, "Aggregator contract"),
        ("REQUEST_TIMEOUT_SECS", "10", "Per-request deadline"),
        ("BATCH_MODE", "fail_fast", "Batch failure semantics"),
    ];

    for (key, default, desc) in checks {
        let value = env::var(key).unwrap_or_else(|_| default.to_string());
        let marker = if env::var(key).is_err() {
            "(default)"
        } else {
            "(from .env)"
        };
        println!("  {}: {} {}", key, value, marker);
        println!("    └─ {}\n", desc);
    }

    println!("═══════════════════════════════════════════════════");
    println!("                 ADDRESS VALIDATION                 ");
    println!("═══════════════════════════════════════════════════\n");

    let aggregator = env::var("MULTICALL_ADDRESS").unwrap_or_else(|_| MULTICALL2.to_string());
    let aggregator_ok = Address::from_str(&aggregator).is_ok();
    println!(
        "  Aggregator:   {} {}",
        aggregator,
        if aggregator_ok { "✅" } else { "❌ not a valid address" }
    );
    println!("  Example pair: {} ✅\n", EXAMPLE_PAIR);

    println!("═══════════════════════════════════════════════════");
    println!("              ROUND 1 CALL DATA PREVIEW             ");
    println!("═══════════════════════════════════════════════════\n");

    let calls: [(&str, Vec<u8>); 4] = [
        ("token0()", IUniswapV2Pair::token0Call {}.abi_encode()),
        ("token1()", IUniswapV2Pair::token1Call {}.abi_encode()),
        ("getReserves()", IUniswapV2Pair::getReservesCall {}.abi_encode()),
        ("totalSupply()", IUniswapV2Pair::totalSupplyCall {}.abi_encode()),
    ];

    for (signature, data) in &calls {
        println!(
            "  {:<14} selector 0x{}  ({} bytes)",
            signature,
            hex::encode(&data[..4]),
            data.len()
        );
    }

    println!("\n  These 4 calls go out as one aggregate batch; the 6");
    println!("  token-metadata calls follow in a second batch once the");
    println!("  token addresses are known.");

    println!("\n🎉 Diagnostic complete (no network calls made).");
}
