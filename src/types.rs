//! Snapshot data model.
//!
//! Everything here is immutable once assembled and serializable for the
//! `--json` output mode. A snapshot is rebuilt from scratch on every query;
//! nothing is cached or persisted.

use alloy_primitives::{Address, U256};
use serde::Serialize;

/// ERC-20 metadata for one side of the pair.
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Decimal-adjusted display strings for the two reserves.
#[derive(Debug, Clone, Serialize)]
pub struct FormattedReserves {
    pub reserve0: String,
    pub reserve1: String,
}

/// Reserve snapshot as reported by `getReserves`.
///
/// Raw values are uint112 on-chain; u128 holds them exactly. The snapshot is
/// stale the moment it is taken - there are no live updates.
#[derive(Debug, Clone, Serialize)]
pub struct Reserves {
    pub reserve0: u128,
    pub reserve1: u128,
    pub block_timestamp_last: u32,
    pub formatted: FormattedReserves,
}

/// LP token supply, always scaled by 18 decimals.
#[derive(Debug, Clone, Serialize)]
pub struct TotalSupply {
    pub raw: U256,
    pub formatted: String,
}

/// Instantaneous spot prices derived from the reserve ratio.
///
/// price0 is the amount of token1 one token0 buys, and vice versa. This is a
/// display approximation, not a manipulation-resistant oracle read.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Prices {
    pub price0: f64,
    pub price1: f64,
}

/// The terminal artifact handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct PairSnapshot {
    pub pair_address: Address,
    /// Block the snapshot was read at. None when the tolerant batch mode is
    /// in use - `tryAggregate` does not report a block number.
    pub block_number: Option<u64>,
    pub token0: Token,
    pub token1: Token,
    pub reserves: Reserves,
    pub total_supply: TotalSupply,
    pub prices: Prices,
}
