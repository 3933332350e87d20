//! Pair data fetcher.
//!
//! Two sequential aggregator rounds: the pair's own fields first, then the
//! metadata of the two tokens discovered in round one. Round two cannot start
//! earlier - the token addresses are unknown until round one decodes. Any
//! failure aborts the whole fetch; a partial snapshot is never returned.

use crate::abi::{IUniswapV2Pair, IERC20, LP_TOKEN_DECIMALS};
use crate::error::FetchError;
use crate::format::format_units;
use crate::multicall::{ContractCall, MulticallClient, Transport};
use crate::types::{FormattedReserves, PairSnapshot, Prices, Reserves, Token, TotalSupply};

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use std::time::Instant;
use tracing::debug;

/// Validate a user-entered pair address. Hex parsing is checksum-insensitive;
/// anything that is not 20 bytes of hex fails before any network interaction.
pub fn parse_pair_address(input: &str) -> Result<Address, FetchError> {
    input
        .trim()
        .parse::<Address>()
        .map_err(|_| FetchError::InvalidAddress(input.trim().to_string()))
}

pub struct PairFetcher<T> {
    client: MulticallClient<T>,
}

impl<T: Transport> PairFetcher<T> {
    pub fn new(client: MulticallClient<T>) -> Self {
        Self { client }
    }

    /// Fetch and normalize the full state of a pair from a user-entered
    /// address string.
    pub async fn fetch_pair(&self, input: &str) -> Result<PairSnapshot, FetchError> {
        let pair = parse_pair_address(input)?;
        self.fetch(pair).await
    }

    async fn fetch(&self, pair: Address) -> Result<PairSnapshot, FetchError> {
        let started = Instant::now();

        // Round 1: pair-level fields.
        let round1 = self
            .client
            .aggregate(vec![
                call(pair, IUniswapV2Pair::token0Call {}),
                call(pair, IUniswapV2Pair::token1Call {}),
                call(pair, IUniswapV2Pair::getReservesCall {}),
                call(pair, IUniswapV2Pair::totalSupplyCall {}),
            ])
            .await?;

        let token0_addr = decode::<IUniswapV2Pair::token0Call>(&round1.return_data[0], "token0")?;
        let token1_addr = decode::<IUniswapV2Pair::token1Call>(&round1.return_data[1], "token1")?;
        let reserves_ret =
            decode::<IUniswapV2Pair::getReservesCall>(&round1.return_data[2], "getReserves")?;
        let total_supply_raw =
            decode::<IUniswapV2Pair::totalSupplyCall>(&round1.return_data[3], "totalSupply")?;

        // Round 2: metadata for the two tokens discovered above.
        let round2 = self
            .client
            .aggregate(vec![
                call(token0_addr, IERC20::nameCall {}),
                call(token0_addr, IERC20::symbolCall {}),
                call(token0_addr, IERC20::decimalsCall {}),
                call(token1_addr, IERC20::nameCall {}),
                call(token1_addr, IERC20::symbolCall {}),
                call(token1_addr, IERC20::decimalsCall {}),
            ])
            .await?;

        let token0 = decode_token(token0_addr, &round2.return_data[..3])?;
        let token1 = decode_token(token1_addr, &round2.return_data[3..])?;

        let reserve0 = reserves_ret.reserve0.to::<u128>();
        let reserve1 = reserves_ret.reserve1.to::<u128>();

        // Each reserve shifts by its own token's decimals; the LP supply
        // always shifts by 18.
        let reserves = Reserves {
            reserve0,
            reserve1,
            block_timestamp_last: reserves_ret.blockTimestampLast,
            formatted: FormattedReserves {
                reserve0: format_units(U256::from(reserve0), token0.decimals),
                reserve1: format_units(U256::from(reserve1), token1.decimals),
            },
        };
        let total_supply = TotalSupply {
            raw: total_supply_raw,
            formatted: format_units(total_supply_raw, LP_TOKEN_DECIMALS),
        };

        let prices = spot_prices(reserve0, reserve1, token0.decimals, token1.decimals)?;

        debug!(
            %pair,
            block = ?round1.block_number,
            elapsed = ?started.elapsed(),
            "pair snapshot assembled"
        );

        Ok(PairSnapshot {
            pair_address: pair,
            block_number: round1.block_number,
            token0,
            token1,
            reserves,
            total_supply,
            prices,
        })
    }
}

fn call<C: SolCall>(target: Address, c: C) -> ContractCall {
    ContractCall {
        target,
        call_data: c.abi_encode().into(),
    }
}

fn decode<C: SolCall>(data: &Bytes, context: &'static str) -> Result<C::Return, FetchError> {
    C::abi_decode_returns(data).map_err(|_| FetchError::Decode { context })
}

fn decode_token(address: Address, slots: &[Bytes]) -> Result<Token, FetchError> {
    Ok(Token {
        address,
        name: decode::<IERC20::nameCall>(&slots[0], "name")?,
        symbol: decode::<IERC20::symbolCall>(&slots[1], "symbol")?,
        decimals: decode::<IERC20::decimalsCall>(&slots[2], "decimals")?,
    })
}

/// Spot prices from the reserve ratio after per-token decimal adjustment.
///
/// f64 is fine for display magnitudes; the exact raw integers travel in the
/// snapshot alongside. A zero reserve makes the ratio undefined.
fn spot_prices(
    reserve0: u128,
    reserve1: u128,
    decimals0: u8,
    decimals1: u8,
) -> Result<Prices, FetchError> {
    if reserve0 == 0 || reserve1 == 0 {
        return Err(FetchError::UndefinedPrice);
    }
    let adjusted0 = reserve0 as f64 / 10f64.powi(decimals0 as i32);
    let adjusted1 = reserve1 as f64 / 10f64.powi(decimals1 as i32);
    Ok(Prices {
        price0: adjusted1 / adjusted0,
        price1: adjusted0 / adjusted1,
    })
}
