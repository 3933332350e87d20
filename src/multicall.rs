//! Multicall aggregator client.
//!
//! Packs a batch of read-only calls into one `eth_call` against the
//! Multicall2 contract and hands back the raw return bytes in input order.
//! Order is the sole correlation key: `return_data[i]` answers `calls[i]`.

use crate::abi::IMulticall2;
use crate::error::FetchError;

use alloy_primitives::{Address, Bytes};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// One read-only call: target contract plus selector-prefixed call data.
#[derive(Debug, Clone)]
pub struct ContractCall {
    pub target: Address,
    pub call_data: Bytes,
}

/// Raw batch result. `return_data` has the same length and order as the
/// submitted batch. `block_number` is absent on the tolerant path -
/// `tryAggregate` does not report one.
#[derive(Debug, Clone)]
pub struct AggregateResult {
    pub block_number: Option<u64>,
    pub return_data: Vec<Bytes>,
}

/// Batch failure semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchMode {
    /// `aggregate`: any single revert aborts the whole batch. The aggregator
    /// does not say which call failed.
    FailFast,

    /// `tryAggregate(requireSuccess: false)`: per-call success flags, so a
    /// revert is attributed to its batch index. The batch still fails as a
    /// whole - callers never see partial results.
    Tolerant,
}

impl Default for BatchMode {
    fn default() -> Self {
        BatchMode::FailFast
    }
}

impl std::fmt::Display for BatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchMode::FailFast => write!(f, "fail_fast"),
            BatchMode::Tolerant => write!(f, "tolerant"),
        }
    }
}

// ============================================
// TRANSPORT SEAM
// ============================================

/// One raw `eth_call` round trip. The production impl speaks HTTP JSON-RPC;
/// tests substitute a canned chain.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, FetchError> {
        (**self).call(to, data).await
    }
}

/// HTTP JSON-RPC transport with an explicit per-request deadline.
pub struct HttpTransport {
    rpc_url: String,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(rpc_url: String, timeout: Duration) -> Self {
        Self { rpc_url, timeout }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, FetchError> {
        let url = self
            .rpc_url
            .parse()
            .map_err(|e| FetchError::Transport(format!("invalid RPC URL: {e}")))?;
        let provider = ProviderBuilder::new().connect_http(url);

        let tx = TransactionRequest::default().to(to).input(data.into());

        let result = tokio::time::timeout(self.timeout, provider.call(tx))
            .await
            .map_err(|_| {
                FetchError::Transport(format!(
                    "request timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?;

        result.map_err(|e| {
            let msg = e.to_string();
            // An `aggregate` batch with a reverting call surfaces as an
            // execution revert from the node, not a transport failure.
            if msg.contains("revert") {
                FetchError::CallReverted { index: None }
            } else {
                FetchError::Transport(msg)
            }
        })
    }
}

// ============================================
// CLIENT
// ============================================

/// Batches calls through the aggregator contract in one round trip.
pub struct MulticallClient<T> {
    transport: T,
    aggregator: Address,
    mode: BatchMode,
}

impl<T: Transport> MulticallClient<T> {
    pub fn new(transport: T, aggregator: Address, mode: BatchMode) -> Self {
        Self {
            transport,
            aggregator,
            mode,
        }
    }

    /// Execute a batch. Requires at least one call; there is no local upper
    /// bound - the node's gas and response limits apply and surface as
    /// `Transport` errors.
    pub async fn aggregate(&self, calls: Vec<ContractCall>) -> Result<AggregateResult, FetchError> {
        if calls.is_empty() {
            return Err(FetchError::EmptyBatch);
        }

        let count = calls.len();
        let calls: Vec<IMulticall2::Call> = calls
            .into_iter()
            .map(|c| IMulticall2::Call {
                target: c.target,
                callData: c.call_data,
            })
            .collect();

        let started = Instant::now();
        let result = match self.mode {
            BatchMode::FailFast => self.aggregate_fail_fast(calls).await?,
            BatchMode::Tolerant => self.aggregate_tolerant(calls).await?,
        };

        if result.return_data.len() != count {
            return Err(FetchError::Decode {
                context: "aggregate batch",
            });
        }

        debug!(
            calls = count,
            block = ?result.block_number,
            elapsed = ?started.elapsed(),
            "multicall round trip"
        );
        Ok(result)
    }

    async fn aggregate_fail_fast(
        &self,
        calls: Vec<IMulticall2::Call>,
    ) -> Result<AggregateResult, FetchError> {
        let calldata = IMulticall2::aggregateCall { calls }.abi_encode();
        let raw = self.transport.call(self.aggregator, calldata.into()).await?;

        let decoded = IMulticall2::aggregateCall::abi_decode_returns(&raw).map_err(|_| {
            FetchError::Decode {
                context: "aggregate batch",
            }
        })?;

        Ok(AggregateResult {
            block_number: Some(decoded.blockNumber.to::<u64>()),
            return_data: decoded.returnData,
        })
    }

    async fn aggregate_tolerant(
        &self,
        calls: Vec<IMulticall2::Call>,
    ) -> Result<AggregateResult, FetchError> {
        let calldata = IMulticall2::tryAggregateCall {
            requireSuccess: false,
            calls,
        }
        .abi_encode();
        let raw = self.transport.call(self.aggregator, calldata.into()).await?;

        let results = IMulticall2::tryAggregateCall::abi_decode_returns(&raw).map_err(|_| {
            FetchError::Decode {
                context: "tryAggregate batch",
            }
        })?;

        if let Some(index) = results.iter().position(|r| !r.success) {
            return Err(FetchError::CallReverted { index: Some(index) });
        }

        Ok(AggregateResult {
            block_number: None,
            return_data: results.into_iter().map(|r| r.returnData).collect(),
        })
    }
}

// ============================================
// TEST SUPPORT: CANNED CHAIN
// ============================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use crate::abi::{IUniswapV2Pair, EXAMPLE_PAIR, IERC20, MULTICALL2};
    use alloy_primitives::{address, U256};
    use alloy_sol_types::SolValue;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub const USDC: Address = address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48");
    pub const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

    /// In-memory chain answering multicall batches with canned per-call
    /// return data. Counts transport round trips so tests can assert that
    /// validation failures never touch the network.
    pub struct MockChain {
        pub block_number: u64,
        pub round_trips: AtomicUsize,
        returns: HashMap<(Address, [u8; 4]), Vec<u8>>,
        reverting: Vec<(Address, [u8; 4])>,
    }

    impl MockChain {
        pub fn new() -> Self {
            Self {
                block_number: 19_000_000,
                round_trips: AtomicUsize::new(0),
                returns: HashMap::new(),
                reverting: Vec::new(),
            }
        }

        /// A canned ETH-USDC pair: 1,500,000 USDC / 500 WETH reserves and a
        /// 2.5e18 LP supply.
        ///
        /// Return values are encoded as one-element tuples so dynamic types
        /// carry the head offset exactly like real function-return data.
        pub fn with_example_pair() -> Self {
            let mut chain = Self::new();
            chain.set_return(
                EXAMPLE_PAIR,
                IUniswapV2Pair::token0Call::SELECTOR,
                (USDC,).abi_encode(),
            );
            chain.set_return(
                EXAMPLE_PAIR,
                IUniswapV2Pair::token1Call::SELECTOR,
                (WETH,).abi_encode(),
            );
            chain.set_reserves(1_500_000_000_000u128, 500_000_000_000_000_000_000u128);
            chain.set_return(
                EXAMPLE_PAIR,
                IUniswapV2Pair::totalSupplyCall::SELECTOR,
                (U256::from(2_500_000_000_000_000_000u128),).abi_encode(),
            );
            chain.set_token(USDC, "USD Coin", "USDC", 6);
            chain.set_token(WETH, "Wrapped Ether", "WETH", 18);
            chain
        }

        pub fn set_return(&mut self, target: Address, selector: [u8; 4], data: Vec<u8>) {
            self.returns.insert((target, selector), data);
        }

        pub fn set_reserves(&mut self, reserve0: u128, reserve1: u128) {
            let ret = (
                U256::from(reserve0),
                U256::from(reserve1),
                1_700_000_000u32,
            );
            self.set_return(
                EXAMPLE_PAIR,
                IUniswapV2Pair::getReservesCall::SELECTOR,
                ret.abi_encode(),
            );
        }

        pub fn set_token(&mut self, addr: Address, name: &str, symbol: &str, decimals: u8) {
            self.set_return(
                addr,
                IERC20::nameCall::SELECTOR,
                (name.to_string(),).abi_encode_params(),
            );
            self.set_return(
                addr,
                IERC20::symbolCall::SELECTOR,
                (symbol.to_string(),).abi_encode_params(),
            );
            self.set_return(
                addr,
                IERC20::decimalsCall::SELECTOR,
                (U256::from(decimals),).abi_encode(),
            );
        }

        pub fn set_reverting(&mut self, target: Address, selector: [u8; 4]) {
            self.reverting.push((target, selector));
        }

        pub fn round_trips(&self) -> usize {
            self.round_trips.load(Ordering::SeqCst)
        }

        fn key(call: &IMulticall2::Call) -> (Address, [u8; 4]) {
            let mut selector = [0u8; 4];
            selector.copy_from_slice(&call.callData[..4]);
            (call.target, selector)
        }

        fn answer(&self, call: &IMulticall2::Call) -> Option<Vec<u8>> {
            let key = Self::key(call);
            if self.reverting.contains(&key) {
                return None;
            }
            self.returns.get(&key).cloned()
        }
    }

    #[async_trait]
    impl Transport for MockChain {
        async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, FetchError> {
            self.round_trips.fetch_add(1, Ordering::SeqCst);
            assert_eq!(to, MULTICALL2, "mock chain only serves the aggregator");

            if let Ok(batch) = IMulticall2::aggregateCall::abi_decode(&data) {
                let mut return_data = Vec::with_capacity(batch.calls.len());
                for call in &batch.calls {
                    match self.answer(call) {
                        Some(bytes) => return_data.push(Bytes::from(bytes)),
                        // A reverting inner call reverts the whole batch.
                        None => return Err(FetchError::CallReverted { index: None }),
                    }
                }
                let encoded = (U256::from(self.block_number), return_data).abi_encode_params();
                return Ok(encoded.into());
            }

            if let Ok(batch) = IMulticall2::tryAggregateCall::abi_decode(&data) {
                let results: Vec<IMulticall2::Result> = batch
                    .calls
                    .iter()
                    .map(|call| match self.answer(call) {
                        Some(bytes) => IMulticall2::Result {
                            success: true,
                            returnData: Bytes::from(bytes),
                        },
                        None => IMulticall2::Result {
                            success: false,
                            returnData: Bytes::new(),
                        },
                    })
                    .collect();
                return Ok((results,).abi_encode_params().into());
            }

            Err(FetchError::Transport("unexpected calldata".into()))
        }
    }
}
