//! Contract interfaces consumed by the fetcher.
//!
//! Three read-only surfaces: the Multicall2 aggregator, the Uniswap V2 pair,
//! and ERC-20 token metadata. The sol! bindings give compile-time-checked
//! call structs, so a mistyped function name or argument count is a build
//! error rather than a runtime lookup failure.

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

sol! {
    /// Multicall2 batch aggregator.
    ///
    /// `aggregate` reverts the whole batch if any call reverts;
    /// `tryAggregate` reports per-call success instead.
    interface IMulticall2 {
        struct Call {
            address target;
            bytes callData;
        }

        struct Result {
            bool success;
            bytes returnData;
        }

        function aggregate(Call[] calldata calls)
            external returns (uint256 blockNumber, bytes[] memory returnData);

        function tryAggregate(bool requireSuccess, Call[] calldata calls)
            external returns (Result[] memory returnData);
    }
}

sol! {
    interface IUniswapV2Pair {
        function token0() external view returns (address);
        function token1() external view returns (address);
        function getReserves() external view returns (uint112 reserve0, uint112 reserve1, uint32 blockTimestampLast);
        function totalSupply() external view returns (uint256);
        function factory() external view returns (address);
    }

    interface IERC20 {
        function name() external view returns (string memory);
        function symbol() external view returns (string memory);
        function decimals() external view returns (uint8);
    }
}

/// Multicall2 deployment on Ethereum mainnet.
pub const MULTICALL2: Address = address!("5BA1e12693Dc8F9c48aAD8770482f4739bEeD696");

/// A well-known V2 pair (ETH-USDC), used by the `example` shortcut.
pub const EXAMPLE_PAIR: Address = address!("B4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc");

/// LP tokens always use 18 decimals, regardless of the constituent tokens.
pub const LP_TOKEN_DECIMALS: u8 = 18;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_sol_types::SolCall;

    #[test]
    fn test_selectors_match_canonical_signatures() {
        // keccak256("token0()")[..4] etc. - known selectors from the deployed
        // contracts, pinned so an accidental signature edit fails loudly.
        assert_eq!(IUniswapV2Pair::token0Call::SELECTOR, [0x0d, 0xfe, 0x16, 0x81]);
        assert_eq!(IUniswapV2Pair::token1Call::SELECTOR, [0xd2, 0x12, 0x20, 0xa7]);
        assert_eq!(IUniswapV2Pair::getReservesCall::SELECTOR, [0x09, 0x02, 0xf1, 0xac]);
        assert_eq!(IUniswapV2Pair::totalSupplyCall::SELECTOR, [0x18, 0x16, 0x0d, 0xdd]);
        assert_eq!(IERC20::nameCall::SELECTOR, [0x06, 0xfd, 0xde, 0x03]);
        assert_eq!(IERC20::symbolCall::SELECTOR, [0x95, 0xd8, 0x9b, 0x41]);
        assert_eq!(IERC20::decimalsCall::SELECTOR, [0x31, 0x3c, 0xe5, 0x67]);
        assert_eq!(IMulticall2::aggregateCall::SELECTOR, [0x25, 0x2d, 0xba, 0x42]);
        assert_eq!(IMulticall2::tryAggregateCall::SELECTOR, [0xbc, 0xe3, 0x8b, 0xd7]);
    }

    #[test]
    fn test_aggregate_call_round_trips() {
        let calls = vec![
            IMulticall2::Call {
                target: EXAMPLE_PAIR,
                callData: IUniswapV2Pair::token0Call {}.abi_encode().into(),
            },
            IMulticall2::Call {
                target: EXAMPLE_PAIR,
                callData: IUniswapV2Pair::getReservesCall {}.abi_encode().into(),
            },
        ];
        let encoded = IMulticall2::aggregateCall {
            calls: calls.clone(),
        }
        .abi_encode();

        let decoded = IMulticall2::aggregateCall::abi_decode(&encoded).unwrap();
        assert_eq!(decoded.calls.len(), calls.len());
        for (decoded, original) in decoded.calls.iter().zip(&calls) {
            assert_eq!(decoded.target, original.target);
            assert_eq!(decoded.callData, original.callData);
        }
    }

    #[test]
    fn test_call_data_layout() {
        // Zero-arg view calls encode to the bare 4-byte selector.
        assert_eq!(IUniswapV2Pair::getReservesCall {}.abi_encode().len(), 4);
        assert_eq!(IERC20::decimalsCall {}.abi_encode().len(), 4);

        // An aggregate of one empty-calldata call: selector + offset word +
        // array length + tuple offset + (address word, bytes offset, bytes len).
        let calls = vec![IMulticall2::Call {
            target: EXAMPLE_PAIR,
            callData: Default::default(),
        }];
        let encoded = IMulticall2::aggregateCall { calls }.abi_encode();
        assert_eq!(encoded[..4], IMulticall2::aggregateCall::SELECTOR);
        assert_eq!(encoded.len(), 4 + 6 * 32);
    }
}
